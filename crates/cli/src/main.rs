use clap::{Parser, Subcommand};

mod commands;

use commands::{FeesArgs, MonitorArgs, ScanArgs};

#[derive(Parser)]
#[command(name = "perp-arb")]
#[command(about = "Cross-venue perp arbitrage economics for Hyperliquid and Ostium", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate two venue snapshot files once and print the pair board
    Scan(ScanArgs),
    /// Print the resolved fee for one asset
    Fees(FeesArgs),
    /// Keep re-reading snapshot files, recompute on every change and alert
    Monitor(MonitorArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan(args) => {
            commands::run_scan(args)?;
        }
        Commands::Fees(args) => {
            commands::run_fees(args)?;
        }
        Commands::Monitor(args) => {
            commands::run_monitor(args).await?;
        }
    }

    Ok(())
}
