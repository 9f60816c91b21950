//! One-shot scan over two venue snapshot files.
//!
//! ```bash
//! perp-arb scan --home data/hyperliquid_sample.json \
//!     --counterparty data/ostium_sample.json --tier 2
//! ```

use anyhow::Result;
use clap::Args;
use perp_arb_cross::{ArbitrageEngine, PairArbitrage, PairBoard, Venue, Verdict};
use rust_decimal::Decimal;
use std::path::PathBuf;

use super::load_config;
use super::snapshot::load_quotes;

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Hyperliquid snapshot file (JSON quotes)
    #[arg(long)]
    pub home: PathBuf,

    /// Ostium snapshot file (JSON quotes)
    #[arg(long)]
    pub counterparty: PathBuf,

    /// VIP tier override (clamped to 0-6)
    #[arg(long)]
    pub tier: Option<i64>,

    /// Print the pair board as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the scan command.
///
/// # Errors
///
/// Returns an error if the configuration or either snapshot cannot be loaded.
pub fn run_scan(args: ScanArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let engine = ArbitrageEngine::from_config(&config);
    if let Some(tier) = args.tier {
        engine.set_tier(tier);
    }

    engine.update_venue(Venue::Hyperliquid, load_quotes(&args.home)?);
    let board = engine.update_venue(Venue::Ostium, load_quotes(&args.counterparty)?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*board)?);
    } else {
        print!("{}", render_board(&board));
    }
    Ok(())
}

const HEADER: &str = "PAIR                  STYLE  COST      SPREAD        BREAK-EVEN    FUND h    COMBO h   PROFIT";

fn render_board(board: &PairBoard) -> String {
    let mut out = format!(
        "{} | {} pairs | updated {}\n{HEADER}\n",
        board.tier,
        board.pairs.len(),
        board.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    for pair in &board.pairs {
        out.push_str(&render_row(pair, &pair.arbitrage.maker));
        out.push_str(&render_row(pair, &pair.arbitrage.taker));
    }
    out
}

fn render_row(pair: &PairArbitrage, verdict: &Verdict) -> String {
    format!(
        "{:<21} {:<6} {:<9} {:<13} {:<13} {:<9} {:<9} {}\n",
        pair.name,
        verdict.style,
        verdict.total_cost,
        verdict.current_spread_usd,
        verdict.break_even_spread_usd,
        hours(verdict.funding_hours),
        hours(verdict.combo_hours),
        if verdict.any_can_profit { "yes" } else { "-" },
    )
}

fn hours(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |h| h.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use perp_arb_cross::Quote;
    use rust_decimal_macros::dec;

    fn sample_board() -> std::sync::Arc<PairBoard> {
        let engine = ArbitrageEngine::new();
        engine.update_venue(
            Venue::Hyperliquid,
            vec![Quote::new("BTC", dec!(100000), dec!(99990), dec!(100010))],
        );
        engine.update_venue(
            Venue::Ostium,
            vec![Quote::new("BTC", dec!(99900), dec!(99890), dec!(99910))],
        )
    }

    #[test]
    fn test_render_board_has_row_per_style() {
        let rendered = render_board(&sample_board());
        let lines: Vec<_> = rendered.lines().collect();
        assert!(lines[0].starts_with("VIP 0 | 1 pairs"));
        assert_eq!(lines[1], HEADER);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("BTC") && lines[2].contains("maker"));
        assert!(lines[3].contains("taker"));
    }

    #[test]
    fn test_hours_placeholder() {
        assert_eq!(hours(None), "-");
        assert_eq!(hours(Some(dec!(3.25))), "3.25");
    }
}
