//! Fee lookup for a single asset.

use anyhow::Result;
use clap::Args;
use perp_arb_cross::{ExecutionStyle, FeeConfig, FeeResolver, ResolvedFee, Venue, VipTier};
use rust_decimal::Decimal;
use std::path::PathBuf;

use super::load_config;

/// Arguments for the fees command.
#[derive(Args, Debug, Clone)]
pub struct FeesArgs {
    /// Venue: hyperliquid (hl) or ostium (os)
    #[arg(long)]
    pub venue: Venue,

    /// Asset identifier, e.g. BTC, xyz:GOLD, XAU
    #[arg(long)]
    pub asset: String,

    /// Asset-class hint: dex name on Hyperliquid, group on Ostium
    #[arg(long)]
    pub class: Option<String>,

    /// VIP tier (clamped to 0-6)
    #[arg(long, default_value = "0")]
    pub tier: i64,

    /// Referral discount in percent (defaults to the configured value)
    #[arg(long)]
    pub referral: Option<Decimal>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the fees command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run_fees(args: FeesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let resolver = FeeResolver::with_config(FeeConfig::from(&config.fees));
    let referral = args
        .referral
        .unwrap_or(resolver.config().referral_discount_pct);
    let tier = VipTier::new(args.tier);

    let fee = resolver.resolve(
        args.venue,
        &args.asset,
        args.class.as_deref(),
        tier,
        referral,
    );

    print!(
        "{}",
        render_fee(args.venue, &args.asset, tier, &fee, config.engine.position_size_usd)
    );
    Ok(())
}

fn render_fee(
    venue: Venue,
    asset: &str,
    tier: VipTier,
    fee: &ResolvedFee,
    position_size_usd: Decimal,
) -> String {
    let fee = fee.rounded(6);
    let mut out = format!("{venue} {asset} ({tier}, {:?})\n", fee.schedule);
    out.push_str(&format!("  maker rate:   {}%\n", fee.maker_rate_pct.normalize()));
    out.push_str(&format!("  taker rate:   {}%\n", fee.taker_rate_pct.normalize()));
    out.push_str(&format!("  fixed fee:    ${}\n", fee.fixed_fee_usd));
    out.push_str(&format!("  charged legs: {}\n", fee.charged_legs));
    for style in [ExecutionStyle::Maker, ExecutionStyle::Taker] {
        out.push_str(&format!(
            "  {style} round trip on ${position_size_usd}: ${}\n",
            fee.round_trip_cost(position_size_usd, style).round_dp(4)
        ));
    }
    out
}
