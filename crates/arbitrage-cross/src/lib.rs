//! Cross-venue perpetual arbitrage economics.
//!
//! This crate decides whether the same asset quoted on two perpetual
//! venues can be arbitraged profitably after fees, using Hyperliquid as the
//! home venue and Ostium as the counterparty.
//!
//! # Overview
//!
//! A position is opened short on the richer venue and long on the cheaper
//! one. It pays for its round-trip fees through the price spread, through
//! the funding differential while held, or through both:
//!
//! ```text
//! Hyperliquid: BTC bid 99,990  ask 100,010
//! Ostium:      BTC bid 99,890  ask  99,910
//!
//! Taker direction: short Hyperliquid @ 99,990, long Ostium @ 99,910
//!   Spread captured:  80 per unit
//!   Fees ($1,000):    0.90 + 1.00 + 0.10 oracle = 2.00
//!   Break-even spread 2.00 * 99,950 / 1,000 = 199.90 per unit
//! ```
//!
//! # Modules
//!
//! - [`types`]: venues, VIP tiers, quotes
//! - [`funding`]: funding and rollover normalization
//! - [`fees`]: fee tables and resolution per venue
//! - [`economics`]: maker/taker break-even verdicts
//! - [`matcher`]: cross-venue asset identity
//! - [`engine`]: snapshot ownership, recompute and publication
//! - [`alerts`]: watch-list alerts over published boards
//!
//! # Example
//!
//! ```ignore
//! use perp_arb_cross::{ArbitrageEngine, Quote, Venue};
//!
//! let engine = ArbitrageEngine::new();
//! engine.update_venue(Venue::Hyperliquid, home_quotes);
//! engine.update_venue(Venue::Ostium, counterparty_quotes);
//!
//! for pair in engine.pairs().profitable() {
//!     println!("{} taker break-even {}", pair.name, pair.arbitrage.taker.break_even_spread_usd);
//! }
//! ```

pub mod alerts;
pub mod economics;
pub mod engine;
pub mod fees;
pub mod funding;
pub mod matcher;
pub mod types;

// Re-export main types for convenience
pub use alerts::{Alert, OpportunityAlerter};
pub use economics::{Direction, EconomicsConfig, PairEconomics, PairEconomicsCalculator, Verdict};
pub use engine::{ArbitrageEngine, PairArbitrage, PairBoard, VenueSnapshot};
pub use fees::{AssetGroup, FeeConfig, FeeResolver, FeeSchedule, HomeFeeClass, ResolvedFee};
pub use funding::FundingRate;
pub use matcher::{normalize, IdentityMatcher, MatchedPair, PriorityList, SynonymTable};
pub use types::{AnnotatedQuote, ExecutionStyle, Quote, Venue, VipTier};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_public_api_exports() {
        let _ = FeeResolver::new();
        let _ = PairEconomicsCalculator::new();
        let _ = IdentityMatcher::default();
        let _ = ArbitrageEngine::new();
        let _ = OpportunityAlerter::default();
        let _ = EconomicsConfig::default();
        let _ = FeeConfig::default();
    }

    #[test]
    fn test_types_accessible() {
        let _ = Venue::Hyperliquid;
        let _ = Venue::Ostium;
        let _ = ExecutionStyle::Maker;
        let _ = Direction::ShortHomeLongCounterparty;
        let _ = HomeFeeClass::Hip3Standard;
        let _ = FeeSchedule::OstiumTraditional;
    }

    #[test]
    fn test_integration_resolver_and_calculator() {
        let resolver = FeeResolver::new();
        let tier = VipTier::new(0);
        let home = Quote::new("BTC", dec!(100000), dec!(99990), dec!(100010));
        let counterparty =
            Quote::new("BTC", dec!(99900), dec!(99890), dec!(99910)).with_class_hint("crypto");

        let result = PairEconomicsCalculator::new().evaluate(
            &home,
            &counterparty,
            &resolver.resolve_quote(Venue::Hyperliquid, &home, tier),
            &resolver.resolve_quote(Venue::Ostium, &counterparty, tier),
        );

        // 1000 * 0.0432% * 2 + 1000 * 0.10% + 0.10
        assert_eq!(result.taker.total_cost, dec!(1.964));
        assert_eq!(result.taker.current_spread_usd, dec!(80));
    }
}
