//! Pair economics: break-even and profitability for one matched pair.
//!
//! Three ways a position can pay for its round-trip fees are evaluated:
//! the price spread alone, the funding-rate differential alone, and the
//! spread first with funding covering whatever is left ("combo").
//! Every division is guarded; the calculator never fails.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use perp_arb_core::EngineConfig;

use crate::fees::ResolvedFee;
use crate::types::{ExecutionStyle, Quote};

const COST_DP: u32 = 4;
const SPREAD_DP: u32 = 6;
const HOURS_DP: u32 = 2;

// =============================================================================
// Economics Configuration
// =============================================================================

/// Position sizing and time-horizon policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Notional per leg in USD.
    pub position_size_usd: Decimal,
    /// Longest funding break-even still considered viable, in hours.
    pub max_funding_hours: Decimal,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            position_size_usd: dec!(1000),
            max_funding_hours: dec!(12),
        }
    }
}

impl From<&EngineConfig> for EconomicsConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            position_size_usd: config.position_size_usd,
            max_funding_hours: config.max_funding_hours,
        }
    }
}

impl EconomicsConfig {
    #[must_use]
    pub fn with_position_size(mut self, size_usd: Decimal) -> Self {
        self.position_size_usd = size_usd;
        self
    }

    #[must_use]
    pub fn with_max_funding_hours(mut self, hours: Decimal) -> Self {
        self.max_funding_hours = hours;
        self
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// Which side of the pair is shorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Home venue is richer: sell home at its bid, buy counterparty at its ask.
    ShortHomeLongCounterparty,
    /// Counterparty is richer (or equal): buy home at its ask, sell counterparty at its bid.
    LongHomeShortCounterparty,
}

impl Direction {
    fn from_mids(home_mid: Decimal, counterparty_mid: Decimal) -> Self {
        if home_mid > counterparty_mid {
            Self::ShortHomeLongCounterparty
        } else {
            Self::LongHomeShortCounterparty
        }
    }
}

/// Profitability of one pair under one execution style.
///
/// Monetary fields are rounded for display. `funding_hours` and
/// `combo_hours` are `None` whenever the matching `*_valid` flag is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub style: ExecutionStyle,
    pub direction: Direction,
    /// Round-trip fees on both venues, in USD.
    pub total_cost: Decimal,
    /// Capturable price difference per unit.
    pub current_spread_usd: Decimal,
    /// Price difference per unit that exactly covers `total_cost`.
    pub break_even_spread_usd: Decimal,
    pub spread_can_profit: bool,
    /// Absolute hourly funding differential, in percent.
    pub funding_diff: Decimal,
    pub funding_hours: Option<Decimal>,
    pub funding_valid: bool,
    pub combo_hours: Option<Decimal>,
    pub combo_valid: bool,
    pub any_can_profit: bool,
}

/// Maker and taker verdicts for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEconomics {
    pub maker: Verdict,
    pub taker: Verdict,
}

impl PairEconomics {
    #[must_use]
    pub fn verdict(&self, style: ExecutionStyle) -> &Verdict {
        match style {
            ExecutionStyle::Maker => &self.maker,
            ExecutionStyle::Taker => &self.taker,
        }
    }

    /// True if either style can recover its costs.
    #[must_use]
    pub fn any_can_profit(&self) -> bool {
        self.maker.any_can_profit || self.taker.any_can_profit
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Spread leg chosen for an execution style.
struct SpreadLeg {
    direction: Direction,
    current_spread: Decimal,
    avg_price: Decimal,
}

/// Evaluates matched pairs under a fixed sizing policy.
#[derive(Debug, Clone, Default)]
pub struct PairEconomicsCalculator {
    config: EconomicsConfig,
}

impl PairEconomicsCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EconomicsConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EconomicsConfig {
        &self.config
    }

    /// Evaluates a pair for both execution styles.
    #[must_use]
    pub fn evaluate(
        &self,
        home: &Quote,
        counterparty: &Quote,
        home_fee: &ResolvedFee,
        counterparty_fee: &ResolvedFee,
    ) -> PairEconomics {
        PairEconomics {
            maker: self.evaluate_style(
                ExecutionStyle::Maker,
                home,
                counterparty,
                home_fee,
                counterparty_fee,
            ),
            taker: self.evaluate_style(
                ExecutionStyle::Taker,
                home,
                counterparty,
                home_fee,
                counterparty_fee,
            ),
        }
    }

    /// Evaluates a pair for a single execution style.
    #[must_use]
    pub fn evaluate_style(
        &self,
        style: ExecutionStyle,
        home: &Quote,
        counterparty: &Quote,
        home_fee: &ResolvedFee,
        counterparty_fee: &ResolvedFee,
    ) -> Verdict {
        let size = self.config.position_size_usd;
        let max_hours = self.config.max_funding_hours;

        let total_cost =
            home_fee.round_trip_cost(size, style) + counterparty_fee.round_trip_cost(size, style);

        let leg = spread_leg(style, home, counterparty);

        let break_even_spread = if size > Decimal::ZERO {
            total_cost * leg.avg_price / size
        } else {
            Decimal::ZERO
        };
        let spread_can_profit = leg.current_spread >= break_even_spread;

        // Funding: hourly percent differential paid on the full notional.
        let funding_diff = (home.hourly_funding() - counterparty.hourly_funding()).abs();
        let funding_per_hour = size * funding_diff / dec!(100);

        let funding_hours = if funding_per_hour > Decimal::ZERO {
            Some(total_cost / funding_per_hour)
        } else {
            None
        };
        let funding_valid =
            funding_hours.is_some_and(|h| h > Decimal::ZERO && h <= max_hours);

        // Combo: spread pays first, funding covers the remainder.
        let spread_profit = if leg.avg_price > Decimal::ZERO {
            leg.current_spread * size / leg.avg_price
        } else {
            Decimal::ZERO
        };
        let remaining_cost = total_cost - spread_profit;
        let combo_hours = if remaining_cost <= Decimal::ZERO {
            // Also taken when funding_per_hour is zero: spread alone covers cost.
            Some(Decimal::ZERO)
        } else if funding_per_hour > Decimal::ZERO {
            Some(remaining_cost / funding_per_hour)
        } else {
            None
        };
        let combo_valid = combo_hours.is_some_and(|h| h <= max_hours);

        Verdict {
            style,
            direction: leg.direction,
            total_cost: total_cost.round_dp(COST_DP),
            current_spread_usd: leg.current_spread.round_dp(SPREAD_DP),
            break_even_spread_usd: break_even_spread.round_dp(SPREAD_DP),
            spread_can_profit,
            funding_diff: funding_diff.round_dp(SPREAD_DP),
            funding_hours: funding_hours
                .filter(|_| funding_valid)
                .map(|h| h.round_dp(HOURS_DP)),
            funding_valid,
            combo_hours: combo_hours
                .filter(|_| combo_valid)
                .map(|h| h.round_dp(HOURS_DP)),
            combo_valid,
            any_can_profit: spread_can_profit || funding_valid || combo_valid,
        }
    }
}

fn spread_leg(style: ExecutionStyle, home: &Quote, counterparty: &Quote) -> SpreadLeg {
    let home_mid = home.mid_or_zero();
    let counterparty_mid = counterparty.mid_or_zero();
    let direction = Direction::from_mids(home_mid, counterparty_mid);

    let (current_spread, first, second) = match style {
        ExecutionStyle::Taker => {
            let (short_bid, long_ask) = match direction {
                Direction::ShortHomeLongCounterparty => {
                    (home.bid_or_zero(), counterparty.ask_or_zero())
                }
                Direction::LongHomeShortCounterparty => {
                    (counterparty.bid_or_zero(), home.ask_or_zero())
                }
            };
            ((short_bid - long_ask).max(Decimal::ZERO), short_bid, long_ask)
        }
        ExecutionStyle::Maker => (
            (home_mid - counterparty_mid).abs(),
            home_mid,
            counterparty_mid,
        ),
    };

    let sum = first + second;
    let avg_price = if sum > Decimal::ZERO {
        sum / dec!(2)
    } else {
        Decimal::ONE
    };

    SpreadLeg {
        direction,
        current_spread,
        avg_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeSchedule;
    use crate::funding::FundingRate;

    fn home_fee(maker: Decimal, taker: Decimal) -> ResolvedFee {
        ResolvedFee {
            schedule: FeeSchedule::PerpsBase,
            maker_rate_pct: maker,
            taker_rate_pct: taker,
            fixed_fee_usd: Decimal::ZERO,
            charged_legs: 2,
        }
    }

    fn counterparty_fee(maker: Decimal, taker: Decimal) -> ResolvedFee {
        ResolvedFee {
            schedule: FeeSchedule::OstiumCrypto,
            maker_rate_pct: maker,
            taker_rate_pct: taker,
            fixed_fee_usd: dec!(0.10),
            charged_legs: 1,
        }
    }

    fn btc_pair() -> (Quote, Quote) {
        let home = Quote::new("BTC", dec!(100000), dec!(99990), dec!(100010))
            .with_funding(FundingRate::hourly(dec!(0.001)));
        let counterparty = Quote::new("BTC", dec!(99900), dec!(99890), dec!(99910))
            .with_funding(FundingRate::pay_direction(dec!(0.002), dec!(0.0015)));
        (home, counterparty)
    }

    fn evaluate_btc() -> PairEconomics {
        let (home, counterparty) = btc_pair();
        PairEconomicsCalculator::new().evaluate(
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        )
    }

    fn assert_any_consistent(v: &Verdict) {
        assert_eq!(
            v.any_can_profit,
            v.spread_can_profit || v.funding_valid || v.combo_valid
        );
        assert_eq!(v.funding_hours.is_some(), v.funding_valid);
        assert_eq!(v.combo_hours.is_some(), v.combo_valid);
    }

    // ==================== Cost and Spread Tests ====================

    #[test]
    fn test_taker_costs_and_spread() {
        let taker = evaluate_btc().taker;

        // 0.9 (home, two legs) + 1.0 (counterparty, open) + 0.10 oracle
        assert_eq!(taker.total_cost, dec!(2.00));
        // Home is richer: 99990 bid - 99910 ask
        assert_eq!(taker.direction, Direction::ShortHomeLongCounterparty);
        assert_eq!(taker.current_spread_usd, dec!(80));
        // 2.00 * 99950 / 1000
        assert_eq!(taker.break_even_spread_usd, dec!(199.9));
        assert!(!taker.spread_can_profit);
        assert_any_consistent(&taker);
    }

    #[test]
    fn test_maker_uses_mid_spread() {
        let maker = evaluate_btc().maker;

        // 0.3 + 0.3 + 0.10
        assert_eq!(maker.total_cost, dec!(0.70));
        assert_eq!(maker.current_spread_usd, dec!(100));
        // 0.70 * 99950 / 1000
        assert_eq!(maker.break_even_spread_usd, dec!(69.965));
        assert!(maker.spread_can_profit);
        assert!(maker.any_can_profit);
        // Spread profit 100 * 1000 / 99950 already exceeds the 0.70 cost
        assert_eq!(maker.combo_hours, Some(Decimal::ZERO));
        assert_any_consistent(&maker);
    }

    #[test]
    fn test_taker_long_home_direction() {
        let home = Quote::new("ETH", dec!(3000), dec!(2999), dec!(3001));
        let counterparty = Quote::new("ETH", dec!(3010), dec!(3008), dec!(3012));
        let taker = PairEconomicsCalculator::new().evaluate_style(
            ExecutionStyle::Taker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        assert_eq!(taker.direction, Direction::LongHomeShortCounterparty);
        // 3008 bid - 3001 ask
        assert_eq!(taker.current_spread_usd, dec!(7));
    }

    #[test]
    fn test_crossed_taker_spread_is_floored() {
        let home = Quote::new("SOL", dec!(100), dec!(99), dec!(101));
        let counterparty = Quote::new("SOL", dec!(99.5), dec!(99), dec!(100));
        let taker = PairEconomicsCalculator::new().evaluate_style(
            ExecutionStyle::Taker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        assert_eq!(taker.current_spread_usd, Decimal::ZERO);
    }

    // ==================== Funding Tests ====================

    #[test]
    fn test_funding_hours_outside_horizon() {
        let taker = evaluate_btc().taker;

        assert_eq!(taker.funding_diff, dec!(0.001));
        // 2.00 / (1000 * 0.001%) = 200h
        assert!(!taker.funding_valid);
        assert_eq!(taker.funding_hours, None);
        // (2.00 - 0.8004) / 0.01 > 12h
        assert!(!taker.combo_valid);
        assert!(!taker.any_can_profit);
    }

    #[test]
    fn test_funding_within_horizon() {
        let home = Quote::new("ETH", dec!(3000), dec!(2999), dec!(3001))
            .with_funding(FundingRate::hourly(dec!(0.05)));
        let counterparty = Quote::new("ETH", dec!(3000), dec!(2999), dec!(3001))
            .with_funding(FundingRate::pay_direction(dec!(-0.05), dec!(0.05)));
        let maker = PairEconomicsCalculator::new().evaluate_style(
            ExecutionStyle::Maker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        // diff 0.1% -> $1/h; cost 0.70 -> 0.7h
        assert_eq!(maker.funding_diff, dec!(0.1));
        assert!(maker.funding_valid);
        assert_eq!(maker.funding_hours, Some(dec!(0.70)));
        assert!(!maker.spread_can_profit);
        // No spread, so funding carries the whole cost
        assert_eq!(maker.combo_hours, Some(dec!(0.70)));
        assert!(maker.any_can_profit);
        assert_any_consistent(&maker);
    }

    #[test]
    fn test_combo_blends_partial_spread_with_funding() {
        let home = Quote::new("ETH", dec!(100.015), dec!(100.01), dec!(100.02))
            .with_funding(FundingRate::hourly(dec!(0.1)));
        let counterparty = Quote::new("ETH", dec!(99.985), dec!(99.98), dec!(99.99));
        let maker = PairEconomicsCalculator::new().evaluate_style(
            ExecutionStyle::Maker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );

        assert_eq!(maker.total_cost, dec!(0.70));
        assert_eq!(maker.current_spread_usd, dec!(0.03));
        // 0.70 * 100 / 1000
        assert_eq!(maker.break_even_spread_usd, dec!(0.07));
        assert!(!maker.spread_can_profit);

        // Spread earns 0.03 * 1000 / 100 = 0.30; funding pays $1/h on the rest
        assert_eq!(maker.combo_hours, Some(dec!(0.40)));
        assert!(maker.combo_valid);
        assert_eq!(maker.funding_hours, Some(dec!(0.70)));
        assert_any_consistent(&maker);
    }

    #[test]
    fn test_no_funding_data_means_no_funding_path() {
        let home = Quote::new("BTC", dec!(100), dec!(100), dec!(100));
        let counterparty = Quote::new("BTC", dec!(100), dec!(100), dec!(100));
        let maker = PairEconomicsCalculator::new().evaluate_style(
            ExecutionStyle::Maker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        assert_eq!(maker.funding_diff, Decimal::ZERO);
        assert!(!maker.funding_valid);
        assert_eq!(maker.funding_hours, None);
        // Zero spread and zero funding: combo never breaks even
        assert!(!maker.combo_valid);
        assert_eq!(maker.combo_hours, None);
        assert!(!maker.any_can_profit);
    }

    #[test]
    fn test_combo_valid_without_funding_when_spread_covers_cost() {
        // remaining cost <= 0 with zero funding still reports an instant combo
        // break-even, so combo_valid shadows spread_can_profit here.
        let home = Quote::new("BTC", dec!(101), dec!(101), dec!(101));
        let counterparty = Quote::new("BTC", dec!(99), dec!(99), dec!(99));
        let maker = PairEconomicsCalculator::new().evaluate_style(
            ExecutionStyle::Maker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        assert_eq!(maker.funding_diff, Decimal::ZERO);
        assert!(!maker.funding_valid);
        assert!(maker.combo_valid);
        assert_eq!(maker.combo_hours, Some(Decimal::ZERO));
        assert!(maker.spread_can_profit);
    }

    // ==================== Guard Tests ====================

    #[test]
    fn test_zero_position_size_guards() {
        let (home, counterparty) = btc_pair();
        let calculator = PairEconomicsCalculator::with_config(
            EconomicsConfig::default().with_position_size(Decimal::ZERO),
        );
        let taker = calculator.evaluate_style(
            ExecutionStyle::Taker,
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        // Only the oracle fee remains
        assert_eq!(taker.total_cost, dec!(0.10));
        assert_eq!(taker.break_even_spread_usd, Decimal::ZERO);
        assert!(taker.spread_can_profit);
        assert_eq!(taker.funding_hours, None);
        assert_any_consistent(&taker);
    }

    #[test]
    fn test_missing_prices_read_as_zero() {
        let home = Quote {
            mid: None,
            bid: None,
            ask: None,
            ..Quote::new("BTC", Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        };
        let counterparty = home.clone();
        let result = PairEconomicsCalculator::new().evaluate(
            &home,
            &counterparty,
            &home_fee(dec!(0.015), dec!(0.045)),
            &counterparty_fee(dec!(0.03), dec!(0.10)),
        );
        // avg price falls back to 1: 0.70 * 1 / 1000
        assert_eq!(result.maker.break_even_spread_usd, dec!(0.0007));
        assert_eq!(result.maker.current_spread_usd, Decimal::ZERO);
        assert!(!result.maker.spread_can_profit);
        assert_any_consistent(&result.maker);
        assert_any_consistent(&result.taker);
    }

    #[test]
    fn test_break_even_formula_holds() {
        let (home, counterparty) = btc_pair();
        for size in [dec!(1), dec!(250), dec!(1000), dec!(50000)] {
            let calculator = PairEconomicsCalculator::with_config(
                EconomicsConfig::default().with_position_size(size),
            );
            let maker = calculator.evaluate_style(
                ExecutionStyle::Maker,
                &home,
                &counterparty,
                &home_fee(dec!(0.015), dec!(0.045)),
                &counterparty_fee(dec!(0.03), dec!(0.10)),
            );
            let cost = size * dec!(0.015) / dec!(100) * dec!(2) + size * dec!(0.03) / dec!(100)
                + dec!(0.10);
            let expected = (cost * dec!(99950) / size).round_dp(6);
            assert_eq!(maker.break_even_spread_usd, expected, "size {size}");
        }
    }
}
