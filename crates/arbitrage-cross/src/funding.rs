//! Funding and rollover rate normalization.
//!
//! The two venues quote carrying costs in different units. The home venue
//! reports a per-hour fraction, the counterparty reports per-second funding
//! for crypto and a per-block rollover fee for everything else, both as
//! 1e18-scaled integers. Everything is normalized here to percent per hour
//! so the economics can compare the two sides directly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed-point scale of the counterparty's raw rates.
pub const RAW_RATE_SCALE: u32 = 18;

const SECONDS_PER_HOUR: Decimal = dec!(3600);
const HOURS_PER_FUNDING_INTERVAL: Decimal = dec!(8);
const HOURS_PER_DAY: Decimal = dec!(24);
const HOURS_PER_YEAR: Decimal = dec!(8760);

/// A carrying-cost rate, in percent per hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FundingRate {
    /// Single signed hourly funding rate (home venue perps).
    Hourly { rate_hourly: Decimal },
    /// Separate rates paid by longs and shorts (counterparty crypto).
    PayDirection {
        long_pay_hourly: Decimal,
        short_pay_hourly: Decimal,
    },
    /// Overnight carrying cost (counterparty forex, commodities, indices, stocks).
    Rollover { hourly: Decimal },
}

impl FundingRate {
    #[must_use]
    pub fn hourly(rate_hourly: Decimal) -> Self {
        Self::Hourly { rate_hourly }
    }

    #[must_use]
    pub fn pay_direction(long_pay_hourly: Decimal, short_pay_hourly: Decimal) -> Self {
        Self::PayDirection {
            long_pay_hourly,
            short_pay_hourly,
        }
    }

    #[must_use]
    pub fn rollover(hourly: Decimal) -> Self {
        Self::Rollover { hourly }
    }

    /// Converts a raw hourly fraction (0.0000125) into a percent rate (0.00125).
    #[must_use]
    pub fn from_hourly_fraction(raw: Decimal) -> Self {
        Self::hourly((raw * dec!(100)).round_dp(6))
    }

    /// Converts 1e18-scaled per-second long/short funding into hourly percents.
    #[must_use]
    pub fn from_per_second_scaled(long_raw: i128, short_raw: i128) -> Self {
        Self::pay_direction(
            scaled_per_second_to_hourly_pct(long_raw),
            scaled_per_second_to_hourly_pct(short_raw),
        )
    }

    /// Converts a 1e18-scaled per-block rollover fee into an hourly percent.
    ///
    /// One block per second is assumed, which overstates the fee on faster
    /// chains. Returns `None` for a zero fee.
    #[must_use]
    pub fn rollover_from_per_block(raw: i128) -> Option<Self> {
        if raw == 0 {
            return None;
        }
        Some(Self::rollover(scaled_per_second_to_hourly_pct(raw)))
    }

    /// The hourly rate compared across venues.
    ///
    /// Pay-direction funding uses what a long pays.
    #[must_use]
    pub fn effective_hourly(&self) -> Decimal {
        match self {
            Self::Hourly { rate_hourly } => *rate_hourly,
            Self::PayDirection {
                long_pay_hourly, ..
            } => *long_pay_hourly,
            Self::Rollover { hourly } => *hourly,
        }
    }

    /// Rate per 8-hour funding interval, for comparison with CEX conventions.
    #[must_use]
    pub fn rate_8h(&self) -> Decimal {
        (self.effective_hourly() * HOURS_PER_FUNDING_INTERVAL).round_dp(6)
    }

    #[must_use]
    pub fn daily(&self) -> Decimal {
        (self.effective_hourly() * HOURS_PER_DAY).round_dp(6)
    }

    #[must_use]
    pub fn annualized(&self) -> Decimal {
        (self.effective_hourly() * HOURS_PER_YEAR).round_dp(2)
    }
}

fn scaled_per_second_to_hourly_pct(raw: i128) -> Decimal {
    // i128 magnitudes beyond Decimal's 96-bit mantissa are not produced by the venue.
    let per_second = Decimal::try_from_i128_with_scale(raw, RAW_RATE_SCALE).unwrap_or_default();
    (per_second.abs() * SECONDS_PER_HOUR * dec!(100)).round_dp(6)
}
