//! Shared types for cross-venue arbitrage.
//!
//! Venue identifiers, the VIP tier, execution styles and the normalized
//! quote shape that ingestion collaborators hand to the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fees::ResolvedFee;
use crate::funding::FundingRate;

// =============================================================================
// Venue Identifiers
// =============================================================================

/// Identifies which venue a quote belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    /// Home venue: order-book perps with VIP fee tiers and HIP-3 builder dexes.
    Hyperliquid,
    /// Counterparty venue: oracle-priced perps with a per-trade oracle fee.
    Ostium,
}

impl Venue {
    /// Returns the display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hyperliquid => "Hyperliquid",
            Self::Ostium => "Ostium",
        }
    }

    /// Number of legs (open, close) the venue charges its rate on.
    #[must_use]
    pub fn charged_legs(self) -> u32 {
        match self {
            Self::Hyperliquid => 2,
            Self::Ostium => 1,
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Venue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hyperliquid" | "hl" => Ok(Self::Hyperliquid),
            "ostium" | "os" => Ok(Self::Ostium),
            other => Err(format!("unknown venue: {other}")),
        }
    }
}

// =============================================================================
// VIP Tier
// =============================================================================

/// Home venue VIP tier, always within `0..=6`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VipTier(u8);

impl VipTier {
    /// Highest tier in the fee schedule.
    pub const MAX: u8 = 6;

    /// Number of tiers in a fee table.
    pub const COUNT: usize = Self::MAX as usize + 1;

    /// Creates a tier, clamping out-of-range input instead of rejecting it.
    #[must_use]
    pub fn new(tier: i64) -> Self {
        Self(tier.clamp(0, i64::from(Self::MAX)) as u8)
    }

    /// Returns the tier as a table index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Returns the raw tier value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Iterates every tier from 0 to [`Self::MAX`].
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }
}

impl std::fmt::Display for VipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VIP {}", self.0)
    }
}

// =============================================================================
// Execution Style
// =============================================================================

/// Passive (resting) or aggressive (crossing) execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStyle {
    Maker,
    Taker,
}

impl ExecutionStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maker => "maker",
            Self::Taker => "taker",
        }
    }
}

impl std::fmt::Display for ExecutionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// Quotes
// =============================================================================

/// Normalized quote for one contract on one venue.
///
/// Missing prices are carried as `None` and read as zero by the economics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Venue symbol, possibly namespaced (e.g. `xyz:GOLD`).
    pub symbol: String,
    /// Asset-class signal: dex name on the home venue, asset group on the counterparty.
    #[serde(default)]
    pub class_hint: Option<String>,
    #[serde(default)]
    pub mid: Option<Decimal>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub funding: Option<FundingRate>,
    #[serde(default)]
    pub open_interest: Option<Decimal>,
    #[serde(default)]
    pub volume_24h: Option<Decimal>,
}

impl Quote {
    /// Creates a quote with prices and no funding information.
    #[must_use]
    pub fn new(symbol: impl Into<String>, mid: Decimal, bid: Decimal, ask: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            class_hint: None,
            mid: Some(mid),
            bid: Some(bid),
            ask: Some(ask),
            funding: None,
            open_interest: None,
            volume_24h: None,
        }
    }

    /// Sets the asset-class hint.
    #[must_use]
    pub fn with_class_hint(mut self, hint: impl Into<String>) -> Self {
        self.class_hint = Some(hint.into());
        self
    }

    /// Sets the funding rate.
    #[must_use]
    pub fn with_funding(mut self, funding: FundingRate) -> Self {
        self.funding = Some(funding);
        self
    }

    #[must_use]
    pub fn mid_or_zero(&self) -> Decimal {
        self.mid.unwrap_or_default()
    }

    #[must_use]
    pub fn bid_or_zero(&self) -> Decimal {
        self.bid.unwrap_or_default()
    }

    #[must_use]
    pub fn ask_or_zero(&self) -> Decimal {
        self.ask.unwrap_or_default()
    }

    /// Hourly funding rate in percent used for funding comparisons, zero when absent.
    #[must_use]
    pub fn hourly_funding(&self) -> Decimal {
        self.funding
            .as_ref()
            .map(FundingRate::effective_hourly)
            .unwrap_or_default()
    }
}

/// A quote together with the fees resolved for it at the current tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedQuote {
    pub venue: Venue,
    #[serde(flatten)]
    pub quote: Quote,
    pub fee: ResolvedFee,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_vip_tier_clamps() {
        assert_eq!(VipTier::new(-3).value(), 0);
        assert_eq!(VipTier::new(4).value(), 4);
        assert_eq!(VipTier::new(99).value(), 6);
        assert_eq!(VipTier::all().count(), VipTier::COUNT);
    }

    #[test]
    fn test_venue_from_str() {
        assert_eq!("hyperliquid".parse::<Venue>(), Ok(Venue::Hyperliquid));
        assert_eq!("OS".parse::<Venue>(), Ok(Venue::Ostium));
        assert!("binance".parse::<Venue>().is_err());
    }

    #[test]
    fn test_charged_legs() {
        assert_eq!(Venue::Hyperliquid.charged_legs(), 2);
        assert_eq!(Venue::Ostium.charged_legs(), 1);
    }

    #[test]
    fn test_quote_missing_fields_read_as_zero() {
        let quote: Quote = serde_json::from_str(r#"{"symbol": "BTC"}"#).unwrap();
        assert_eq!(quote.mid_or_zero(), Decimal::ZERO);
        assert_eq!(quote.bid_or_zero(), Decimal::ZERO);
        assert_eq!(quote.ask_or_zero(), Decimal::ZERO);
        assert_eq!(quote.hourly_funding(), Decimal::ZERO);
    }

    #[test]
    fn test_quote_builder() {
        let quote = Quote::new("xyz:GOLD", dec!(2650), dec!(2649.5), dec!(2650.5))
            .with_class_hint("xyz")
            .with_funding(FundingRate::hourly(dec!(0.00125)));
        assert_eq!(quote.class_hint.as_deref(), Some("xyz"));
        assert_eq!(quote.hourly_funding(), dec!(0.00125));
    }
}
