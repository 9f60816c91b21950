//! Fee resolution for both venues.
//!
//! The home venue bills a percentage on every leg from a VIP-tier table that
//! depends on the asset class (main perps, HIP-3 growth mode, HIP-3
//! standard). The counterparty bills only on open: a maker/taker split for
//! crypto, a flat per-asset or per-group rate for traditional assets, plus a
//! fixed oracle fee on every trade.
//!
//! All rates are percentages (`0.045` means 0.045%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use perp_arb_core::FeeSettings;

use crate::matcher::normalize;
use crate::types::{ExecutionStyle, Quote, Venue, VipTier};

// =============================================================================
// Fee Constants
// =============================================================================

/// Default referral discount on home venue fees, in percent.
pub const DEFAULT_REFERRAL_DISCOUNT_PCT: Decimal = dec!(4);

/// Marker separating a builder-dex namespace from the asset name (`xyz:GOLD`).
pub const NAMESPACE_DELIMITER: char = ':';

/// Home venue dex that is not namespaced.
pub const MAIN_DEX: &str = "main";

/// Counterparty crypto maker rate.
pub const OSTIUM_CRYPTO_MAKER_RATE: Decimal = dec!(0.03);

/// Counterparty crypto taker rate.
pub const OSTIUM_CRYPTO_TAKER_RATE: Decimal = dec!(0.10);

/// Counterparty oracle fee charged on every opening trade, in USD.
pub const OSTIUM_ORACLE_FEE_USD: Decimal = dec!(0.10);

/// Traditional rate used when neither the asset nor its group is listed.
pub const OSTIUM_FALLBACK_RATE: Decimal = dec!(0.03);

/// Per-asset traditional rates, checked before the group defaults.
const OSTIUM_ASSET_RATES: &[(&str, Decimal)] = &[
    ("XAU", dec!(0.03)),
    ("XAG", dec!(0.15)),
    ("XPT", dec!(0.20)),
    ("XPD", dec!(0.20)),
    ("HG", dec!(0.15)),
    ("CL", dec!(0.10)),
];

/// Maker and taker rate for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRates {
    pub taker: Decimal,
    pub maker: Decimal,
}

const fn rates(taker: Decimal, maker: Decimal) -> TierRates {
    TierRates { taker, maker }
}

const PERPS_BASE: [TierRates; VipTier::COUNT] = [
    rates(dec!(0.045), dec!(0.015)),
    rates(dec!(0.04), dec!(0.012)),
    rates(dec!(0.035), dec!(0.008)),
    rates(dec!(0.03), dec!(0.004)),
    rates(dec!(0.028), dec!(0)),
    rates(dec!(0.026), dec!(0)),
    rates(dec!(0.024), dec!(0)),
];

const HIP3_GROWTH: [TierRates; VipTier::COUNT] = [
    rates(dec!(0.009), dec!(0.003)),
    rates(dec!(0.008), dec!(0.0024)),
    rates(dec!(0.007), dec!(0.0016)),
    rates(dec!(0.006), dec!(0.0008)),
    rates(dec!(0.0056), dec!(0)),
    rates(dec!(0.0052), dec!(0)),
    rates(dec!(0.0048), dec!(0)),
];

const HIP3_STANDARD: [TierRates; VipTier::COUNT] = [
    rates(dec!(0.09), dec!(0.03)),
    rates(dec!(0.08), dec!(0.024)),
    rates(dec!(0.07), dec!(0.016)),
    rates(dec!(0.06), dec!(0.008)),
    rates(dec!(0.056), dec!(0)),
    rates(dec!(0.052), dec!(0)),
    rates(dec!(0.048), dec!(0)),
];

// =============================================================================
// Asset Classes
// =============================================================================

/// Home venue fee class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeFeeClass {
    /// Main-dex crypto perps.
    PerpsBase,
    /// HIP-3 assets in growth mode (heavily discounted).
    Hip3Growth,
    /// HIP-3 assets without the growth discount.
    Hip3Standard,
}

impl HomeFeeClass {
    /// Full tier table for this class.
    #[must_use]
    pub fn table(self) -> &'static [TierRates; VipTier::COUNT] {
        match self {
            Self::PerpsBase => &PERPS_BASE,
            Self::Hip3Growth => &HIP3_GROWTH,
            Self::Hip3Standard => &HIP3_STANDARD,
        }
    }

    #[must_use]
    pub fn rates(self, tier: VipTier) -> TierRates {
        self.table()[tier.index()]
    }
}

/// Counterparty asset group, parsed from the quote's class hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetGroup {
    Crypto,
    Forex,
    Commodities,
    Stocks,
    Indices,
    Other(String),
}

impl AssetGroup {
    /// Parses a group name. A missing hint means crypto, the venue's default listing.
    #[must_use]
    pub fn from_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return Self::Crypto;
        };
        match hint.trim().to_ascii_lowercase().as_str() {
            "crypto" => Self::Crypto,
            "forex" => Self::Forex,
            "commodities" => Self::Commodities,
            "stocks" => Self::Stocks,
            "indices" => Self::Indices,
            other => Self::Other(other.to_string()),
        }
    }

    /// Default flat rate for a traditional group, if the group has one.
    #[must_use]
    pub fn default_rate(&self) -> Option<Decimal> {
        match self {
            Self::Forex => Some(dec!(0.03)),
            Self::Indices | Self::Stocks => Some(dec!(0.05)),
            Self::Crypto | Self::Commodities | Self::Other(_) => None,
        }
    }
}

/// Which schedule produced a resolved fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeSchedule {
    PerpsBase,
    Hip3Growth,
    Hip3Standard,
    OstiumCrypto,
    OstiumTraditional,
}

impl From<HomeFeeClass> for FeeSchedule {
    fn from(class: HomeFeeClass) -> Self {
        match class {
            HomeFeeClass::PerpsBase => Self::PerpsBase,
            HomeFeeClass::Hip3Growth => Self::Hip3Growth,
            HomeFeeClass::Hip3Standard => Self::Hip3Standard,
        }
    }
}

// =============================================================================
// Fee Configuration
// =============================================================================

/// Configuration for fee resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Referral discount on home venue rates, in percent.
    pub referral_discount_pct: Decimal,
    /// Assets on the namespaced schedule even when quoted without a prefix.
    pub namespaced_assets: HashSet<String>,
    /// Assets pinned to the standard (no-discount) HIP-3 schedule.
    pub standard_assets: HashSet<String>,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self::from(&FeeSettings::default())
    }
}

impl From<&FeeSettings> for FeeConfig {
    fn from(settings: &FeeSettings) -> Self {
        Self {
            referral_discount_pct: settings.referral_discount_pct,
            namespaced_assets: settings.namespaced_assets.iter().map(|a| normalize(a)).collect(),
            standard_assets: settings.standard_assets.iter().map(|a| normalize(a)).collect(),
        }
    }
}

impl FeeConfig {
    /// Sets the referral discount.
    #[must_use]
    pub fn with_referral_discount(mut self, pct: Decimal) -> Self {
        self.referral_discount_pct = pct;
        self
    }
}

// =============================================================================
// Resolved Fee
// =============================================================================

/// Fee terms for one asset on one venue at one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFee {
    pub schedule: FeeSchedule,
    pub maker_rate_pct: Decimal,
    pub taker_rate_pct: Decimal,
    /// Flat charge per trade, in USD.
    pub fixed_fee_usd: Decimal,
    /// Legs the percentage is charged on (open only, or open and close).
    pub charged_legs: u32,
}

impl ResolvedFee {
    #[must_use]
    pub fn rate_for(&self, style: ExecutionStyle) -> Decimal {
        match style {
            ExecutionStyle::Maker => self.maker_rate_pct,
            ExecutionStyle::Taker => self.taker_rate_pct,
        }
    }

    /// Cost in USD of opening and closing `position_size_usd` on this venue.
    #[must_use]
    pub fn round_trip_cost(&self, position_size_usd: Decimal, style: ExecutionStyle) -> Decimal {
        position_size_usd * self.rate_for(style) / dec!(100) * Decimal::from(self.charged_legs)
            + self.fixed_fee_usd
    }

    /// Copy with rates rounded for display.
    #[must_use]
    pub fn rounded(mut self, dp: u32) -> Self {
        self.maker_rate_pct = self.maker_rate_pct.round_dp(dp);
        self.taker_rate_pct = self.taker_rate_pct.round_dp(dp);
        self
    }
}

// =============================================================================
// Fee Resolver
// =============================================================================

/// Resolves venue fees. Never fails: unknown inputs fall to default buckets.
#[derive(Debug, Clone, Default)]
pub struct FeeResolver {
    config: FeeConfig,
}

impl FeeResolver {
    /// Creates a resolver with the default asset lists and referral discount.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: FeeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    /// Classifies a home venue asset.
    ///
    /// Explicit standard listing wins, then a namespace marker (prefix or
    /// non-main dex hint) or namespaced listing, then the base perps class.
    #[must_use]
    pub fn home_fee_class(&self, asset_id: &str, class_hint: Option<&str>) -> HomeFeeClass {
        let name = normalize(asset_id);
        if self.config.standard_assets.contains(&name) {
            return HomeFeeClass::Hip3Standard;
        }

        let namespaced_hint =
            class_hint.is_some_and(|dex| !dex.is_empty() && !dex.eq_ignore_ascii_case(MAIN_DEX));
        if asset_id.contains(NAMESPACE_DELIMITER)
            || namespaced_hint
            || self.config.namespaced_assets.contains(&name)
        {
            return HomeFeeClass::Hip3Growth;
        }

        HomeFeeClass::PerpsBase
    }

    /// Resolves the fee for an asset with an explicit referral discount.
    #[must_use]
    pub fn resolve(
        &self,
        venue: Venue,
        asset_id: &str,
        class_hint: Option<&str>,
        tier: VipTier,
        referral_discount_pct: Decimal,
    ) -> ResolvedFee {
        match venue {
            Venue::Hyperliquid => {
                self.resolve_home(asset_id, class_hint, tier, referral_discount_pct)
            }
            Venue::Ostium => Self::resolve_counterparty(asset_id, class_hint),
        }
    }

    /// Resolves the fee for a quote using the configured referral discount.
    #[must_use]
    pub fn resolve_quote(&self, venue: Venue, quote: &Quote, tier: VipTier) -> ResolvedFee {
        self.resolve(
            venue,
            &quote.symbol,
            quote.class_hint.as_deref(),
            tier,
            self.config.referral_discount_pct,
        )
    }

    fn resolve_home(
        &self,
        asset_id: &str,
        class_hint: Option<&str>,
        tier: VipTier,
        referral_discount_pct: Decimal,
    ) -> ResolvedFee {
        let class = self.home_fee_class(asset_id, class_hint);
        let base = class.rates(tier);
        let multiplier = Decimal::ONE - referral_discount_pct / dec!(100);

        ResolvedFee {
            schedule: class.into(),
            maker_rate_pct: base.maker * multiplier,
            taker_rate_pct: base.taker * multiplier,
            fixed_fee_usd: Decimal::ZERO,
            charged_legs: Venue::Hyperliquid.charged_legs(),
        }
    }

    fn resolve_counterparty(asset_id: &str, class_hint: Option<&str>) -> ResolvedFee {
        let group = AssetGroup::from_hint(class_hint);
        let legs = Venue::Ostium.charged_legs();

        if group == AssetGroup::Crypto {
            return ResolvedFee {
                schedule: FeeSchedule::OstiumCrypto,
                maker_rate_pct: OSTIUM_CRYPTO_MAKER_RATE,
                taker_rate_pct: OSTIUM_CRYPTO_TAKER_RATE,
                fixed_fee_usd: OSTIUM_ORACLE_FEE_USD,
                charged_legs: legs,
            };
        }

        let asset = normalize(asset_id);
        let rate = OSTIUM_ASSET_RATES
            .iter()
            .find(|(name, _)| *name == asset)
            .map(|(_, rate)| *rate)
            .or_else(|| group.default_rate())
            .unwrap_or(OSTIUM_FALLBACK_RATE);

        ResolvedFee {
            schedule: FeeSchedule::OstiumTraditional,
            maker_rate_pct: rate,
            taker_rate_pct: rate,
            fixed_fee_usd: OSTIUM_ORACLE_FEE_USD,
            charged_legs: legs,
        }
    }
}
