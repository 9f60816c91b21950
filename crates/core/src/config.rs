use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Top-level configuration for the arbitrage monitor.
///
/// Every section falls back to its defaults so a missing or partial
/// `config/Config.toml` still produces a usable configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub fees: FeeSettings,
    pub matching: MatchingConfig,
    pub alerts: AlertConfig,
    pub feeds: FeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Notional used for every cost and break-even computation, in USD.
    pub position_size_usd: Decimal,
    /// Funding or combo break-even beyond this many hours is not worth holding.
    pub max_funding_hours: Decimal,
    /// Home venue VIP tier. Out-of-range values are clamped to 0..=6 by the engine.
    pub vip_tier: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            position_size_usd: dec!(1000),
            max_funding_hours: dec!(12),
            vip_tier: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSettings {
    /// Referral discount on home venue fees, in percent (4 means 4%).
    pub referral_discount_pct: Decimal,
    /// Assets billed on the namespaced (HIP-3) schedule even without a dex prefix.
    pub namespaced_assets: Vec<String>,
    /// Namespaced assets that never get the growth-mode discount.
    pub standard_assets: Vec<String>,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            referral_discount_pct: dec!(4),
            namespaced_assets: to_strings(&[
                "GOLD", "SILVER", "COPPER", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "XYZ100",
            ]),
            standard_assets: to_strings(&["GOLD"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Counterparty name -> home venue name.
    pub synonyms: BTreeMap<String, String>,
    /// Display ordering; earlier entries sort first.
    pub priority: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let synonyms = [
            ("XAU", "GOLD"),
            ("XAG", "SILVER"),
            ("HG", "COPPER"),
            ("NDX", "XYZ100"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            synonyms,
            priority: to_strings(&[
                "GOLD", "SILVER", "COPPER", "XYZ100", "XAU", "XAG", "HG", "NDX",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub monitored_assets: Vec<String>,
    pub cooldown_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            monitored_assets: to_strings(&["GOLD", "SILVER", "COPPER", "XYZ100"]),
            cooldown_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// How often the polled venue is refreshed.
    pub poll_interval_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("position size must not be negative, got {0}")]
    NegativePositionSize(Decimal),

    #[error("max funding hours must not be negative, got {0}")]
    NegativeFundingHorizon(Decimal),

    #[error("referral discount must be within 0..=100 percent, got {0}")]
    ReferralOutOfRange(Decimal),
}

impl AppConfig {
    /// Checks values that would make the economics meaningless.
    ///
    /// A zero position size is allowed; the calculator treats it as
    /// "no break-even" rather than failing.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.position_size_usd < Decimal::ZERO {
            return Err(ConfigError::NegativePositionSize(
                self.engine.position_size_usd,
            ));
        }
        if self.engine.max_funding_hours < Decimal::ZERO {
            return Err(ConfigError::NegativeFundingHorizon(
                self.engine.max_funding_hours,
            ));
        }
        let referral = self.fees.referral_discount_pct;
        if referral < Decimal::ZERO || referral > dec!(100) {
            return Err(ConfigError::ReferralOutOfRange(referral));
        }
        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
