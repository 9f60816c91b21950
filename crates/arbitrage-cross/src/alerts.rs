//! Opportunity alerts for a watch list of assets.
//!
//! The engine carries no notification policy; this module is a consumer of
//! published pair boards. An alert fires when a monitored pair's spread
//! alone covers costs, at most once per asset per cooldown window.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use perp_arb_core::AlertConfig;

use crate::engine::{PairArbitrage, PairBoard};
use crate::types::ExecutionStyle;

/// A spread opportunity on a monitored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Cooldown key: the home venue symbol.
    pub asset: String,
    pub pair_name: String,
    pub style: ExecutionStyle,
    pub current_spread_usd: Decimal,
    pub break_even_spread_usd: Decimal,
    pub total_cost: Decimal,
    pub raised_at: DateTime<Utc>,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): spread ${} >= break-even ${}, cost ${}",
            self.pair_name,
            self.style,
            self.current_spread_usd,
            self.break_even_spread_usd,
            self.total_cost
        )
    }
}

/// Filters pair boards down to alert-worthy opportunities.
#[derive(Debug, Clone)]
pub struct OpportunityAlerter {
    monitored: Vec<String>,
    cooldown: Duration,
    last_alert: HashMap<String, DateTime<Utc>>,
}

impl Default for OpportunityAlerter {
    fn default() -> Self {
        Self::from(&AlertConfig::default())
    }
}

impl From<&AlertConfig> for OpportunityAlerter {
    fn from(config: &AlertConfig) -> Self {
        Self::new(
            config.monitored_assets.iter().cloned(),
            Duration::from_std(std::time::Duration::from_secs(config.cooldown_secs))
                .unwrap_or_else(|_| Duration::days(365)),
        )
    }
}

impl OpportunityAlerter {
    #[must_use]
    pub fn new(monitored: impl IntoIterator<Item = String>, cooldown: Duration) -> Self {
        Self {
            monitored: monitored.into_iter().map(|a| a.to_uppercase()).collect(),
            cooldown,
            last_alert: HashMap::new(),
        }
    }

    /// True if a monitored name appears in the pair name or home symbol.
    #[must_use]
    pub fn is_monitored(&self, pair: &PairArbitrage) -> bool {
        let name = pair.name.to_uppercase();
        let symbol = pair.home.quote.symbol.to_uppercase();
        self.monitored
            .iter()
            .any(|asset| name.contains(asset.as_str()) || symbol.contains(asset.as_str()))
    }

    /// Returns new alerts for `board` and starts their cooldowns.
    ///
    /// When both styles qualify the maker verdict is reported.
    pub fn check(&mut self, board: &PairBoard, now: DateTime<Utc>) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for pair in &board.pairs {
            if !self.is_monitored(pair) {
                continue;
            }

            let verdict = if pair.arbitrage.maker.spread_can_profit {
                &pair.arbitrage.maker
            } else if pair.arbitrage.taker.spread_can_profit {
                &pair.arbitrage.taker
            } else {
                continue;
            };

            let asset = pair.home.quote.symbol.clone();
            if let Some(last) = self.last_alert.get(&asset) {
                if now - *last < self.cooldown {
                    continue;
                }
            }
            self.last_alert.insert(asset.clone(), now);

            alerts.push(Alert {
                asset,
                pair_name: pair.name.clone(),
                style: verdict.style,
                current_spread_usd: verdict.current_spread_usd,
                break_even_spread_usd: verdict.break_even_spread_usd,
                total_cost: verdict.total_cost,
                raised_at: now,
            });
        }

        alerts
    }

    /// Checks a board and logs every alert raised.
    pub fn check_and_log(&mut self, board: &PairBoard, now: DateTime<Utc>) -> Vec<Alert> {
        let alerts = self.check(board, now);
        for alert in &alerts {
            warn!(
                asset = %alert.asset,
                style = %alert.style,
                spread = %alert.current_spread_usd,
                break_even = %alert.break_even_spread_usd,
                "Arbitrage opportunity: {alert}"
            );
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ArbitrageEngine;
    use crate::types::{Quote, Venue};
    use rust_decimal_macros::dec;

    fn gold_board(home_mid: Decimal) -> std::sync::Arc<PairBoard> {
        let engine = ArbitrageEngine::new();
        engine.update_venue(
            Venue::Hyperliquid,
            vec![
                Quote::new("xyz:GOLD", home_mid, home_mid - dec!(0.5), home_mid + dec!(0.5))
                    .with_class_hint("xyz"),
                Quote::new("BTC", dec!(100000), dec!(99990), dec!(100010)),
            ],
        );
        engine.update_venue(
            Venue::Ostium,
            vec![
                Quote::new("XAU", dec!(2600), dec!(2599.5), dec!(2600.5))
                    .with_class_hint("commodities"),
                Quote::new("BTC", dec!(90000), dec!(89990), dec!(90010)),
            ],
        )
    }

    #[test]
    fn test_alert_on_monitored_asset_only() {
        let mut alerter = OpportunityAlerter::default();
        let board = gold_board(dec!(2650));

        // BTC is wildly profitable but not monitored
        let alerts = alerter.check(&board, Utc::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].asset, "xyz:GOLD");
        assert_eq!(alerts[0].pair_name, "GOLD / XAU");
        assert_eq!(alerts[0].style, ExecutionStyle::Maker);
    }

    #[test]
    fn test_cooldown_suppresses_repeats() {
        let mut alerter = OpportunityAlerter::default();
        let board = gold_board(dec!(2650));
        let start = Utc::now();

        assert_eq!(alerter.check(&board, start).len(), 1);
        assert!(alerter.check(&board, start + Duration::seconds(30)).is_empty());
        assert_eq!(alerter.check(&board, start + Duration::seconds(61)).len(), 1);
    }

    #[test]
    fn test_no_alert_without_spread() {
        let mut alerter = OpportunityAlerter::default();
        let board = gold_board(dec!(2600));
        assert!(alerter.check(&board, Utc::now()).is_empty());
    }

    #[test]
    fn test_custom_watch_list() {
        let mut alerter = OpportunityAlerter::new(vec!["btc".to_string()], Duration::seconds(5));
        let board = gold_board(dec!(2600));
        let alerts = alerter.check_and_log(&board, Utc::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].pair_name, "BTC");
    }
}
