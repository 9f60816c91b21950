//! The arbitrage engine: owns both venue snapshots and the published pair board.
//!
//! Producers call [`ArbitrageEngine::update_venue`] whenever a venue emits a
//! new snapshot, at their own cadence. Every mutation replaces state
//! wholesale and rebuilds the pair board from scratch under one lock, then
//! swaps the published board through a watch channel. Readers never take
//! the lock.
//!
//! # Example
//!
//! ```ignore
//! let engine = ArbitrageEngine::from_config(&config);
//! engine.update_venue(Venue::Hyperliquid, home_quotes);
//! engine.update_venue(Venue::Ostium, counterparty_quotes);
//!
//! for pair in &engine.pairs().pairs {
//!     println!("{}: {}", pair.name, pair.arbitrage.taker.any_can_profit);
//! }
//! ```

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use perp_arb_core::{AppConfig, MatchingConfig};

use crate::economics::{EconomicsConfig, PairEconomics, PairEconomicsCalculator};
use crate::fees::{FeeConfig, FeeResolver, ResolvedFee};
use crate::matcher::IdentityMatcher;
use crate::types::{AnnotatedQuote, Quote, Venue, VipTier};

/// Decimal places kept on annotated fee rates.
const FEE_RATE_DP: u32 = 6;

// =============================================================================
// Published Views
// =============================================================================

/// Latest annotated contracts from one venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueSnapshot {
    pub contracts: Vec<AnnotatedQuote>,
    /// When the venue last delivered a snapshot; `None` before the first one.
    pub updated_at: Option<DateTime<Utc>>,
}

impl VenueSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// One matched asset with its economics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairArbitrage {
    pub name: String,
    pub home: AnnotatedQuote,
    pub counterparty: AnnotatedQuote,
    pub arbitrage: PairEconomics,
}

/// The full recomputed pair list at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairBoard {
    pub pairs: Vec<PairArbitrage>,
    pub tier: VipTier,
    pub updated_at: DateTime<Utc>,
}

impl PairBoard {
    fn empty(tier: VipTier) -> Self {
        Self {
            pairs: Vec::new(),
            tier,
            updated_at: Utc::now(),
        }
    }

    /// Pairs where any style and any recovery path breaks even.
    pub fn profitable(&self) -> impl Iterator<Item = &PairArbitrage> {
        self.pairs.iter().filter(|p| p.arbitrage.any_can_profit())
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PairArbitrage> {
        self.pairs.iter().find(|p| p.name == name)
    }
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Default)]
struct EngineState {
    tier: VipTier,
    home: VenueSnapshot,
    counterparty: VenueSnapshot,
}

impl EngineState {
    fn snapshot_mut(&mut self, venue: Venue) -> &mut VenueSnapshot {
        match venue {
            Venue::Hyperliquid => &mut self.home,
            Venue::Ostium => &mut self.counterparty,
        }
    }

    fn snapshot(&self, venue: Venue) -> &VenueSnapshot {
        match venue {
            Venue::Hyperliquid => &self.home,
            Venue::Ostium => &self.counterparty,
        }
    }
}

/// Cross-venue arbitrage engine.
///
/// Safe to share behind an `Arc` between producers and readers.
#[derive(Debug)]
pub struct ArbitrageEngine {
    resolver: FeeResolver,
    matcher: IdentityMatcher,
    calculator: PairEconomicsCalculator,
    state: Mutex<EngineState>,
    board: watch::Sender<Arc<PairBoard>>,
}

impl Default for ArbitrageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitrageEngine {
    /// Creates an engine with default fee lists, synonyms and sizing at tier 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(
            FeeResolver::new(),
            IdentityMatcher::from(&MatchingConfig::default()),
            PairEconomicsCalculator::new(),
            VipTier::default(),
        )
    }

    /// Creates an engine from explicit components.
    #[must_use]
    pub fn with_parts(
        resolver: FeeResolver,
        matcher: IdentityMatcher,
        calculator: PairEconomicsCalculator,
        tier: VipTier,
    ) -> Self {
        let (board, _) = watch::channel(Arc::new(PairBoard::empty(tier)));
        Self {
            resolver,
            matcher,
            calculator,
            state: Mutex::new(EngineState {
                tier,
                ..EngineState::default()
            }),
            board,
        }
    }

    /// Creates an engine from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_parts(
            FeeResolver::with_config(FeeConfig::from(&config.fees)),
            IdentityMatcher::from(&config.matching),
            PairEconomicsCalculator::with_config(EconomicsConfig::from(&config.engine)),
            VipTier::new(i64::from(config.engine.vip_tier)),
        )
    }

    #[must_use]
    pub fn tier(&self) -> VipTier {
        self.state.lock().tier
    }

    /// Latest published pair board.
    #[must_use]
    pub fn pairs(&self) -> Arc<PairBoard> {
        Arc::clone(&self.board.borrow())
    }

    /// Receiver notified on every publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<PairBoard>> {
        self.board.subscribe()
    }

    /// Latest annotated snapshot for a venue, in priority order.
    #[must_use]
    pub fn venue_snapshot(&self, venue: Venue) -> VenueSnapshot {
        self.state.lock().snapshot(venue).clone()
    }

    /// Replaces a venue's snapshot and republishes the pair board.
    pub fn update_venue(&self, venue: Venue, quotes: Vec<Quote>) -> Arc<PairBoard> {
        let mut state = self.state.lock();
        let tier = state.tier;

        let mut contracts: Vec<AnnotatedQuote> =
            quotes.into_iter().map(|q| self.annotate(venue, q, tier)).collect();
        self.matcher.priority().sort_quotes(&mut contracts);

        debug!(venue = %venue, contracts = contracts.len(), "Venue snapshot replaced");
        *state.snapshot_mut(venue) = VenueSnapshot {
            contracts,
            updated_at: Some(Utc::now()),
        };

        self.publish(&state)
    }

    /// Changes the VIP tier, clamping into range, and returns the applied tier.
    ///
    /// Stored snapshots are re-annotated at the new tier and the board is
    /// republished. Pairs are only computed when both venues have data, but
    /// the published tier always follows the change.
    pub fn set_tier(&self, tier: i64) -> VipTier {
        let tier = VipTier::new(tier);
        let mut state = self.state.lock();
        let previous = state.tier;
        state.tier = tier;

        for venue in [Venue::Hyperliquid, Venue::Ostium] {
            let snapshot = state.snapshot_mut(venue);
            for contract in &mut snapshot.contracts {
                contract.fee = self.resolve_fee(venue, &contract.quote, tier);
            }
        }

        info!(from = %previous, to = %tier, "VIP tier changed");

        self.publish(&state);
        tier
    }

    /// Rebuilds and republishes the pair board from current state.
    pub fn refresh(&self) -> Arc<PairBoard> {
        let state = self.state.lock();
        self.publish(&state)
    }

    // Caller holds the state lock, so publish order matches mutation order.
    fn publish(&self, state: &EngineState) -> Arc<PairBoard> {
        let board = Arc::new(self.recompute(state));
        info!(
            pairs = board.pairs.len(),
            profitable = board.profitable().count(),
            tier = %board.tier,
            "Pair board recomputed"
        );
        self.board.send_replace(Arc::clone(&board));
        board
    }

    fn recompute(&self, state: &EngineState) -> PairBoard {
        let mut board = PairBoard::empty(state.tier);
        if state.home.is_empty() || state.counterparty.is_empty() {
            return board;
        }

        board.pairs = self
            .matcher
            .match_pairs(&state.home.contracts, &state.counterparty.contracts)
            .into_iter()
            .map(|matched| {
                // Annotations carry display-rounded rates; economics use full precision
                let home_fee =
                    self.resolver
                        .resolve_quote(Venue::Hyperliquid, &matched.home.quote, state.tier);
                let counterparty_fee =
                    self.resolver
                        .resolve_quote(Venue::Ostium, &matched.counterparty.quote, state.tier);
                PairArbitrage {
                    arbitrage: self.calculator.evaluate(
                        &matched.home.quote,
                        &matched.counterparty.quote,
                        &home_fee,
                        &counterparty_fee,
                    ),
                    name: matched.name,
                    home: matched.home.clone(),
                    counterparty: matched.counterparty.clone(),
                }
            })
            .collect();
        board
    }

    fn annotate(&self, venue: Venue, quote: Quote, tier: VipTier) -> AnnotatedQuote {
        let fee = self.resolve_fee(venue, &quote, tier);
        AnnotatedQuote { venue, quote, fee }
    }

    fn resolve_fee(&self, venue: Venue, quote: &Quote, tier: VipTier) -> ResolvedFee {
        self.resolver.resolve_quote(venue, quote, tier).rounded(FEE_RATE_DP)
    }
}
