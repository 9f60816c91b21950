//! Cross-venue asset identity matching.
//!
//! The venues name the same underlying differently: the home venue prefixes
//! builder-dex assets (`xyz:GOLD`) and uses plain-English commodity names,
//! the counterparty uses ISO-style tickers (`XAU`). Matching is exact after
//! normalization and an explicit synonym lookup; there is no fuzzy path.

use std::collections::HashMap;
use tracing::debug;

use perp_arb_core::MatchingConfig;

use crate::fees::NAMESPACE_DELIMITER;
use crate::types::{AnnotatedQuote, Quote};

/// Normalizes a venue symbol: drops any namespace prefix and uppercases.
///
/// Everything up to the last delimiter is dropped, so the result never
/// contains a delimiter and normalizing twice is a no-op.
#[must_use]
pub fn normalize(symbol: &str) -> String {
    let name = match symbol.rsplit_once(NAMESPACE_DELIMITER) {
        Some((_, name)) => name,
        None => symbol,
    };
    name.trim().to_uppercase()
}

// =============================================================================
// Synonyms
// =============================================================================

/// Counterparty name -> home venue name, on normalized names.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    forward: HashMap<String, String>,
}

impl SynonymTable {
    #[must_use]
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            forward: entries
                .into_iter()
                .map(|(k, v)| (normalize(k.as_ref()), normalize(v.as_ref())))
                .collect(),
        }
    }

    /// Home venue name for a normalized counterparty name; identity when unmapped.
    #[must_use]
    pub fn home_name<'a>(&'a self, counterparty_name: &'a str) -> &'a str {
        self.forward
            .get(counterparty_name)
            .map_or(counterparty_name, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

// =============================================================================
// Priority
// =============================================================================

/// Display ordering. Only affects sort order, never whether assets match.
#[derive(Debug, Clone, Default)]
pub struct PriorityList {
    ranks: HashMap<String, usize>,
    len: usize,
}

impl PriorityList {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        let mut len = 0;
        for (idx, name) in names.into_iter().enumerate() {
            ranks.entry(normalize(name.as_ref())).or_insert(idx);
            len = idx + 1;
        }
        Self { ranks, len }
    }

    /// Rank of a single name; unlisted names rank after every listed one.
    #[must_use]
    pub fn rank(&self, name: &str) -> usize {
        self.ranks.get(name).copied().unwrap_or(self.len)
    }

    /// Rank of a pair: the better rank of either side's name.
    #[must_use]
    pub fn pair_rank(&self, home_name: &str, counterparty_name: &str) -> usize {
        self.rank(home_name).min(self.rank(counterparty_name))
    }

    /// Stable sort of quotes by the rank of their normalized symbol.
    pub fn sort_quotes<T: AsRef<Quote>>(&self, quotes: &mut [T]) {
        quotes.sort_by_key(|q| self.rank(&normalize(&q.as_ref().symbol)));
    }
}

// =============================================================================
// Matcher
// =============================================================================

/// One asset tradable on both venues.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair<'a, T> {
    /// Shared name, or `"HOME / COUNTERPARTY"` when the venues disagree.
    pub name: String,
    pub home_name: String,
    pub counterparty_name: String,
    pub home: &'a T,
    pub counterparty: &'a T,
}

/// Joins two venue snapshots into comparable pairs.
#[derive(Debug, Clone, Default)]
pub struct IdentityMatcher {
    synonyms: SynonymTable,
    priority: PriorityList,
}

impl From<&MatchingConfig> for IdentityMatcher {
    fn from(config: &MatchingConfig) -> Self {
        Self::new(
            SynonymTable::new(&config.synonyms),
            PriorityList::new(&config.priority),
        )
    }
}

impl IdentityMatcher {
    #[must_use]
    pub fn new(synonyms: SynonymTable, priority: PriorityList) -> Self {
        Self { synonyms, priority }
    }

    #[must_use]
    pub fn priority(&self) -> &PriorityList {
        &self.priority
    }

    #[must_use]
    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Returns the intersection of both snapshots, ordered by priority.
    ///
    /// Pairs follow counterparty order before sorting; the sort is stable.
    /// When two home quotes normalize to the same name, the later one wins.
    #[must_use]
    pub fn match_pairs<'a, T: AsRef<Quote>>(
        &self,
        home: &'a [T],
        counterparty: &'a [T],
    ) -> Vec<MatchedPair<'a, T>> {
        let home_index: HashMap<String, &'a T> = home
            .iter()
            .map(|q| (normalize(&q.as_ref().symbol), q))
            .collect();

        let mut pairs: Vec<MatchedPair<'a, T>> = counterparty
            .iter()
            .filter_map(|cp| {
                let counterparty_name = normalize(&cp.as_ref().symbol);
                let home_name = self.synonyms.home_name(&counterparty_name).to_string();
                let home_quote = *home_index.get(&home_name)?;

                let name = if home_name == counterparty_name {
                    home_name.clone()
                } else {
                    format!("{home_name} / {counterparty_name}")
                };
                debug!(
                    pair = %name,
                    home_symbol = %home_quote.as_ref().symbol,
                    counterparty_symbol = %cp.as_ref().symbol,
                    "Matched cross-venue asset"
                );

                Some(MatchedPair {
                    name,
                    home_name,
                    counterparty_name,
                    home: home_quote,
                    counterparty: cp,
                })
            })
            .collect();

        pairs.sort_by_key(|p| self.priority.pair_rank(&p.home_name, &p.counterparty_name));
        pairs
    }
}

impl AsRef<Quote> for Quote {
    fn as_ref(&self) -> &Quote {
        self
    }
}

impl AsRef<Quote> for AnnotatedQuote {
    fn as_ref(&self) -> &Quote {
        &self.quote
    }
}
