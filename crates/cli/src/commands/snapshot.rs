//! Venue snapshot files.
//!
//! A snapshot file holds normalized quotes for one venue, either as a bare
//! JSON array or wrapped as `{"contracts": [...]}` (the shape the engine
//! publishes per venue).

use anyhow::{Context, Result};
use perp_arb_cross::Quote;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Bare(Vec<Quote>),
    Wrapped { contracts: Vec<Quote> },
}

/// Reads and parses a venue snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn load_quotes(path: &Path) -> Result<Vec<Quote>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    parse_quotes(&raw).with_context(|| format!("Invalid snapshot {}", path.display()))
}

/// Async variant of [`load_quotes`] for use inside runtime tasks.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub async fn load_quotes_async(path: &Path) -> Result<Vec<Quote>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    parse_quotes(&raw).with_context(|| format!("Invalid snapshot {}", path.display()))
}

fn parse_quotes(raw: &str) -> Result<Vec<Quote>> {
    let file: SnapshotFile = serde_json::from_str(raw)?;
    Ok(match file {
        SnapshotFile::Bare(quotes) | SnapshotFile::Wrapped { contracts: quotes } => quotes,
    })
}
