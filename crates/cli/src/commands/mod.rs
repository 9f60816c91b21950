//! CLI commands for the perp arbitrage monitor.

pub mod fees;
pub mod monitor;
pub mod scan;
pub mod snapshot;

pub use fees::{run_fees, FeesArgs};
pub use monitor::{run_monitor, MonitorArgs};
pub use scan::{run_scan, ScanArgs};

use anyhow::Result;
use perp_arb_core::{AppConfig, ConfigLoader};
use std::path::Path;

/// Loads the layered configuration, from `path` when given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => ConfigLoader::load_from(path),
        None => ConfigLoader::load(),
    }
}
