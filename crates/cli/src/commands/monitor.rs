//! Continuous monitoring over venue snapshot files.
//!
//! Each venue has its own producer task that re-reads its snapshot file on
//! an independent cadence and pushes changed snapshots into the shared
//! engine. A consumer task follows the published pair boards and raises
//! alerts; the config watcher applies VIP tier changes live.
//!
//! ## Example Usage
//!
//! ```bash
//! perp-arb monitor --home data/hyperliquid_sample.json \
//!     --counterparty data/ostium_sample.json --home-interval-secs 2
//! ```

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use perp_arb_core::{AppConfig, ConfigWatcher};
use perp_arb_cross::{ArbitrageEngine, OpportunityAlerter, Quote, Venue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::load_config;
use super::snapshot::load_quotes_async;

/// How long the consumer waits for a new board before rechecking shutdown.
const BOARD_WAIT: Duration = Duration::from_millis(500);

/// Arguments for the monitor command.
#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Hyperliquid snapshot file (JSON quotes)
    #[arg(long)]
    pub home: PathBuf,

    /// Ostium snapshot file (JSON quotes)
    #[arg(long)]
    pub counterparty: PathBuf,

    /// Config file path; watched for VIP tier changes when it exists
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: PathBuf,

    /// Re-read interval for the Hyperliquid file in seconds
    #[arg(long, default_value = "2")]
    pub home_interval_secs: u64,

    /// Re-read interval for the Ostium file in seconds (defaults to feeds.poll_interval_secs)
    #[arg(long)]
    pub counterparty_interval_secs: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    pub duration_secs: Option<u64>,
}

/// Counters for the monitoring session.
#[derive(Debug, Default)]
struct MonitorStats {
    home_updates: AtomicU64,
    counterparty_updates: AtomicU64,
    read_failures: AtomicU64,
    boards_seen: AtomicU64,
    alerts_raised: AtomicU64,
}

impl MonitorStats {
    fn record_update(&self, venue: Venue) {
        let counter = match venue {
            Venue::Hyperliquid => &self.home_updates,
            Venue::Ostium => &self.counterparty_updates,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn log_summary(&self, elapsed: Duration) {
        let elapsed_mins = elapsed.as_secs_f64() / 60.0;
        tracing::info!("========================================");
        tracing::info!("         SESSION SUMMARY                ");
        tracing::info!("========================================");
        tracing::info!("Runtime:              {:.1} minutes", elapsed_mins);
        tracing::info!("Snapshot Updates:");
        tracing::info!("  Hyperliquid:        {}", self.home_updates.load(Ordering::Relaxed));
        tracing::info!("  Ostium:             {}", self.counterparty_updates.load(Ordering::Relaxed));
        tracing::info!("  Read Failures:      {}", self.read_failures.load(Ordering::Relaxed));
        tracing::info!("----------------------------------------");
        tracing::info!("Boards Seen:          {}", self.boards_seen.load(Ordering::Relaxed));
        tracing::info!("Alerts Raised:        {}", self.alerts_raised.load(Ordering::Relaxed));
        tracing::info!("========================================");
    }
}

fn log_config_summary(args: &MonitorArgs, config: &AppConfig, counterparty_interval: u64) {
    tracing::info!("========================================");
    tracing::info!("  PERP ARBITRAGE MONITOR CONFIG         ");
    tracing::info!("========================================");
    tracing::info!("Position Size:         ${}", config.engine.position_size_usd);
    tracing::info!("Max Funding Hours:     {}", config.engine.max_funding_hours);
    tracing::info!("VIP Tier:              {}", config.engine.vip_tier);
    tracing::info!("Referral Discount:     {}%", config.fees.referral_discount_pct);
    tracing::info!("----------------------------------------");
    tracing::info!("Feeds:");
    tracing::info!("  Hyperliquid:         {} every {}s", args.home.display(), args.home_interval_secs);
    tracing::info!("  Ostium:              {} every {}s", args.counterparty.display(), counterparty_interval);
    tracing::info!("----------------------------------------");
    tracing::info!("Alerts:");
    tracing::info!("  Monitored:           {}", config.alerts.monitored_assets.join(", "));
    tracing::info!("  Cooldown:            {}s", config.alerts.cooldown_secs);
    if let Some(secs) = args.duration_secs {
        tracing::info!("  Duration:            {}s", secs);
    } else {
        tracing::info!("  Duration:            indefinite");
    }
    tracing::info!("========================================");
}

/// Runs the monitor command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run_monitor(args: MonitorArgs) -> Result<()> {
    let config_exists = args.config.exists();
    let config = load_config(config_exists.then_some(args.config.as_path()))?;
    let counterparty_interval = args
        .counterparty_interval_secs
        .unwrap_or(config.feeds.poll_interval_secs);

    log_config_summary(&args, &config, counterparty_interval);

    let engine = Arc::new(ArbitrageEngine::from_config(&config));
    let stats = Arc::new(MonitorStats::default());
    let start_time = std::time::Instant::now();

    // Set up shutdown signal
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            running_clone.store(false, Ordering::SeqCst);
        }
    });

    let mut tasks: Vec<JoinHandle<()>> = vec![
        spawn_producer(
            Venue::Hyperliquid,
            args.home.clone(),
            Duration::from_secs(args.home_interval_secs.max(1)),
            Arc::clone(&engine),
            Arc::clone(&stats),
            Arc::clone(&running),
        ),
        spawn_producer(
            Venue::Ostium,
            args.counterparty.clone(),
            Duration::from_secs(counterparty_interval.max(1)),
            Arc::clone(&engine),
            Arc::clone(&stats),
            Arc::clone(&running),
        ),
        spawn_alert_consumer(
            OpportunityAlerter::from(&config.alerts),
            Arc::clone(&engine),
            Arc::clone(&stats),
            Arc::clone(&running),
        ),
    ];

    if config_exists {
        tasks.extend(spawn_config_watch(args.config.clone(), config, Arc::clone(&engine)));
    } else {
        tracing::info!(path = %args.config.display(), "Config file not found, using defaults without hot reload");
    }

    tracing::info!("Monitoring started, press Ctrl+C to stop");

    while running.load(Ordering::SeqCst) {
        if let Some(secs) = args.duration_secs {
            if start_time.elapsed() >= Duration::from_secs(secs) {
                tracing::info!("Duration limit reached, stopping...");
                running.store(false, Ordering::SeqCst);
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    for task in tasks {
        task.abort();
    }

    stats.log_summary(start_time.elapsed());
    tracing::info!("Perp arbitrage monitor stopped");
    Ok(())
}

fn spawn_producer(
    venue: Venue,
    path: PathBuf,
    interval: Duration,
    engine: Arc<ArbitrageEngine>,
    stats: Arc<MonitorStats>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut last: Option<Vec<Quote>> = None;

        while running.load(Ordering::SeqCst) {
            ticker.tick().await;

            let quotes = match load_quotes_async(&path).await {
                Ok(quotes) => quotes,
                Err(e) => {
                    stats.read_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(venue = %venue, "Snapshot read failed: {:#}", e);
                    continue;
                }
            };
            if last.as_ref() == Some(&quotes) {
                continue;
            }

            last = Some(quotes.clone());
            engine.update_venue(venue, quotes);
            stats.record_update(venue);
        }
    })
}

fn spawn_alert_consumer(
    mut alerter: OpportunityAlerter,
    engine: Arc<ArbitrageEngine>,
    stats: Arc<MonitorStats>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut boards = engine.subscribe();

        while running.load(Ordering::SeqCst) {
            match tokio::time::timeout(BOARD_WAIT, boards.changed()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_) => continue,
            }

            let board = Arc::clone(&boards.borrow_and_update());
            stats.boards_seen.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                pairs = board.pairs.len(),
                profitable = board.profitable().count(),
                "Pair board received"
            );

            let alerts = alerter.check_and_log(&board, Utc::now());
            stats
                .alerts_raised
                .fetch_add(alerts.len() as u64, Ordering::Relaxed);
        }
    })
}

fn spawn_config_watch(
    path: PathBuf,
    initial: AppConfig,
    engine: Arc<ArbitrageEngine>,
) -> Vec<JoinHandle<()>> {
    let (watcher, mut updates) = ConfigWatcher::new(initial);

    let watch_task = tokio::spawn(async move {
        if let Err(e) = watcher.watch(&path).await {
            tracing::error!("Config watcher stopped: {:#}", e);
        }
    });

    let apply_task = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let tier = updates.borrow_and_update().engine.vip_tier;
            if i64::from(tier) != i64::from(engine.tier().value()) {
                let applied = engine.set_tier(i64::from(tier));
                tracing::info!(requested = tier, applied = %applied, "Applied VIP tier from config");
            }
        }
    });

    vec![watch_task, apply_task]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record_per_venue() {
        let stats = MonitorStats::default();
        stats.record_update(Venue::Hyperliquid);
        stats.record_update(Venue::Hyperliquid);
        stats.record_update(Venue::Ostium);
        assert_eq!(stats.home_updates.load(Ordering::Relaxed), 2);
        assert_eq!(stats.counterparty_updates.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_producer_pushes_snapshot_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.json");
        std::fs::write(&path, r#"[{"symbol": "BTC", "mid": "100000"}]"#).unwrap();

        let engine = Arc::new(ArbitrageEngine::new());
        let stats = Arc::new(MonitorStats::default());
        let running = Arc::new(AtomicBool::new(true));

        let task = spawn_producer(
            Venue::Hyperliquid,
            path,
            Duration::from_millis(10),
            Arc::clone(&engine),
            Arc::clone(&stats),
            Arc::clone(&running),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        running.store(false, Ordering::SeqCst);
        task.await.unwrap();

        // Unchanged file contents are pushed only once
        assert_eq!(stats.home_updates.load(Ordering::Relaxed), 1);
        assert_eq!(engine.venue_snapshot(Venue::Hyperliquid).contracts.len(), 1);
    }
}
