use crate::config::AppConfig;
use crate::config_loader::ConfigLoader;
use anyhow::Result;
use notify::{Event, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;
use tokio::sync::watch;

/// How often the blocking watch loop checks whether every subscriber is gone.
const SHUTDOWN_POLL: Duration = Duration::from_millis(500);

pub struct ConfigWatcher {
    tx: watch::Sender<AppConfig>,
}

impl ConfigWatcher {
    /// Creates a new configuration watcher with an initial configuration.
    ///
    /// Returns a tuple of the watcher and a receiver for configuration updates.
    #[must_use]
    pub fn new(initial_config: AppConfig) -> (Self, watch::Receiver<AppConfig>) {
        let (tx, rx) = watch::channel(initial_config);
        (Self { tx }, rx)
    }

    /// Publishes a reloaded configuration if it differs from the current one.
    ///
    /// Returns true when subscribers were notified.
    pub fn publish(&self, config: AppConfig) -> bool {
        replace_if_changed(&self.tx, config)
    }

    /// Watches the configuration file for changes and broadcasts updates.
    ///
    /// Runs until the file watcher shuts down or every receiver is dropped.
    /// A file that fails to parse or validate is logged and the previous
    /// configuration stays in effect.
    ///
    /// # Errors
    ///
    /// Returns an error if file watching cannot be initiated or if the watcher task fails.
    pub async fn watch(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let tx = self.tx.clone();
        let config_path: PathBuf = config_path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            })?;

            watcher.watch(&config_path, RecursiveMode::NonRecursive)?;

            loop {
                let event = match notify_rx.recv_timeout(SHUTDOWN_POLL) {
                    Ok(event) => event,
                    Err(RecvTimeoutError::Timeout) if tx.is_closed() => break,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                if event.kind.is_modify() {
                    tracing::info!(path = %config_path.display(), "Config file changed, reloading...");
                    match ConfigLoader::load_from(&config_path) {
                        Ok(new_config) => {
                            let changed = replace_if_changed(&tx, new_config);
                            tracing::info!(changed, "Config reloaded successfully");
                        }
                        Err(e) => {
                            tracing::error!("Failed to reload config: {}", e);
                        }
                    }
                }
            }

            Ok::<_, anyhow::Error>(())
        })
        .await??;

        Ok(())
    }
}

fn replace_if_changed(tx: &watch::Sender<AppConfig>, config: AppConfig) -> bool {
    tx.send_if_modified(|current| {
        if *current == config {
            false
        } else {
            *current = config;
            true
        }
    })
}
