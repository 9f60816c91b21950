pub mod config;
pub mod config_loader;
pub mod config_watcher;

pub use config::{
    AlertConfig, AppConfig, ConfigError, EngineConfig, FeeSettings, FeedConfig, MatchingConfig,
};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use config_watcher::ConfigWatcher;
