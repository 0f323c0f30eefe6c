//! Bot configuration.

use serde::{Deserialize, Serialize};
use sleeper_alerts::DEFAULT_CHAT_URL;
use sleeper_feeds::SleeperConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved settings for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Sleeper league to watch.
    pub league_id: String,
    /// Week to check. `None` means the current NFL week, or the whole
    /// season for transactions.
    pub week: Option<u32>,
    pub sleeper: SleeperSettings,
    pub chat: ChatSettings,
    pub storage: StorageSettings,
    /// Logging level.
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            league_id: String::new(),
            week: None,
            sleeper: SleeperSettings::default(),
            chat: ChatSettings::default(),
            storage: StorageSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Sleeper API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleeperSettings {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SleeperSettings {
    fn default() -> Self {
        Self {
            base_url: SleeperConfig::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub url: String,
    /// Without a key, alerts are only logged.
    pub api_key: Option<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_CHAT_URL.to_string(),
            api_key: None,
        }
    }
}

/// Where feed snapshots are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageSettings {
    /// One `seen_<feed>.json` file per feed in `dir`.
    Files { dir: PathBuf },
    /// One row per feed in a SQLite database.
    Sqlite { url: String },
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings::Files {
            dir: PathBuf::from("."),
        }
    }
}

impl BotConfig {
    pub fn new(league_id: impl Into<String>) -> Self {
        Self {
            league_id: league_id.into(),
            ..Default::default()
        }
    }

    pub fn sleeper_config(&self) -> SleeperConfig {
        SleeperConfig {
            base_url: self.sleeper.base_url.clone(),
            league_id: self.league_id.clone(),
            timeout: Duration::from_secs(self.sleeper.timeout_secs),
        }
    }
}
