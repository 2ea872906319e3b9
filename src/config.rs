//! Game configuration.

use std::path::Path;
use std::time::Duration;

use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Configuration for the counting game.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct GameConfig {
    /// Accepted counts that are an exact multiple of this interval trigger
    /// a celebratory announcement. 0 disables milestone announcements.
    #[serde(default = "default_milestone_interval")]
    milestone_interval: u64,

    /// How long a violation notice stays visible before removal, in seconds.
    #[serde(default = "default_notice_ttl_secs")]
    notice_ttl_secs: u64,

    /// Path of the SQLite database backing the game store.
    #[serde(default = "default_db_path")]
    db_path: String,
}

fn default_milestone_interval() -> u64 {
    100
}

fn default_notice_ttl_secs() -> u64 {
    3
}

fn default_db_path() -> String {
    "counting_game.db".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            milestone_interval: default_milestone_interval(),
            notice_ttl_secs: default_notice_ttl_secs(),
            db_path: default_db_path(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            milestone_interval = config.milestone_interval,
            notice_ttl_secs = config.notice_ttl_secs,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Whether an accepted count triggers a milestone announcement.
    pub fn is_milestone(&self, count: u64) -> bool {
        self.milestone_interval > 0 && count % self.milestone_interval == 0
    }

    /// Returns the milestone interval (0 means disabled).
    pub fn milestone_interval(&self) -> u64 {
        self.milestone_interval
    }

    /// How long a violation notice stays visible before removal.
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }

    /// Returns the path of the backing SQLite database.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
