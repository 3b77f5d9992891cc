//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Settings for a game run, read from TOML.
///
/// Every field has a default, so an empty or missing file is valid.
///
/// ```toml
/// db_path = "luffarschack.db"
/// opponent_delay_ms = 500
/// seed = 42
/// log_file = "luffarschack.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding lifetime stats.
    db_path: PathBuf,

    /// Pause before the computer answers, in milliseconds.
    opponent_delay_ms: u64,

    /// Fixed RNG seed for the opponent's random tier.
    seed: Option<u64>,

    /// File the game writes its logs to while the terminal UI is up.
    log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("luffarschack.db"),
            opponent_delay_ms: 500,
            seed: None,
            log_file: PathBuf::from("luffarschack.log"),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading config from file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Opponent thinking delay.
    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
