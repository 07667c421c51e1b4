//! Session configuration
//!
//! A single TOML-backed structure grouping the execution timeout, the history
//! capacity policy and the column layout heuristics. Every section has a
//! `Default` so a partial file only needs to name what it overrides.

pub mod paths;

pub use paths::{config_dir, default_config_path, CONFIG_FILE_NAME};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub timeouts: TimeoutConfig,
    pub history: HistoryConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound for a single query execution, fractions allowed
    pub query_timeout_seconds: f64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            query_timeout_seconds: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of remembered queries, `None` keeps every query
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of leading rows inspected when sizing columns
    pub sample_rows: usize,
    /// Smallest width handed out for any column
    pub min_width: u32,
    /// Extra width added around header and cell text
    pub padding: u32,
    /// Approximate width of one rendered character
    pub char_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sample_rows: 50,
            min_width: 100,
            padding: 30,
            char_width: 7,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the query timeout, mostly useful for tests and the shell
    ///
    /// The value is stored as given; a zero timeout is rejected by `validate`.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.query_timeout_seconds = timeout.as_secs_f64();
        self
    }

    pub fn with_history_capacity(mut self, capacity: Option<usize>) -> Self {
        self.history.capacity = capacity;
        self
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeouts.query_timeout_seconds).unwrap_or(Duration::MAX)
    }

    /// Load configuration from file, falling back to defaults if file doesn't exist
    pub async fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path).await
        } else {
            Ok(Self::new())
        }
    }

    /// Load configuration from TOML file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await.map_err(io_err)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seconds = self.timeouts.query_timeout_seconds;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(invalid(
                "timeouts.query_timeout_seconds",
                "must be a finite number greater than 0",
            ));
        }

        if self.history.capacity == Some(0) {
            return Err(invalid(
                "history.capacity",
                "must be greater than 0, omit it for unbounded history",
            ));
        }

        if self.layout.char_width == 0 {
            return Err(invalid("layout.char_width", "must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
