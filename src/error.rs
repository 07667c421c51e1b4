//! Error types for query sessions, engines and configuration
//!
//! Every failure of a submitted query ends up as a [`SessionError`], whose
//! `Display` text is what the presentation shell shows in a `QueryFailed`
//! event. None of these errors ever clear existing session state.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a query engine, message passed through verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(feature = "duckdb")]
impl From<duckdb::Error> for EngineError {
    fn from(err: duckdb::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors surfaced by [`crate::session::QuerySession`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Query cannot be blank")]
    InvalidQuery,

    #[error("Query timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SessionError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short machine-friendly name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidQuery => "invalid_query",
            Self::Timeout { .. } => "timeout",
            Self::Engine(_) => "engine",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("No platform configuration directory available")]
    NoConfigDir,
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
