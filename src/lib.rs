//! # parqsql
//!
//! Interactive SQL sessions over columnar data files.
//!
//! A [`QuerySession`] accepts free-form SQL, runs it on a pluggable
//! [`QueryEngine`] off the interaction thread with a timeout, and keeps the
//! latest [`ResultSet`] together with a most-recent-first query history and a
//! filtered, sortable view of the rows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parq_sql::{QuerySession, SessionConfig, SqliteEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = SqliteEngine::open_in_memory()?;
//!     let mut session = QuerySession::new(engine, SessionConfig::default())?;
//!
//!     session.submit("SELECT 'apple' AS fruit UNION ALL SELECT 'banana'")?;
//!     session.drain().await;
//!
//!     session.set_filter("an");
//!     println!("{}", session.view().status_line());
//!
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`session`] - Query submission, serialized execution and state updates
//! - [`engine`] - SQL engine abstraction with SQLite and DuckDB backends
//! - [`result`] - Immutable result sets and cell values
//! - [`history`] - Most-recent-first query history
//! - [`view`] - Row filtering, sorting and column layout hints
//! - [`config`] - TOML configuration
//! - [`shell`] - Line-oriented REPL used by the `parqsql` binary

/// Session configuration loading and validation
pub mod config;
/// SQL execution backends
pub mod engine;
/// Error types and handling utilities
pub mod error;
/// Query history tracking
pub mod history;
/// Query results and cell values
pub mod result;
/// Query session orchestration
pub mod session;
/// Interactive presentation shell
pub mod shell;
/// Filtered and sorted views over results
pub mod view;

pub use config::SessionConfig;
#[cfg(feature = "duckdb")]
pub use engine::DuckDbEngine;
pub use engine::{EngineOutput, Interrupter, QueryEngine, SqliteEngine};
pub use error::{ConfigError, EngineError, SessionError, SessionResult};
pub use history::HistoryStore;
pub use result::{ResultSet, Value};
pub use session::{QuerySession, SessionEvent, SessionPhase, Ticket};
pub use view::{CellHint, ColumnWidths, SortDirection, SortSpec, ViewState};
