//! SQL execution backends
//!
//! The session treats an engine as an opaque, synchronous call that turns a
//! query string into column names and rows. Calls always run on a blocking
//! worker thread, never on the interaction thread.
//!
//! Implementations:
//! - [`SqliteEngine`] - SQLite through `rusqlite`, in memory or on disk
//! - `DuckDbEngine` - DuckDB, able to query Parquet files directly (feature `duckdb`)

#[cfg(feature = "duckdb")]
pub mod duckdb;
pub mod sqlite;

#[cfg(feature = "duckdb")]
pub use self::duckdb::DuckDbEngine;
pub use sqlite::SqliteEngine;

use crate::error::EngineError;
use crate::result::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Raw output of one execution, before shape validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Thread-safe handle that aborts whatever the engine is currently running
#[derive(Clone)]
pub struct Interrupter(Arc<dyn Fn() + Send + Sync>);

impl Interrupter {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn interrupt(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Interrupter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Interrupter")
    }
}

/// A SQL execution service owned by exactly one session
///
/// `execute` may be retried with the same arguments; the session itself never
/// does so automatically. The `timeout` is advisory for the engine: the
/// session enforces it independently and uses [`QueryEngine::interrupter`] to
/// stop a query that overruns it.
pub trait QueryEngine: Send {
    fn execute(&mut self, query: &str, timeout: Duration) -> Result<EngineOutput, EngineError>;

    /// Handle used to cancel an in-flight `execute` from another thread
    fn interrupter(&self) -> Option<Interrupter> {
        None
    }

    /// Short engine name for logs
    fn name(&self) -> &'static str {
        "engine"
    }
}

impl<E: QueryEngine + ?Sized> QueryEngine for Box<E> {
    fn execute(&mut self, query: &str, timeout: Duration) -> Result<EngineOutput, EngineError> {
        (**self).execute(query, timeout)
    }

    fn interrupter(&self) -> Option<Interrupter> {
        (**self).interrupter()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
