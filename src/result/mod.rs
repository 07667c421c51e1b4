//! Materialized query results
//!
//! A [`ResultSet`] is the immutable snapshot of one successful execution. It
//! is built once from raw engine output, checked for shape, and afterwards only
//! ever replaced as a whole.

pub mod value;

pub use value::Value;

use crate::error::{SessionError, SessionResult};
use std::sync::Arc;

/// Columns and rows from one successful query
///
/// Rows are reference counted so a published snapshot can be handed to the
/// shell without copying cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Arc<Vec<Vec<Value>>>,
}

impl ResultSet {
    /// Build a result set, rejecting any row whose width differs from the header
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> SessionResult<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(SessionError::internal(format!(
                "row {index} has {} cells but the result has {} columns",
                row.len(),
                columns.len()
            )));
        }

        Ok(Self {
            columns,
            rows: Arc::new(rows),
        })
    }

    /// Result set with no columns and no rows, the state before any query
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Arc::new(Vec::new()),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::empty()
    }
}
