use super::{EngineOutput, Interrupter, QueryEngine};
use crate::error::EngineError;
use crate::result::Value;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// SQLite-backed engine, the connection lives as long as the engine
pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let conn = Connection::open_in_memory()?;
        info!("SQLite engine opened in memory");
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        info!("SQLite engine opened at {:?}", path);
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Get the underlying connection for setup/introspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl QueryEngine for SqliteEngine {
    fn execute(&mut self, query: &str, _timeout: Duration) -> Result<EngineOutput, EngineError> {
        let mut stmt = self.conn.prepare(query)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(convert(row.get_ref(index)?));
            }
            out.push(values);
        }

        Ok(EngineOutput { columns, rows: out })
    }

    fn interrupter(&self) -> Option<Interrupter> {
        let handle = self.conn.get_interrupt_handle();
        Some(Interrupter::new(move || handle.interrupt()))
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

fn convert(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Number(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
