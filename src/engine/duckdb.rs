//! DuckDB engine
//!
//! An in-memory DuckDB instance reads Parquet files straight from a query,
//! e.g. `SELECT * FROM 'data/*.parquet' LIMIT 100`.

use super::{EngineOutput, Interrupter, QueryEngine};
use crate::error::EngineError;
use crate::result::Value;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Days between 0001-01-01 and 1970-01-01, DuckDB dates count from the latter
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub struct DuckDbEngine {
    conn: Connection,
}

impl DuckDbEngine {
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let conn = Connection::open_in_memory()?;
        info!("DuckDB engine opened in memory");
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        info!("DuckDB engine opened at {:?}", path);
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl QueryEngine for DuckDbEngine {
    fn execute(&mut self, query: &str, _timeout: Duration) -> Result<EngineOutput, EngineError> {
        let mut stmt = self.conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        // DuckDB only knows the result schema once the statement has run
        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names().iter().map(|n| n.to_string()).collect())
            .unwrap_or_default();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                let value: DuckValue = row.get(index)?;
                values.push(convert(value));
            }
            out.push(values);
        }

        Ok(EngineOutput { columns, rows: out })
    }

    fn interrupter(&self) -> Option<Interrupter> {
        let handle = self.conn.interrupt_handle();
        Some(Interrupter::new(move || handle.interrupt()))
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn wide_integer<T>(value: T) -> Value
where
    T: TryInto<i64> + ToString + Copy,
{
    value
        .try_into()
        .map(Value::Integer)
        .unwrap_or_else(|_| Value::Other(value.to_string()))
}

fn convert(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Boolean(b),
        DuckValue::TinyInt(i) => Value::Integer(i.into()),
        DuckValue::SmallInt(i) => Value::Integer(i.into()),
        DuckValue::Int(i) => Value::Integer(i.into()),
        DuckValue::BigInt(i) => Value::Integer(i),
        DuckValue::UTinyInt(i) => Value::Integer(i.into()),
        DuckValue::USmallInt(i) => Value::Integer(i.into()),
        DuckValue::UInt(i) => Value::Integer(i.into()),
        DuckValue::UBigInt(i) => wide_integer(i),
        DuckValue::HugeInt(i) => wide_integer(i),
        DuckValue::Float(f) => Value::Number(f.into()),
        DuckValue::Double(f) => Value::Number(f),
        DuckValue::Decimal(d) => Value::Other(d.to_string()),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Blob(b) => Value::Blob(b),
        DuckValue::Date32(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Value::Date)
            .unwrap_or_else(|| Value::Other(days.to_string())),
        DuckValue::Timestamp(unit, v) => DateTime::from_timestamp_micros(to_micros(unit, v))
            .map(|dt| Value::Timestamp(dt.naive_utc()))
            .unwrap_or_else(|| Value::Other(v.to_string())),
        DuckValue::Time64(unit, v) => {
            let micros = to_micros(unit, v);
            u32::try_from(micros / 1_000_000)
                .ok()
                .and_then(|secs| {
                    let nanos = u32::try_from((micros % 1_000_000) * 1_000).ok()?;
                    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
                })
                .map(Value::Time)
                .unwrap_or_else(|| Value::Other(v.to_string()))
        }
        other => Value::Other(format!("{other:?}")),
    }
}
