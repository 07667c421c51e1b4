//! Polymorphic cell values
//!
//! Engines map their native column types into [`Value`]. Everything the view
//! layer does (filtering, sizing, alignment) works on the canonical text form
//! produced by [`Value::render`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Blob(Vec<u8>),
    /// Engine-specific type already rendered to text
    Other(String),
}

impl Value {
    /// Canonical textual rendering, `Null` renders as an empty string
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Text(s) | Value::Other(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            Value::Blob(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is numeric (for sorting and alignment)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Integer(_))
    }

    /// Get numeric value if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Numeric reading of the rendered text, so `"-3.5"` stored as text
    /// still counts as a number for presentation purposes
    pub fn numeric_text(&self) -> Option<f64> {
        match self {
            Value::Integer(_) | Value::Number(_) => self.as_number(),
            Value::Text(s) | Value::Other(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_numeric_text(&self) -> bool {
        self.numeric_text().is_some()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
