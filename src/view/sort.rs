//! Ordering of visible rows
//!
//! Sorting never touches the result set. It only permutes the indices of the
//! rows that survived filtering, with a stable sort so equal keys keep their
//! original relative order.

use crate::result::{ResultSet, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort: one column and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

pub struct SortingProcessor;

impl SortingProcessor {
    /// Reorder `indices` (row indices into `result_set`) by `spec`
    ///
    /// Returns `false` and leaves `indices` untouched when the column does not exist.
    pub fn sort_indices(result_set: &ResultSet, indices: &mut [usize], spec: SortSpec) -> bool {
        if spec.column >= result_set.column_count() {
            return false;
        }

        indices.sort_by(|&a, &b| {
            let a_val = result_set.cell(a, spec.column).unwrap_or(&Value::Null);
            let b_val = result_set.cell(b, spec.column).unwrap_or(&Value::Null);

            let cmp = Self::compare_values(a_val, b_val);

            match spec.direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });

        true
    }

    /// Compare two values for sorting
    ///
    /// Total order: nulls first, then numbers, booleans, dates, times,
    /// timestamps, text and blobs. Integers and floats compare numerically.
    pub fn compare_values(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            // Zeros of either sign are equal, NaN sorts by sign past every number
            (Value::Number(a), Value::Number(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (Value::Integer(a), Value::Number(b)) => compare_integer_to_float(*a, *b),
            (Value::Number(a), Value::Integer(b)) => compare_integer_to_float(*b, *a).reverse(),

            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Time(a), Value::Time(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Text(a) | Value::Other(a), Value::Text(b) | Value::Other(b)) => a.cmp(b),
            (Value::Blob(a), Value::Blob(b)) => a.cmp(b),

            _ => kind_rank(a).cmp(&kind_rank(b)),
        }
    }
}

/// Exact comparison; casting the integer to `f64` would round above 2^53
fn compare_integer_to_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first float past i64::MAX
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= TWO_POW_63 {
        return Ordering::Less;
    }
    if float < -TWO_POW_63 {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        other => other,
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Integer(_) | Value::Number(_) => 1,
        Value::Boolean(_) => 2,
        Value::Date(_) => 3,
        Value::Time(_) => 4,
        Value::Timestamp(_) => 5,
        Value::Text(_) | Value::Other(_) => 6,
        Value::Blob(_) => 7,
    }
}
