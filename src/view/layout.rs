//! Column sizing and cell presentation hints
//!
//! Widths are advisory values for the shell. Only a bounded prefix of rows is
//! inspected, so the cost is `columns * min(rows, sample_rows)` regardless of
//! the result size.

use crate::config::LayoutConfig;
use crate::result::{ResultSet, Value};
use serde::Serialize;

/// Width hint per column index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnWidths(Vec<u32>);

impl ColumnWidths {
    pub fn get(&self, column: usize) -> Option<u32> {
        self.0.get(column).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ColumnLayoutEstimator {
    config: LayoutConfig,
}

impl ColumnLayoutEstimator {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.config.sample_rows = sample_rows;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// width = max(min_width, header + padding, widest sampled cell + padding)
    pub fn estimate(&self, result_set: &ResultSet) -> ColumnWidths {
        let sample = &result_set.rows()[..result_set.row_count().min(self.config.sample_rows)];

        let widths = result_set
            .columns()
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let header_width = self.text_width(header) + self.config.padding;
                sample
                    .iter()
                    .filter_map(|row| row.get(column))
                    .map(|cell| self.text_width(&cell.render()) + self.config.padding)
                    .fold(self.config.min_width.max(header_width), u32::max)
            })
            .collect();

        ColumnWidths(widths)
    }

    /// Width of `text` in the same units as the configured widths
    pub fn text_width(&self, text: &str) -> u32 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        chars.saturating_mul(self.config.char_width)
    }

    /// Convert a width hint back to a character count, for text-mode shells
    pub fn to_chars(&self, width: u32) -> usize {
        (width / self.config.char_width.max(1)) as usize
    }
}

impl Default for ColumnLayoutEstimator {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    Left,
    Right,
}

/// How a single cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellHint {
    pub alignment: Alignment,
    /// Numeric value below zero, shells typically highlight these
    pub negative: bool,
}

impl CellHint {
    pub fn for_value(value: &Value) -> Self {
        match value.numeric_text() {
            Some(n) => Self {
                alignment: Alignment::Right,
                negative: n < 0.0,
            },
            None => Self {
                alignment: Alignment::Left,
                negative: false,
            },
        }
    }
}
