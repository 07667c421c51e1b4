//! Row filtering over a materialized result set
//!
//! A filter is one free-text pattern. It is tried as a case-insensitive
//! regular expression first; a pattern that does not compile is matched as a
//! literal case-insensitive substring instead, so filtering never fails.
//! A row is visible when the pattern matches inside any one of its rendered
//! cells.

use super::state::ViewState;
use crate::result::{ResultSet, Value};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Compiled size cap for user patterns, larger patterns fall back to literal matching
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Compiled form of a filter pattern
#[derive(Debug, Clone)]
pub enum RowMatcher {
    /// Empty pattern, every row is visible
    All,
    Regex(Regex),
    /// Lowercased needle for literal substring matching
    Literal(String),
}

impl RowMatcher {
    pub fn compile(pattern: &str) -> Self {
        if pattern.is_empty() {
            return Self::All;
        }

        match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(MAX_REGEX_SIZE)
            .build()
        {
            Ok(re) => Self::Regex(re),
            Err(e) => {
                debug!("Filter pattern is not a valid regex, matching literally: {}", e);
                Self::Literal(pattern.to_lowercase())
            }
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Self::All => true,
            Self::Regex(re) => re.is_match(text),
            Self::Literal(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }

    /// True when the pattern is found inside any single cell of the row
    pub fn matches_row(&self, row: &[Value]) -> bool {
        match self {
            Self::All => true,
            _ => row.iter().any(|cell| self.matches_text(&cell.render())),
        }
    }
}

/// Derives the visible row subset of a result set
pub struct FilterEngine;

impl FilterEngine {
    /// Filter `result_set` by `pattern`, keeping the original row order
    pub fn apply(result_set: &ResultSet, pattern: &str) -> ViewState {
        let matcher = RowMatcher::compile(pattern);
        Self::apply_matcher(result_set, &matcher)
    }

    pub fn apply_matcher(result_set: &ResultSet, matcher: &RowMatcher) -> ViewState {
        let visible: Vec<usize> = result_set
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| matcher.matches_row(row))
            .map(|(index, _)| index)
            .collect();

        ViewState::new(
            visible,
            result_set.row_count(),
            !matches!(matcher, RowMatcher::All),
        )
    }
}
