//! Interactive views derived from a result set
//!
//! - [`filter`] - free-text row filtering with regex and literal fallback
//! - [`sort`] - stable single-column ordering of visible rows
//! - [`state`] - the resulting [`ViewState`]
//! - [`layout`] - column width estimation and per-cell presentation hints
//!
//! None of these re-query the engine; they are recomputed from the current
//! result set whenever it or the filter/sort changes.

pub mod filter;
pub mod layout;
pub mod sort;
pub mod state;

pub use filter::{FilterEngine, RowMatcher};
pub use layout::{Alignment, CellHint, ColumnLayoutEstimator, ColumnWidths};
pub use sort::{SortDirection, SortSpec, SortingProcessor};
pub use state::ViewState;

use crate::result::ResultSet;

/// Filter then sort, the full pipeline behind every view refresh
pub fn project(result_set: &ResultSet, matcher: &RowMatcher, sort: Option<SortSpec>) -> ViewState {
    let mut view = FilterEngine::apply_matcher(result_set, matcher);
    if let Some(spec) = sort {
        SortingProcessor::sort_indices(result_set, view.visible_row_indices_mut(), spec);
    }
    view
}
