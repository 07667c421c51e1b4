use serde::Serialize;

/// Derived, filtered (and possibly sorted) projection of a result set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    visible_row_indices: Vec<usize>,
    total_rows: usize,
    filter_active: bool,
}

impl ViewState {
    pub fn new(visible_row_indices: Vec<usize>, total_rows: usize, filter_active: bool) -> Self {
        Self {
            visible_row_indices,
            total_rows,
            filter_active,
        }
    }

    /// Unfiltered view over `total_rows` rows in their original order
    pub fn unfiltered(total_rows: usize) -> Self {
        Self::new((0..total_rows).collect(), total_rows, false)
    }

    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_row_indices
    }

    pub(crate) fn visible_row_indices_mut(&mut self) -> &mut [usize] {
        &mut self.visible_row_indices
    }

    /// Index into the result set of the `position`-th visible row
    pub fn source_index(&self, position: usize) -> Option<usize> {
        self.visible_row_indices.get(position).copied()
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_row_indices.len()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn is_filtered(&self) -> bool {
        self.filter_active
    }

    /// One-line row count summary for a status bar
    pub fn status_line(&self) -> String {
        if self.filter_active {
            format!("Filtered: {} of {}", self.visible_rows(), self.total_rows)
        } else {
            format!("Rows: {}", self.total_rows)
        }
    }
}
