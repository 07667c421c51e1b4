//! Query history
//!
//! Most-recent-first list of query strings in which each string appears at
//! most once. Entries are compared by exact string equality only, so two
//! spellings of the same query are two entries.

use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: VecDeque<String>,
    capacity: Option<usize>,
}

impl HistoryStore {
    /// Unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// History that evicts its least recently used entries beyond `capacity`
    ///
    /// `None` keeps every entry.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Move `entry` to the front, inserting it if it is not present yet
    pub fn promote(&mut self, entry: &str) {
        if let Some(pos) = self.entries.iter().position(|e| e == entry) {
            if pos == 0 {
                return;
            }
            if let Some(existing) = self.entries.remove(pos) {
                self.entries.push_front(existing);
            }
            return;
        }

        self.entries.push_front(entry.to_string());

        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                if let Some(evicted) = self.entries.pop_back() {
                    debug!("Evicted query from history: {} chars", evicted.len());
                }
            }
        }
    }

    /// Read-only copy, most recent first
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
