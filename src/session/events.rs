use serde::Serialize;
use std::fmt;

/// Identifies one accepted submission, in submission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications published to the presentation shell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    QueryCompleted {
        ticket: Ticket,
        columns: Vec<String>,
        row_count: usize,
    },
    /// `ticket` is `None` for submissions rejected before dispatch
    QueryFailed {
        ticket: Option<Ticket>,
        message: String,
    },
    ViewUpdated {
        visible_rows: usize,
        total_rows: usize,
    },
}

/// Where the session is in its `Idle -> Running -> Idle` cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running {
        /// Submission currently being executed
        ticket: Ticket,
        /// Submissions waiting behind it
        queued: usize,
    },
}
