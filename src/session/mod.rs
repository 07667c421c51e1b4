//! Interactive query session
//!
//! A [`QuerySession`] owns one engine, the current result set, the query
//! history and the derived view. Submissions are queued to a single background
//! worker and executed strictly in order; their outcomes are applied on the
//! caller's side through [`QuerySession::pump`] so all state changes happen on
//! one logical thread.
//!
//! ```text
//!  submit ──► job queue ──► worker (spawn_blocking + timeout) ──┐
//!                                                               │
//!  pump ◄── completion queue ◄───────────────────────────────────┘
//!    │
//!    └─► ResultSet / history / view updated, SessionEvent published
//! ```

pub mod events;
mod worker;

pub use events::{SessionEvent, SessionPhase, Ticket};

use crate::config::SessionConfig;
use crate::engine::QueryEngine;
use crate::error::{ConfigError, SessionError, SessionResult};
use crate::history::HistoryStore;
use crate::result::{ResultSet, Value};
use crate::view::{
    self, CellHint, ColumnLayoutEstimator, ColumnWidths, RowMatcher, SortDirection, SortSpec,
    ViewState,
};
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};
use worker::{Completion, Job, WorkerHandle};

pub struct QuerySession {
    config: SessionConfig,
    result_set: ResultSet,
    history: HistoryStore,
    filter_text: String,
    matcher: RowMatcher,
    sort: Option<SortSpec>,
    view: ViewState,
    widths: ColumnWidths,
    estimator: ColumnLayoutEstimator,
    /// Accepted tickets whose completion has not been applied yet, oldest first
    pending: VecDeque<Ticket>,
    next_ticket: u64,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    completions: mpsc::UnboundedReceiver<Completion>,
    worker: Option<WorkerHandle>,
}

impl QuerySession {
    /// Create a session around `engine`
    ///
    /// Spawns the background worker, so this must run inside a Tokio runtime.
    pub fn new<E>(engine: E, config: SessionConfig) -> Result<Self, ConfigError>
    where
        E: QueryEngine + 'static,
    {
        config.validate()?;
        Ok(Self::build(Box::new(engine), config))
    }

    pub fn with_defaults<E>(engine: E) -> Self
    where
        E: QueryEngine + 'static,
    {
        Self::build(Box::new(engine), SessionConfig::default())
    }

    fn build(engine: Box<dyn QueryEngine>, config: SessionConfig) -> Self {
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let worker = WorkerHandle::spawn(engine, config.query_timeout(), completions_tx);

        Self {
            result_set: ResultSet::empty(),
            history: HistoryStore::with_capacity(config.history.capacity),
            filter_text: String::new(),
            matcher: RowMatcher::All,
            sort: None,
            view: ViewState::default(),
            widths: ColumnWidths::default(),
            estimator: ColumnLayoutEstimator::new(config.layout.clone()),
            pending: VecDeque::new(),
            next_ticket: 1,
            events_tx,
            events_rx: Some(events_rx),
            completions,
            worker: Some(worker),
            config,
        }
    }

    /// Hand out the event stream; only the first call returns `Some`
    ///
    /// Events are published only once the stream has been taken.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.events_rx.take()
    }

    /// Queue `query` for execution
    ///
    /// Blank input is rejected without touching the engine. Otherwise the
    /// query is queued behind any earlier submission and the returned ticket
    /// identifies its eventual completion.
    pub fn submit(&mut self, query: impl Into<String>) -> SessionResult<Ticket> {
        let query = query.into();
        if query.trim().is_empty() {
            let err = SessionError::InvalidQuery;
            warn!("Rejected submission: {}", err);
            self.emit(SessionEvent::QueryFailed {
                ticket: None,
                message: err.to_string(),
            });
            return Err(err);
        }

        let ticket = Ticket(self.next_ticket);
        let dispatched = match &self.worker {
            Some(worker) => worker.dispatch(Job { ticket, query }),
            None => Err(SessionError::internal("session is shut down")),
        };

        if let Err(err) = dispatched {
            warn!("Failed to queue query: {}", err);
            self.emit(SessionEvent::QueryFailed {
                ticket: None,
                message: err.to_string(),
            });
            return Err(err);
        }

        self.next_ticket += 1;
        self.pending.push_back(ticket);
        debug!("Queued query {} ({} pending)", ticket, self.pending.len());
        Ok(ticket)
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` right away when nothing is pending. If the worker has
    /// stopped, each pending submission is failed in turn instead.
    pub async fn pump(&mut self) -> Option<SessionEvent> {
        if self.pending.is_empty() {
            return None;
        }
        match self.completions.recv().await {
            Some(completion) => Some(self.apply(completion)),
            None => self.fail_orphan(),
        }
    }

    /// Apply a completion if one is already available
    pub fn try_pump(&mut self) -> Option<SessionEvent> {
        match self.completions.try_recv() {
            Ok(completion) => Some(self.apply(completion)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.fail_orphan(),
        }
    }

    /// Fail the oldest pending submission whose completion can never arrive
    fn fail_orphan(&mut self) -> Option<SessionEvent> {
        let ticket = self.pending.pop_front()?;
        let err = SessionError::internal("query worker has stopped");
        warn!("Query {} failed ({}): {}", ticket, err.kind(), err);

        let event = SessionEvent::QueryFailed {
            ticket: Some(ticket),
            message: err.to_string(),
        };
        self.emit(event.clone());
        Some(event)
    }

    /// Apply completions until no submission is pending
    pub async fn drain(&mut self) -> Vec<SessionEvent> {
        let mut applied = Vec::new();
        while let Some(event) = self.pump().await {
            applied.push(event);
        }
        applied
    }

    fn apply(&mut self, completion: Completion) -> SessionEvent {
        let Completion {
            ticket,
            query,
            outcome,
            elapsed,
        } = completion;

        if let Some(pos) = self.pending.iter().position(|t| *t == ticket) {
            self.pending.remove(pos);
        }

        match outcome {
            Ok(result_set) => {
                info!(
                    "Query {} returned {} rows x {} columns in {:?}",
                    ticket,
                    result_set.row_count(),
                    result_set.column_count(),
                    elapsed
                );

                self.history.promote(&query);
                self.widths = self.estimator.estimate(&result_set);
                self.result_set = result_set;
                self.filter_text.clear();
                self.matcher = RowMatcher::All;
                self.sort = None;

                let event = SessionEvent::QueryCompleted {
                    ticket,
                    columns: self.result_set.columns().to_vec(),
                    row_count: self.result_set.row_count(),
                };
                self.emit(event.clone());
                self.refresh_view();
                event
            }
            Err(err) => {
                warn!("Query {} failed ({}): {}", ticket, err.kind(), err);
                let event = SessionEvent::QueryFailed {
                    ticket: Some(ticket),
                    message: err.to_string(),
                };
                self.emit(event.clone());
                event
            }
        }
    }

    /// Restrict visible rows to those with a cell matching `text`
    ///
    /// Empty text shows every row. Text that is not a valid regular
    /// expression is matched literally. The current sort is kept.
    pub fn set_filter(&mut self, text: &str) -> &ViewState {
        self.filter_text = text.to_string();
        self.matcher = RowMatcher::compile(text);
        self.refresh_view();
        &self.view
    }

    /// Clear the filter
    pub fn clear(&mut self) -> &ViewState {
        self.set_filter("")
    }

    /// Order visible rows by `column`; returns false for an unknown column
    pub fn set_sort(&mut self, column: usize, direction: SortDirection) -> bool {
        if column >= self.result_set.column_count() {
            warn!(
                "Cannot sort by column {}, result has {} columns",
                column,
                self.result_set.column_count()
            );
            return false;
        }
        self.sort = Some(SortSpec { column, direction });
        self.refresh_view();
        true
    }

    /// Return to result order
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.refresh_view();
        }
    }

    fn refresh_view(&mut self) {
        self.view = view::project(&self.result_set, &self.matcher, self.sort);
        self.emit(SessionEvent::ViewUpdated {
            visible_rows: self.view.visible_rows(),
            total_rows: self.view.total_rows(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        if self.events_rx.is_none() && self.events_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Most recent first
    pub fn history_snapshot(&self) -> Vec<String> {
        self.history.snapshot()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn current_columns(&self) -> &[String] {
        self.result_set.columns()
    }

    /// Row of the current result set by source index
    pub fn current_row(&self, index: usize) -> Option<&[Value]> {
        self.result_set.row(index)
    }

    /// Row at `position` in the current view order
    pub fn visible_row(&self, position: usize) -> Option<&[Value]> {
        self.view
            .source_index(position)
            .and_then(|index| self.result_set.row(index))
    }

    pub fn current_widths(&self) -> &ColumnWidths {
        &self.widths
    }

    pub fn cell_hint(&self, row: usize, column: usize) -> Option<CellHint> {
        self.result_set.cell(row, column).map(CellHint::for_value)
    }

    pub fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn estimator(&self) -> &ColumnLayoutEstimator {
        &self.estimator
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of submissions whose outcome has not been applied yet
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn phase(&self) -> SessionPhase {
        match self.pending.front() {
            Some(ticket) => SessionPhase::Running {
                ticket: *ticket,
                queued: self.pending.len() - 1,
            },
            None => SessionPhase::Idle,
        }
    }

    /// Stop the worker and release the engine
    ///
    /// Queued submissions are discarded and a running one is interrupted.
    /// Completions that arrive afterwards are never applied.
    pub async fn shutdown(mut self) {
        if let Some(worker) = self.worker.take() {
            info!("Shutting down query session ({} pending)", self.pending.len());
            self.completions.close();
            worker.shutdown().await;
        }
        self.pending.clear();
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            debug!("Query session dropped without shutdown, aborting worker");
            worker.abort();
        }
    }
}
