//! Background execution of queued queries
//!
//! One worker task per session pulls jobs off an unbounded FIFO channel and
//! runs them one at a time on the blocking pool. It builds the `ResultSet`
//! off the interaction thread and hands it back as a [`Completion`]; it
//! never sees session state.

use super::events::Ticket;
use crate::engine::{Interrupter, QueryEngine};
use crate::error::{SessionError, SessionResult};
use crate::result::ResultSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type SharedEngine = Arc<Mutex<Box<dyn QueryEngine>>>;

#[derive(Debug)]
pub(crate) struct Job {
    pub ticket: Ticket,
    pub query: String,
}

#[derive(Debug)]
pub(crate) struct Completion {
    pub ticket: Ticket,
    pub query: String,
    pub outcome: SessionResult<ResultSet>,
    pub elapsed: Duration,
}

pub(crate) struct WorkerHandle {
    jobs: mpsc::UnboundedSender<Job>,
    task: JoinHandle<()>,
    interrupter: Option<Interrupter>,
    cancelled: Arc<AtomicBool>,
}

impl WorkerHandle {
    /// Spawn the worker; must be called from within a Tokio runtime
    pub fn spawn(
        engine: Box<dyn QueryEngine>,
        timeout: Duration,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        let (jobs, job_rx) = mpsc::unbounded_channel();
        let interrupter = engine.interrupter();
        let cancelled = Arc::new(AtomicBool::new(false));

        info!(
            "Starting {} worker with {:?} query timeout",
            engine.name(),
            timeout
        );

        let worker = Worker {
            engine: Arc::new(Mutex::new(engine)),
            interrupter: interrupter.clone(),
            timeout,
            cancelled: cancelled.clone(),
        };
        let task = tokio::spawn(worker.run(job_rx, completions));

        Self {
            jobs,
            task,
            interrupter,
            cancelled,
        }
    }

    pub fn dispatch(&self, job: Job) -> SessionResult<()> {
        self.jobs
            .send(job)
            .map_err(|_| SessionError::internal("query worker has stopped"))
    }

    /// Stop accepting jobs, interrupt the running one and wait for the worker to exit
    pub async fn shutdown(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(interrupter) = &self.interrupter {
            interrupter.interrupt();
        }
        drop(self.jobs);

        if let Err(e) = self.task.await {
            warn!("Query worker ended abnormally: {}", e);
        }
    }

    /// Non-async teardown used when a session is dropped without `shutdown`
    pub fn abort(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(interrupter) = &self.interrupter {
            interrupter.interrupt();
        }
        self.task.abort();
    }
}

struct Worker {
    engine: SharedEngine,
    interrupter: Option<Interrupter>,
    timeout: Duration,
    cancelled: Arc<AtomicBool>,
}

impl Worker {
    async fn run(
        self,
        mut jobs: mpsc::UnboundedReceiver<Job>,
        completions: mpsc::UnboundedSender<Completion>,
    ) {
        while let Some(job) = jobs.recv().await {
            if self.cancelled.load(Ordering::SeqCst) {
                debug!("Dropping queued query {} after shutdown", job.ticket);
                continue;
            }

            debug!("Executing query {} ({} chars)", job.ticket, job.query.len());
            let start = Instant::now();
            let (outcome, straggler) = self.execute(&job.query).await;

            let completion = Completion {
                ticket: job.ticket,
                query: job.query,
                outcome,
                elapsed: start.elapsed(),
            };
            if completions.send(completion).is_err() {
                debug!("Session closed, discarding result of {}", job.ticket);
            }

            // An interrupted call still holds the engine; never overlap executions
            if let Some(handle) = straggler {
                if self.cancelled.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(e) = handle.await {
                    warn!("Interrupted query task failed: {}", e);
                }
            }
        }

        debug!("Query worker stopped, releasing engine");
    }

    /// Run one query with the timeout applied
    ///
    /// On timeout the blocking call is interrupted and its handle returned so
    /// the caller can wait for the engine to become free.
    async fn execute(
        &self,
        query: &str,
    ) -> (SessionResult<ResultSet>, Option<JoinHandle<SessionResult<ResultSet>>>) {
        let engine = self.engine.clone();
        let query = query.to_string();
        let timeout = self.timeout;

        let mut handle = tokio::task::spawn_blocking(move || {
            let mut engine = engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let output = engine.execute(&query, timeout)?;
            ResultSet::new(output.columns, output.rows)
        });

        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(Ok(outcome)) => (outcome, None),
            Ok(Err(e)) => (
                Err(SessionError::internal(format!("query task failed: {e}"))),
                None,
            ),
            Err(_) => {
                warn!("Query exceeded {:?}, interrupting engine", timeout);
                match &self.interrupter {
                    Some(interrupter) => interrupter.interrupt(),
                    None => warn!("Engine cannot be interrupted, waiting for it to finish"),
                }
                (
                    Err(SessionError::Timeout { timeout }),
                    Some(handle),
                )
            }
        }
    }
}
