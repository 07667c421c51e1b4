//! Shared engines and fixtures for session tests

use parq_sql::{
    EngineError, EngineOutput, Interrupter, QueryEngine, QuerySession, ResultSet, SessionConfig,
    SqliteEngine, Value,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Ten rows, one integer column `x` counting from 1
pub const TEN_ROWS: &str = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 10) SELECT x FROM c";

pub const FRUIT: &str = "SELECT 'apple' AS fruit, 1 AS qty UNION ALL SELECT 'Banana', -2";

pub fn sqlite_session() -> QuerySession {
    QuerySession::new(
        SqliteEngine::open_in_memory().unwrap(),
        SessionConfig::default(),
    )
    .unwrap()
}

pub fn text_rows(column: &str, cells: &[&str]) -> ResultSet {
    ResultSet::new(
        vec![column.to_string()],
        cells.iter().map(|c| vec![Value::Text(c.to_string())]).collect(),
    )
    .unwrap()
}

/// Observable state shared between a [`ScriptedEngine`] and the test body
#[derive(Default)]
pub struct EngineTrace {
    pub executed: Mutex<Vec<String>>,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub interrupts: AtomicUsize,
    pub dropped: AtomicBool,
    interrupt_flag: AtomicBool,
}

impl EngineTrace {
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn interrupts(&self) -> usize {
        self.interrupts.load(Ordering::SeqCst)
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Engine driven by the query text
///
/// - `HANG ...` blocks until interrupted
/// - `SLOW ...` sleeps for [`SLOW_QUERY`] and ignores interrupts
/// - `FAIL ...` returns an engine error
/// - anything else returns one row echoing the query after `delay`
pub struct ScriptedEngine {
    trace: Arc<EngineTrace>,
    delay: Duration,
    interruptible: bool,
}

/// How long a `SLOW` query holds the engine
pub const SLOW_QUERY: Duration = Duration::from_millis(1500);

impl ScriptedEngine {
    pub fn new(delay: Duration) -> (Self, Arc<EngineTrace>) {
        Self::build(delay, true)
    }

    /// Engine that offers no interrupter, like a backend without cancellation
    pub fn uninterruptible(delay: Duration) -> (Self, Arc<EngineTrace>) {
        Self::build(delay, false)
    }

    fn build(delay: Duration, interruptible: bool) -> (Self, Arc<EngineTrace>) {
        let trace = Arc::new(EngineTrace::default());
        (
            Self {
                trace: trace.clone(),
                delay,
                interruptible,
            },
            trace,
        )
    }

    fn run(&self, query: &str) -> Result<EngineOutput, EngineError> {
        if query.starts_with("HANG") {
            while !self.trace.interrupt_flag.swap(false, Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(5));
            }
            return Err(EngineError::new("interrupted"));
        }

        if query.starts_with("SLOW") {
            thread::sleep(SLOW_QUERY);
        }

        thread::sleep(self.delay);

        if let Some(rest) = query.strip_prefix("FAIL") {
            return Err(EngineError::new(format!("no such table:{rest}")));
        }

        Ok(EngineOutput {
            columns: vec!["query".into()],
            rows: vec![vec![Value::Text(query.to_string())]],
        })
    }
}

impl QueryEngine for ScriptedEngine {
    fn execute(&mut self, query: &str, _timeout: Duration) -> Result<EngineOutput, EngineError> {
        let active = self.trace.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.trace.max_active.fetch_max(active, Ordering::SeqCst);
        self.trace.executed.lock().unwrap().push(query.to_string());

        let outcome = self.run(query);

        self.trace.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn interrupter(&self) -> Option<Interrupter> {
        if !self.interruptible {
            return None;
        }
        let trace = self.trace.clone();
        Some(Interrupter::new(move || {
            trace.interrupts.fetch_add(1, Ordering::SeqCst);
            trace.interrupt_flag.store(true, Ordering::SeqCst);
        }))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

impl Drop for ScriptedEngine {
    fn drop(&mut self) {
        self.trace.dropped.store(true, Ordering::SeqCst);
    }
}

/// Poll `condition` for up to two seconds
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
