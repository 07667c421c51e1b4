//! # Engine Contract Tests
//!
//! How the session calls its engine and how it treats malformed engine
//! output, using a mocked engine.

use mockall::mock;
use mockall::predicate::eq;
use parq_sql::{
    EngineError, EngineOutput, QueryEngine, QuerySession, SessionConfig, SessionEvent, Value,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

mock! {
    pub Engine {}

    impl QueryEngine for Engine {
        fn execute(&mut self, query: &str, timeout: Duration) -> Result<EngineOutput, EngineError>;
    }
}

fn output(columns: &[&str], rows: Vec<Vec<Value>>) -> EngineOutput {
    EngineOutput {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

#[tokio::test]
async fn test_engine_receives_query_and_configured_timeout() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute()
        .with(eq("SELECT answer"), eq(Duration::from_secs(7)))
        .times(1)
        .returning(|_, _| Ok(output(&["answer"], vec![vec![Value::Integer(42)]])));

    let config = SessionConfig::default().with_query_timeout(Duration::from_secs(7));
    let mut session = QuerySession::new(engine, config).unwrap();

    session.submit("SELECT answer").unwrap();
    session.drain().await;

    assert_eq!(session.current_row(0).unwrap(), &[Value::Integer(42)]);
    session.shutdown().await;
}

#[tokio::test]
async fn test_blank_query_never_reaches_engine() {
    let mut engine = MockEngine::new();
    engine.expect_execute().never();

    let mut session = QuerySession::new(engine, SessionConfig::default()).unwrap();
    assert!(session.submit("   ").is_err());
    assert!(session.drain().await.is_empty());
    session.shutdown().await;
}

#[tokio::test]
async fn test_ragged_rows_are_an_internal_error() {
    let mut engine = MockEngine::new();
    let mut calls = 0;
    engine.expect_execute().times(2).returning(move |_, _| {
        calls += 1;
        if calls == 1 {
            Ok(output(
                &["a", "b"],
                vec![vec![Value::Integer(1), Value::Integer(2)]],
            ))
        } else {
            Ok(output(
                &["a", "b"],
                vec![
                    vec![Value::Integer(3), Value::Integer(4)],
                    vec![Value::Integer(5)],
                ],
            ))
        }
    });

    let mut session = QuerySession::new(engine, SessionConfig::default()).unwrap();
    session.submit("SELECT good").unwrap();
    session.submit("SELECT ragged").unwrap();
    let applied = session.drain().await;

    match &applied[1] {
        SessionEvent::QueryFailed { message, .. } => {
            assert!(message.starts_with("Internal error"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }

    // Previous result survives untouched
    assert_eq!(session.result_set().row_count(), 1);
    assert_eq!(
        session.current_row(0).unwrap(),
        &[Value::Integer(1), Value::Integer(2)]
    );
    assert_eq!(session.history_snapshot(), vec!["SELECT good"]);
    session.shutdown().await;
}

#[tokio::test]
async fn test_empty_result_keeps_columns() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute()
        .returning(|_, _| Ok(output(&["id", "name"], Vec::new())));

    let mut session = QuerySession::new(engine, SessionConfig::default()).unwrap();
    let ticket = session.submit("SELECT * FROM empty").unwrap();

    assert_eq!(
        session.pump().await,
        Some(SessionEvent::QueryCompleted {
            ticket,
            columns: vec!["id".into(), "name".into()],
            row_count: 0,
        })
    );
    assert_eq!(session.view().status_line(), "Rows: 0");
    assert_eq!(session.current_widths().len(), 2);
    session.shutdown().await;
}

#[tokio::test]
async fn test_engine_error_message_passes_through() {
    let mut engine = MockEngine::new();
    engine
        .expect_execute()
        .returning(|_, _| Err(EngineError::new("IO Error: No files found that match the pattern")));

    let mut session = QuerySession::new(engine, SessionConfig::default()).unwrap();
    session.submit("SELECT * FROM 'nowhere/*.parquet'").unwrap();

    assert!(matches!(
        session.pump().await,
        Some(SessionEvent::QueryFailed { message, .. })
            if message == "IO Error: No files found that match the pattern"
    ));
    assert!(session.history_snapshot().is_empty());
    session.shutdown().await;
}
