use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use parq_sql::config::default_config_path;
use parq_sql::shell::InteractiveRepl;
use parq_sql::{QuerySession, SessionConfig, SqliteEngine};
use std::path::PathBuf;

/// Interactive SQL over Parquet and other columnar files
///
/// # Examples
///
/// ```bash
/// # In-memory SQLite session
/// parqsql
///
/// # DuckDB session, then `\open data/` inside the shell
/// parqsql --engine duckdb
/// ```
#[derive(Parser)]
#[command(name = "parqsql")]
#[command(about = "Interactive SQL query session over columnar data files")]
#[command(version)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file to open (default: in-memory)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Query engine
    #[arg(short, long, value_enum, default_value = "sqlite")]
    engine: EngineKind,

    /// Query timeout in seconds (fractions allowed), overrides the configuration file
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Enable verbose logging for debugging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy)]
enum EngineKind {
    Sqlite,
    Duckdb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("parq_sql={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = SessionConfig::load_or_default(&config_path)
        .await
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    // Validated by `QuerySession::new`, so `--timeout 0` is an error
    if let Some(seconds) = cli.timeout {
        config.timeouts.query_timeout_seconds = seconds;
    }

    let session = match cli.engine {
        EngineKind::Sqlite => {
            let engine = match &cli.database {
                Some(path) => SqliteEngine::open(path)?,
                None => SqliteEngine::open_in_memory()?,
            };
            QuerySession::new(engine, config)?
        }
        EngineKind::Duckdb => duckdb_session(cli.database.as_deref(), config)?,
    };

    InteractiveRepl::new(session).run().await
}

#[cfg(feature = "duckdb")]
fn duckdb_session(database: Option<&std::path::Path>, config: SessionConfig) -> Result<QuerySession> {
    use parq_sql::DuckDbEngine;

    let engine = match database {
        Some(path) => DuckDbEngine::open(path)?,
        None => DuckDbEngine::open_in_memory()?,
    };
    Ok(QuerySession::new(engine, config)?)
}

#[cfg(not(feature = "duckdb"))]
fn duckdb_session(_database: Option<&std::path::Path>, _config: SessionConfig) -> Result<QuerySession> {
    anyhow::bail!("parqsql was built without DuckDB support, rebuild with `--features duckdb`")
}
