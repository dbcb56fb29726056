//! Logging setup.
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`, with
//! the `--log` level as the default directive. Output goes to stderr, or to a
//! file through a non-blocking appender.

use std::fs;
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log file directory could not be created.
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),

    /// The log file could not be opened.
    #[error("failed to open log file {path}: {reason}")]
    Appender { path: String, reason: String },

    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

/// Maps a level name to a [`Level`]; unknown names mean `INFO`.
pub fn level_from_name(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// When logging to a file the returned guard must be held until exit, or
/// buffered records are lost.
pub fn init(level: Level, file: Option<&Path>) -> Result<Option<WorkerGuard>, LogError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_target(true);

    let Some(path) = file else {
        builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let appender = open_appender(dir, path)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    builder
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| LogError::Subscriber(e.to_string()))?;

    Ok(Some(guard))
}

fn open_appender(dir: &Path, path: &Path) -> Result<RollingFileAppender, LogError> {
    let appender_error = |reason: String| LogError::Appender {
        path: path.display().to_string(),
        reason,
    };
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| appender_error("no file name".into()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| appender_error(e.to_string()))
}
