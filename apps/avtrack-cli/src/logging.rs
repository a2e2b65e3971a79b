//! Logging setup for the avtrack CLI
//!
//! Console output goes to stderr so stdout stays clean for reports. An
//! optional log file is written through a non-blocking appender; keep the
//! returned guard alive until the program exits or buffered lines are lost.

use avtrack_core::{AvtrackError, LoggingConfig};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error types for logging setup
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    FileOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Filter compilation failed: {0}")]
    FilterCompilation(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

impl From<LoggingError> for AvtrackError {
    fn from(error: LoggingError) -> Self {
        AvtrackError::configuration(error.to_string())
    }
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Level directive used when `RUST_LOG` is not set
#[must_use]
pub fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Build the event filter; `RUST_LOG` wins over the configured level
///
/// # Errors
/// Returns an error if the configured directive does not parse
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = default_directive(config, verbose);
    EnvFilter::try_new(&directive)
        .map_err(|e| LoggingError::FilterCompilation(format!("'{directive}': {e}")))
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::FileOpen {
            path: path.display().to_string(),
            source,
        })
}

/// Install the global subscriber
///
/// # Errors
/// Returns an error if the log file cannot be opened, the filter does not
/// parse, or a subscriber is already installed
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(config, verbose)?;

    let (file_writer, guard) = match &config.log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let json = config.json_logs;
    let console_text = (!json).then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(verbose)
    });
    let console_json = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_target(true)
    });
    let file_text = file_writer.clone().filter(|_| !json).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });
    let file_json = file_writer.filter(|_| json).map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_text)
        .with(console_json)
        .with(file_text)
        .with(file_json)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        json = json,
        log_file = ?config.log_file,
        "Logging initialized"
    );
    Ok(guard)
}
