//! Process-wide `tracing` setup for binaries.
//!
//! The engine itself only talks to an injected [`crate::log::Logger`]; a
//! binary that routes that logger to `tracing` (via
//! [`crate::log::TracingLogger`]) calls [`init_logging`] once at startup.
//!
//! - Colourised output on stderr, with thread names and source locations
//! - Optional plain-text copy in a log file, cleared at startup
//! - Filtering through `RUST_LOG`, defaulting to the requested level

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Errors that can occur while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to prepare log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("A global logger is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// How the global subscriber should behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Level used when `RUST_LOG` is not set.
    pub level: Level,
    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,
    /// Colourise stderr output.
    pub ansi: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_file: None,
            ansi: true,
        }
    }
}

impl LogOptions {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Filter directive used when `RUST_LOG` is absent or invalid.
    pub fn default_directive(&self) -> String {
        self.level.as_str().to_ascii_lowercase()
    }
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global `tracing` subscriber.
///
/// Fails if a subscriber is already installed or the log file cannot be
/// created.
pub fn init_logging(options: &LogOptions) -> Result<LoggingGuard, LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(options.ansi)
        .with_timer(LocalTime::rfc_3339())
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    let (file_layer, file_guard) = match &options.log_file {
        Some(path) => {
            let (dir, name) = prepare_log_file(path).map_err(|source| LoggingError::LogFile {
                path: path.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339())
                .with_thread_names(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates the log file's directory and truncates the file.
fn prepare_log_file(path: &Path) -> io::Result<(PathBuf, PathBuf)> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "log file path has no file name")
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    fs::write(path, "")?;
    Ok((dir, PathBuf::from(name)))
}
