//! Bridge from [`Logger`] to the `tracing` macros.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger that forwards every message to `tracing`.
///
/// Output only appears once a subscriber is installed, e.g. through
/// [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!("{}", args),
            LogLevel::Debug => tracing::debug!("{}", args),
            LogLevel::Info => tracing::info!("{}", args),
            LogLevel::Warn => tracing::warn!("{}", args),
            LogLevel::Error => tracing::error!("{}", args),
        }
    }
}
