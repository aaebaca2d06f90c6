//! Logger that discards every message.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Silent logger for benchmarks, tests and `--silent`-style embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}
