//! In-memory logger.

use std::fmt::Arguments;

use parking_lot::Mutex;

use crate::log::{LogLevel, Logger};

/// One captured log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that stores every message it receives.
///
/// Handy when a caller wants to surface warnings itself, and in tests that
/// assert a side effect such as padding was reported.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.records.lock().push(LogRecord {
            level,
            message: args.to_string(),
        });
    }
}
