//! Logger that captures records in memory.

use std::sync::{Arc, Mutex};

use cfn_custom_resource::{LogLevel, Logger, SharedLogger};

/// A captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity of the record
    pub level: LogLevel,
    /// The logged message
    pub message: String,
}

/// A [`Logger`] that keeps every record for later assertions.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// log factory hands another to the provider.
///
/// # Examples
///
/// ```
/// use cfn_custom_resource::{LogLevel, Logger};
/// use cfn_custom_resource_testing::RecordingLogger;
///
/// let logger = RecordingLogger::new();
/// logger.error("boom");
/// assert!(logger.contains(LogLevel::Error, "boom"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingLogger {
    /// Creates an empty recording logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a shared handle backed by the same buffer.
    pub fn shared(&self) -> SharedLogger {
        Arc::new(self.clone())
    }

    /// Returns every captured record.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Returns the messages captured at `level`.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.level == level)
            .map(|record| record.message.clone())
            .collect()
    }

    /// Returns true if a record at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.messages(level).iter().any(|message| message.contains(needle))
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.records.lock().unwrap().push(LogRecord {
            level,
            message: message.to_string(),
        });
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
