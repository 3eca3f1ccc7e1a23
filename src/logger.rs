//! Pluggable logging for custom resource invocations.
//!
//! The adapter logs through the [`Logger`] trait and never decides logging
//! policy itself. By default each invocation gets a [`TracingLogger`] whose
//! threshold comes from the `LogLevel` resource property, so a template
//! author can turn on debug output for a single resource:
//!
//! ```yaml
//! MyResource:
//!   Type: Custom::Thing
//!   Properties:
//!     ServiceToken: !GetAtt Provider.Arn
//!     LogLevel: debug
//! ```
//!
//! A [`LogFactory`] installed on the [`CustomResource`](crate::CustomResource)
//! replaces the default logger entirely.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::event::CustomResourceEvent;

/// Resource property that selects the default logger's level.
pub const LOG_LEVEL_PROPERTY: &str = "LogLevel";

/// Severity threshold for the default logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Everything, including raw events and response bodies
    Debug,
    /// Informational messages such as the callback status code
    Info,
    /// Warnings and errors
    #[default]
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Reads the level from the event's `LogLevel` resource property.
    ///
    /// Returns `None` if the property is absent or not a recognized level.
    pub fn from_event(event: &CustomResourceEvent) -> Option<Self> {
        event
            .property_str(LOG_LEVEL_PROPERTY)
            .and_then(|value| value.parse().ok())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Error returned when a log level name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// Logging capability consumed by the adapter and handed to user handlers.
pub trait Logger: Send + Sync {
    /// Logs a debug message.
    fn debug(&self, message: &str);
    /// Logs an info message.
    fn info(&self, message: &str);
    /// Logs a warning message.
    fn warn(&self, message: &str);
    /// Logs an error message.
    fn error(&self, message: &str);
}

/// Type alias for a shared logger.
pub type SharedLogger = Arc<dyn Logger>;

/// Builds the logger for one invocation from its event and context.
pub type LogFactory =
    Arc<dyn Fn(&CustomResourceEvent, &dyn ExecutionContext) -> SharedLogger + Send + Sync>;

/// Default logger that forwards to the `tracing` crate.
///
/// Every record carries the request id, logical resource id, and stack id of
/// the invocation as structured fields. Records below the configured level
/// are dropped before they reach `tracing`.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    level: LogLevel,
    request_id: String,
    logical_resource_id: String,
    stack_id: String,
}

impl TracingLogger {
    /// Creates a logger with no invocation fields.
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            request_id: String::new(),
            logical_resource_id: String::new(),
            stack_id: String::new(),
        }
    }

    /// Creates the default logger for an event.
    ///
    /// Uses the `LogLevel` resource property when it parses, `fallback`
    /// otherwise.
    pub fn from_event(event: &CustomResourceEvent, fallback: LogLevel) -> Self {
        Self {
            level: LogLevel::from_event(event).unwrap_or(fallback),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            stack_id: event.stack_id.clone(),
        }
    }

    /// Returns the configured threshold.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns true if a record at `level` would be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(
                request_id = %self.request_id,
                logical_resource_id = %self.logical_resource_id,
                stack_id = %self.stack_id,
                "{}",
                message
            );
        }
    }

    fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(
                request_id = %self.request_id,
                logical_resource_id = %self.logical_resource_id,
                stack_id = %self.stack_id,
                "{}",
                message
            );
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!(
                request_id = %self.request_id,
                logical_resource_id = %self.logical_resource_id,
                stack_id = %self.stack_id,
                "{}",
                message
            );
        }
    }

    fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(
                request_id = %self.request_id,
                logical_resource_id = %self.logical_resource_id,
                stack_id = %self.stack_id,
                "{}",
                message
            );
        }
    }
}
