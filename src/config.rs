//! Configuration for the custom resource entry point.

use std::time::Duration;

use crate::deadline::SAFETY_MARGIN;
use crate::logger::LogLevel;

/// Environment variable overriding the deadline safety margin, in milliseconds.
pub const SAFETY_MARGIN_ENV: &str = "CFN_RESPONSE_SAFETY_MARGIN_MS";

/// Environment variable overriding the default logger's fallback level.
pub const LOG_LEVEL_ENV: &str = "CFN_RESPONSE_LOG_LEVEL";

/// Settings shared by every invocation of a [`CustomResource`](crate::CustomResource).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use cfn_custom_resource::{CustomResourceConfig, LogLevel};
///
/// let config = CustomResourceConfig::default();
/// assert_eq!(config.safety_margin, Duration::from_millis(3000));
/// assert_eq!(config.default_log_level, LogLevel::Warn);
///
/// let verbose = CustomResourceConfig::default().with_default_log_level(LogLevel::Debug);
/// assert_eq!(verbose.default_log_level, LogLevel::Debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomResourceConfig {
    /// Time reserved before the host deadline for sending the FAILED response
    pub safety_margin: Duration,
    /// Level used when the event carries no valid `LogLevel` property
    pub default_log_level: LogLevel,
}

impl Default for CustomResourceConfig {
    fn default() -> Self {
        Self {
            safety_margin: SAFETY_MARGIN,
            default_log_level: LogLevel::default(),
        }
    }
}

impl CustomResourceConfig {
    /// Reads overrides from the process environment.
    ///
    /// Unset or malformed variables keep their default values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let safety_margin = lookup(SAFETY_MARGIN_ENV)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.safety_margin);
        let default_log_level = lookup(LOG_LEVEL_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.default_log_level);

        Self {
            safety_margin,
            default_log_level,
        }
    }

    /// Sets the safety margin.
    pub fn with_safety_margin(mut self, safety_margin: Duration) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    /// Sets the fallback log level.
    pub fn with_default_log_level(mut self, level: LogLevel) -> Self {
        self.default_log_level = level;
        self
    }
}
