//! Execution context with a fixed time budget.

use std::sync::Arc;
use std::time::Duration;

use cfn_custom_resource::{ExecutionContext, SharedContext};

/// Default log stream name reported by [`TestContext`].
pub const TEST_LOG_STREAM: &str = "2024/01/01/[$LATEST]0123456789abcdef";

/// An [`ExecutionContext`] that always reports the same remaining time.
///
/// Combine it with `#[tokio::test(start_paused = true)]` to exercise the
/// deadline guard without waiting in real time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cfn_custom_resource::ExecutionContext;
/// use cfn_custom_resource_testing::TestContext;
///
/// let ctx = TestContext::with_remaining(Duration::from_secs(30));
/// assert_eq!(ctx.remaining_time(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct TestContext {
    remaining: Duration,
    log_stream_name: String,
}

impl TestContext {
    /// Creates a context with five minutes remaining.
    pub fn new() -> Self {
        Self::with_remaining(Duration::from_secs(300))
    }

    /// Creates a context with the given remaining time.
    pub fn with_remaining(remaining: Duration) -> Self {
        Self {
            remaining,
            log_stream_name: TEST_LOG_STREAM.to_string(),
        }
    }

    /// Creates a context with the given remaining milliseconds.
    pub fn with_remaining_millis(millis: u64) -> Self {
        Self::with_remaining(Duration::from_millis(millis))
    }

    /// Sets the log stream name.
    pub fn with_log_stream_name(mut self, name: impl Into<String>) -> Self {
        self.log_stream_name = name.into();
        self
    }

    /// Wraps the context for [`CustomResource::handle`](cfn_custom_resource::CustomResource::handle).
    pub fn shared(self) -> SharedContext {
        Arc::new(self)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for TestContext {
    fn remaining_time(&self) -> Duration {
        self.remaining
    }

    fn log_stream_name(&self) -> &str {
        &self.log_stream_name
    }
}
