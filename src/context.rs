//! Execution context supplied by the hosting environment.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Read-only view of the invocation environment.
///
/// The adapter only needs to know how much time is left before the host
/// terminates the invocation, plus a log stream name for diagnostics.
pub trait ExecutionContext: Send + Sync {
    /// Time left before the host hard-kills the invocation.
    fn remaining_time(&self) -> Duration;

    /// Name of the log stream this invocation writes to.
    fn log_stream_name(&self) -> &str;
}

/// Type alias for a shared execution context.
pub type SharedContext = Arc<dyn ExecutionContext>;

impl ExecutionContext for lambda_runtime::Context {
    fn remaining_time(&self) -> Duration {
        let deadline = UNIX_EPOCH + Duration::from_millis(self.deadline);
        deadline
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO)
    }

    fn log_stream_name(&self) -> &str {
        &self.env_config.log_stream
    }
}
