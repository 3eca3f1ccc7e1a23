//! Deadline guard that preempts a hanging handler.
//!
//! The host kills an invocation the moment its deadline passes. A handler
//! that hangs until then would leave CloudFormation waiting for a response
//! that never comes, typically for an hour. The guard fires
//! [`SAFETY_MARGIN`] before the deadline so a FAILED response can still go
//! out.

use std::time::Duration;

use crate::context::ExecutionContext;
use crate::error::CustomResourceError;
use crate::logger::Logger;

/// Time reserved before the host deadline for sending the FAILED response.
pub const SAFETY_MARGIN: Duration = Duration::from_millis(3000);

/// Returns how long the guard waits, given the remaining time.
///
/// Saturates at zero when less than `margin` remains.
pub fn budget(remaining: Duration, margin: Duration) -> Duration {
    remaining.saturating_sub(margin)
}

/// Waits until `margin` before the deadline, then yields
/// [`CustomResourceError::Timeout`].
///
/// The guard never completes successfully and never looks at handler
/// progress. Dropping the returned future cancels it.
pub async fn guard(
    ctx: &dyn ExecutionContext,
    logger: &dyn Logger,
    margin: Duration,
) -> CustomResourceError {
    tokio::time::sleep(budget(ctx.remaining_time(), margin)).await;
    logger.error("Execution is about to time out, sending failure response to CloudFormation");
    CustomResourceError::Timeout
}
