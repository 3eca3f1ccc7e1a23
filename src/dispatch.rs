//! Routing of an event to the matching lifecycle handler.

use crate::context::SharedContext;
use crate::error::CustomResourceError;
use crate::event::{CustomResourceEvent, CustomResourceRequest};
use crate::handler::{HandlerResult, HandlerSet};
use crate::logger::SharedLogger;

/// What a successful dispatch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A Create or Update completed (or had no handler registered)
    Resource(HandlerResult),
    /// A Delete completed (or had no handler registered)
    Deleted,
}

/// Invokes the handler registered for the event's request type.
///
/// - An unknown request type fails with
///   [`CustomResourceError::InvalidRequestType`].
/// - A missing handler is a success: Create and Update report physical id
///   `"None"` with empty data, Delete reports [`DispatchOutcome::Deleted`].
/// - A handler rejection is returned unchanged as
///   [`CustomResourceError::Handler`].
///
/// An Update handler may return a physical id different from the incoming
/// one; the new id is forwarded as is.
pub async fn dispatch(
    event: &CustomResourceEvent,
    ctx: SharedContext,
    handlers: &HandlerSet,
    logger: SharedLogger,
) -> Result<DispatchOutcome, CustomResourceError> {
    match serde_json::to_string(event) {
        Ok(raw) => logger.debug(&format!("Received event: {}", raw)),
        Err(e) => logger.debug(&format!("Received event (not serializable: {}): {:?}", e, event)),
    }

    let outcome = match CustomResourceRequest::try_from(event)? {
        CustomResourceRequest::Create(request) => match &handlers.on_create {
            Some(handler) => DispatchOutcome::Resource(handler(request, ctx, logger).await?),
            None => DispatchOutcome::Resource(HandlerResult::default()),
        },
        CustomResourceRequest::Update(request) => match &handlers.on_update {
            Some(handler) => DispatchOutcome::Resource(handler(request, ctx, logger).await?),
            None => DispatchOutcome::Resource(HandlerResult::default()),
        },
        CustomResourceRequest::Delete(request) => {
            if let Some(handler) = &handlers.on_delete {
                handler(request, ctx, logger).await?;
            }
            DispatchOutcome::Deleted
        }
    };

    Ok(outcome)
}
