//! Log Factory Example
//!
//! Replacing the default logger with one that tags every line with the
//! Lambda log stream and ignores the `LogLevel` resource property.

use std::sync::Arc;

use cfn_custom_resource::{
    CustomResource, CustomResourceEvent, ExecutionContext, HandlerResult, HandlerSet, Logger,
    SharedLogger,
};

/// Logger that always logs at every level, tagged with the log stream.
struct StreamLogger {
    log_stream: String,
    logical_resource_id: String,
}

impl StreamLogger {
    fn new(event: &CustomResourceEvent, ctx: &dyn ExecutionContext) -> Self {
        Self {
            log_stream: ctx.log_stream_name().to_string(),
            logical_resource_id: event.logical_resource_id.clone(),
        }
    }
}

impl Logger for StreamLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(log_stream = %self.log_stream, resource = %self.logical_resource_id, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(log_stream = %self.log_stream, resource = %self.logical_resource_id, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(log_stream = %self.log_stream, resource = %self.logical_resource_id, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(log_stream = %self.log_stream, resource = %self.logical_resource_id, "{}", message);
    }
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    cfn_custom_resource::init_default_subscriber();

    let handlers = HandlerSet::new().on_create(|request, ctx, logger| async move {
        logger.info(&format!(
            "creating with {} ms left",
            ctx.remaining_time().as_millis()
        ));
        Ok(HandlerResult::new(request.common.request_id.clone()))
    });

    let resource = CustomResource::from_handlers(handlers).with_log_factory(
        |event: &CustomResourceEvent, ctx: &dyn ExecutionContext| -> SharedLogger {
            Arc::new(StreamLogger::new(event, ctx))
        },
    );

    cfn_custom_resource::run(resource).await
}
