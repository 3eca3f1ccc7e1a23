//! Testing utilities for CloudFormation custom resource providers
//!
//! This crate provides tools for exercising a
//! [`CustomResource`](cfn_custom_resource::CustomResource) in-process, with
//! no presigned URL and no Lambda runtime.
//!
//! # Features
//!
//! - **MockCallbackSender**: Records every response instead of PUTting it
//! - **TestContext**: Execution context with a fixed remaining time
//! - **EventBuilder**: Fluent construction of Create, Update, and Delete events
//! - **RecordingLogger**: Captures provider and adapter log lines
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cfn_custom_resource::{CustomResource, HandlerResult, HandlerSet, ResponseStatus};
//! use cfn_custom_resource_testing::{EventBuilder, MockCallbackSender, TestContext};
//!
//! # tokio_test::block_on(async {
//! let sender = Arc::new(MockCallbackSender::new());
//! let resource = CustomResource::from_handlers(
//!     HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
//!         Ok(HandlerResult::new("bucket-1"))
//!     }),
//! )
//! .with_sender(sender.clone());
//!
//! resource
//!     .handle(EventBuilder::create().build(), TestContext::new().shared())
//!     .await
//!     .unwrap();
//!
//! let sent = sender.single();
//! assert_eq!(sent.status(), ResponseStatus::Success);
//! assert_eq!(sent.envelope.physical_resource_id, "bucket-1");
//! # });
//! ```

pub mod context;
pub mod events;
pub mod logger;
pub mod mock_sender;

pub use context::{TestContext, TEST_LOG_STREAM};
pub use events::{
    EventBuilder, TEST_LOGICAL_RESOURCE_ID, TEST_PHYSICAL_RESOURCE_ID, TEST_REQUEST_ID,
    TEST_RESPONSE_URL, TEST_SERVICE_TOKEN, TEST_STACK_ID,
};
pub use logger::{LogRecord, RecordingLogger};
pub use mock_sender::{MockCallbackSender, SentResponse};

// Re-export key types from the adapter for convenience
pub use cfn_custom_resource::{
    CustomResource, CustomResourceError, CustomResourceEvent, HandlerError, HandlerResult,
    HandlerSet, ResponseEnvelope, ResponseStatus,
};
