//! # CloudFormation Custom Resource Adapter
//!
//! This crate lets you implement the lifecycle of a CloudFormation custom
//! resource as plain async Rust closures, without re-implementing the custom
//! resource response protocol.
//!
//! ## Overview
//!
//! CloudFormation invokes a custom resource provider with a `Create`,
//! `Update`, or `Delete` request and then waits, for up to an hour, for a
//! response to be PUT to a presigned URL. A provider that crashes, hangs, or
//! forgets to respond leaves the stack stuck. This crate owns that protocol:
//!
//! - **Dispatch**: the event's `RequestType` selects one of up to three
//!   optional handlers.
//! - **Deadline guard**: the handler is raced against a timer that fires
//!   three seconds before the Lambda deadline, leaving time to report the
//!   timeout.
//! - **Exactly one response**: success, handler error, timeout, and invalid
//!   request types all end in a single SUCCESS or FAILED PUT.
//!
//! ## Getting Started
//!
//! ```toml
//! [dependencies]
//! cfn-custom-resource = "0.1"
//! lambda_runtime = "0.13"
//! tokio = { version = "1", features = ["macros", "rt-multi-thread"] }
//! ```
//!
//! ```rust,no_run
//! use cfn_custom_resource::{
//!     CustomResource, HandlerError, HandlerResult, HandlerSet, SharedLogger,
//! };
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Properties {
//!     #[serde(rename = "Prefix")]
//!     prefix: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     cfn_custom_resource::init_default_subscriber();
//!
//!     let resource = CustomResource::new(|logger: SharedLogger| async move {
//!         logger.debug("building handlers");
//!         Ok::<_, HandlerError>(HandlerSet::new()
//!             .on_create(|request, _ctx, _logger| async move {
//!                 let props: Properties = request.properties()?;
//!                 let name = format!("{}-{}", props.prefix, request.common.request_id);
//!                 Ok(HandlerResult::new(name.clone()).with_value("Name", name))
//!             })
//!             .on_delete(|request, _ctx, logger| async move {
//!                 logger.info(&format!("deleting {}", request.physical_resource_id));
//!                 Ok(())
//!             }))
//!     });
//!
//!     cfn_custom_resource::run(resource).await
//! }
//! ```
//!
//! ## Response semantics
//!
//! | Outcome | Status | Reason | PhysicalResourceId |
//! |---|---|---|---|
//! | Create / Update handler succeeded | SUCCESS | `OK` | from the handler |
//! | No handler registered for Create / Update | SUCCESS | `OK` | `None` |
//! | Delete succeeded or had no handler | SUCCESS | `OK` | the incoming id |
//! | Handler or handler set factory failed | FAILED | the error message, or `Internal Error` | `None` |
//! | Unknown `RequestType` | FAILED | `Invalid RequestType: <value>` | `None` |
//! | Deadline guard fired | FAILED | `Execution timed out` | `None` |
//!
//! If the response PUT itself fails, [`CustomResource::handle`] returns
//! [`CustomResourceError::Delivery`] and the Lambda invocation errors. There
//! is no retry.
//!
//! ## Logging
//!
//! The crate logs through the [`Logger`] trait. The default
//! [`TracingLogger`] forwards to `tracing`, tags records with the request
//! id, logical resource id, and stack id, and takes its level from the
//! `LogLevel` resource property (default `warning`). Install your own with
//! [`CustomResource::with_log_factory`].
//!
//! ## Module Organization
//!
//! - [`config`]: Entry point configuration
//! - [`context`]: Execution context supplied by the host
//! - [`deadline`]: Deadline guard and safety margin
//! - [`dispatch`]: Routing events to handlers
//! - [`error`]: Error types
//! - [`event`]: CloudFormation request events
//! - [`handler`]: Handler sets and handler set factories
//! - [`logger`]: Pluggable logging
//! - [`response`]: Response envelope
//! - [`runtime`]: Entry point and Lambda integration
//! - [`sender`]: Response delivery

pub mod config;
pub mod context;
pub mod deadline;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod handler;
pub mod logger;
pub mod response;
pub mod runtime;
pub mod sender;

// Re-export main types at crate root
pub use config::CustomResourceConfig;
pub use context::{ExecutionContext, SharedContext};
pub use deadline::SAFETY_MARGIN;
pub use dispatch::{dispatch, DispatchOutcome};
pub use error::{CustomResourceError, CustomResourceResult, HandlerError, INTERNAL_ERROR_REASON};
pub use event::{
    CreateRequest, CustomResourceEvent, CustomResourceRequest, DeleteRequest, RequestCommon,
    RequestType, UpdateRequest,
};
pub use handler::{
    FixedHandlerSet, HandlerResult, HandlerSet, HandlerSetFactory, DEFAULT_PHYSICAL_RESOURCE_ID,
};
pub use logger::{LogFactory, LogLevel, Logger, SharedLogger, TracingLogger};
pub use response::{ResponseEnvelope, ResponseStatus};
pub use runtime::{init_default_subscriber, run, CustomResource};
pub use sender::{CallbackSender, HttpCallbackSender, Responder, SharedCallbackSender};
