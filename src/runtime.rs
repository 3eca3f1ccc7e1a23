//! The custom resource entry point and its Lambda integration.
//!
//! [`CustomResource::handle`] serves one invocation:
//!
//! 1. Build the logger (default [`TracingLogger`] or the configured
//!    [`LogFactory`]).
//! 2. Ask the [`HandlerSetFactory`] for this invocation's handlers.
//! 3. Race the dispatcher against the deadline guard.
//! 4. Send exactly one SUCCESS or FAILED response.
//!
//! Every failure up to step 4 becomes a FAILED response. Only a failure to
//! deliver that response escapes to the caller.

use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use tracing_subscriber::EnvFilter;

use crate::config::CustomResourceConfig;
use crate::context::{ExecutionContext, SharedContext};
use crate::deadline;
use crate::dispatch::{dispatch, DispatchOutcome};
use crate::error::CustomResourceError;
use crate::event::CustomResourceEvent;
use crate::handler::{FixedHandlerSet, HandlerSet, HandlerSetFactory, SharedHandlerSetFactory};
use crate::logger::{LogFactory, SharedLogger, TracingLogger};
use crate::response::ResponseEnvelope;
use crate::sender::{HttpCallbackSender, Responder, SharedCallbackSender};

/// A CloudFormation custom resource provider.
///
/// # Example
///
/// ```rust,no_run
/// use cfn_custom_resource::{CustomResource, HandlerError, HandlerResult, HandlerSet, SharedLogger};
///
/// #[tokio::main]
/// async fn main() -> Result<(), lambda_runtime::Error> {
///     cfn_custom_resource::init_default_subscriber();
///
///     let resource = CustomResource::new(|_logger: SharedLogger| async move {
///         Ok::<_, HandlerError>(HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
///             Ok(HandlerResult::new("resource-1"))
///         }))
///     });
///
///     cfn_custom_resource::run(resource).await
/// }
/// ```
pub struct CustomResource {
    factory: SharedHandlerSetFactory,
    log_factory: Option<LogFactory>,
    sender: SharedCallbackSender,
    config: CustomResourceConfig,
}

impl CustomResource {
    /// Creates a provider whose handlers are built per invocation by `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: HandlerSetFactory + 'static,
    {
        Self {
            factory: Arc::new(factory),
            log_factory: None,
            sender: Arc::new(HttpCallbackSender::new()),
            config: CustomResourceConfig::default(),
        }
    }

    /// Creates a provider that reuses one prebuilt handler set.
    pub fn from_handlers(handlers: HandlerSet) -> Self {
        Self::new(FixedHandlerSet(handlers))
    }

    /// Replaces the default logger construction.
    pub fn with_log_factory<F>(mut self, log_factory: F) -> Self
    where
        F: Fn(&CustomResourceEvent, &dyn ExecutionContext) -> SharedLogger + Send + Sync + 'static,
    {
        self.log_factory = Some(Arc::new(log_factory));
        self
    }

    /// Replaces the transport used to deliver the response.
    pub fn with_sender(mut self, sender: SharedCallbackSender) -> Self {
        self.sender = sender;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: CustomResourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CustomResourceConfig {
        &self.config
    }

    /// Serves one invocation.
    ///
    /// Returns `Ok(())` once a response, SUCCESS or FAILED, has been
    /// delivered. Returns [`CustomResourceError::Delivery`] if delivery
    /// itself failed.
    pub async fn handle(
        &self,
        event: CustomResourceEvent,
        ctx: SharedContext,
    ) -> Result<(), CustomResourceError> {
        let logger = self.logger_for(&event, ctx.as_ref());
        let responder = Responder::new(self.sender.clone(), event.response_url.clone(), logger.clone());

        let envelope = match self.execute(&event, ctx, logger.clone()).await {
            Ok(outcome) => ResponseEnvelope::success(&event, outcome),
            Err(error) => {
                logger.error(&format!(
                    "{} request for {} failed: {}",
                    event.request_type, event.logical_resource_id, error
                ));
                ResponseEnvelope::failed(&event, error.reason())
            }
        };

        responder.send(&envelope).await
    }

    /// Adapter for [`lambda_runtime::service_fn`].
    pub async fn lambda_handler(
        &self,
        event: LambdaEvent<CustomResourceEvent>,
    ) -> Result<(), lambda_runtime::Error> {
        let (payload, context) = event.into_parts();
        self.handle(payload, Arc::new(context)).await?;
        Ok(())
    }

    fn logger_for(&self, event: &CustomResourceEvent, ctx: &dyn ExecutionContext) -> SharedLogger {
        match &self.log_factory {
            Some(log_factory) => log_factory(event, ctx),
            None => Arc::new(TracingLogger::from_event(event, self.config.default_log_level)),
        }
    }

    /// Everything that can fail into a FAILED response.
    async fn execute(
        &self,
        event: &CustomResourceEvent,
        ctx: SharedContext,
        logger: SharedLogger,
    ) -> Result<DispatchOutcome, CustomResourceError> {
        let handlers = self
            .factory
            .build(logger.clone())
            .await
            .map_err(CustomResourceError::HandlerSetFactory)?;

        let guard = deadline::guard(ctx.as_ref(), logger.as_ref(), self.config.safety_margin);
        let dispatcher = dispatch(event, ctx.clone(), &handlers, logger.clone());

        // The guard is polled first so an exhausted budget always wins. The
        // losing future is dropped here, before any response is sent.
        tokio::select! {
            biased;
            timeout = guard => Err(timeout),
            outcome = dispatcher => outcome,
        }
    }
}

/// Runs `resource` as the handler of a Lambda function.
pub async fn run(resource: CustomResource) -> Result<(), lambda_runtime::Error> {
    let resource = Arc::new(resource);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<CustomResourceEvent>| {
        let resource = resource.clone();
        async move { resource.lambda_handler(event).await }
    }))
    .await
}

/// Installs a `tracing` subscriber suited to Lambda.
///
/// The filter comes from `RUST_LOG`, then `AWS_LAMBDA_LOG_LEVEL`, then
/// defaults to `info`. Output is JSON when `AWS_LAMBDA_LOG_FORMAT=JSON`.
/// Does nothing if a global subscriber is already installed.
pub fn init_default_subscriber() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(
                std::env::var("AWS_LAMBDA_LOG_LEVEL")
                    .unwrap_or_else(|_| "info".to_string())
                    .to_lowercase(),
            )
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("AWS_LAMBDA_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
