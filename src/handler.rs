//! User-supplied lifecycle handlers.
//!
//! A [`HandlerSet`] holds up to three independent handlers, one per request
//! type. Any of them may be left out; the dispatcher then answers that
//! request type with a default success.
//!
//! # Example
//!
//! ```rust
//! use cfn_custom_resource::{HandlerResult, HandlerSet};
//!
//! let handlers = HandlerSet::new()
//!     .on_create(|request, _ctx, logger| async move {
//!         logger.info(&format!("creating {}", request.common.logical_resource_id));
//!         Ok(HandlerResult::new("my-resource-1").with_value("Arn", "arn:aws:demo:::1"))
//!     })
//!     .on_delete(|_request, _ctx, _logger| async move { Ok(()) });
//!
//! assert!(handlers.has_create());
//! assert!(!handlers.has_update());
//! assert!(handlers.has_delete());
//! ```
//!
//! Handler sets are produced per invocation by a [`HandlerSetFactory`]. Any
//! async closure taking the active [`SharedLogger`] works as a factory, which
//! makes it possible to fetch secrets or build SDK clients before dispatch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::SharedContext;
use crate::error::HandlerError;
use crate::event::{CreateRequest, DeleteRequest, UpdateRequest};
use crate::logger::SharedLogger;

/// Physical resource id reported when no handler produced one.
pub const DEFAULT_PHYSICAL_RESOURCE_ID: &str = "None";

/// Boxed future returned by a stored handler.
pub type HandlerFuture<T> = Pin<Box<dyn Future<Output = Result<T, HandlerError>> + Send>>;

/// Stored `Create` handler.
pub type CreateHandler =
    Arc<dyn Fn(CreateRequest, SharedContext, SharedLogger) -> HandlerFuture<HandlerResult> + Send + Sync>;

/// Stored `Update` handler.
pub type UpdateHandler =
    Arc<dyn Fn(UpdateRequest, SharedContext, SharedLogger) -> HandlerFuture<HandlerResult> + Send + Sync>;

/// Stored `Delete` handler.
pub type DeleteHandler =
    Arc<dyn Fn(DeleteRequest, SharedContext, SharedLogger) -> HandlerFuture<()> + Send + Sync>;

/// Outcome of a successful Create or Update.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResult {
    /// Id identifying the real-world resource. Returning a different id from
    /// an Update makes CloudFormation issue a Delete for the old one.
    pub physical_resource_id: String,
    /// Attributes readable with `Fn::GetAtt`
    pub data: Map<String, Value>,
}

impl HandlerResult {
    /// Creates a result with no data.
    pub fn new(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
            data: Map::new(),
        }
    }

    /// Replaces the response data.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Adds a single response data entry.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Serializes `data` into the response data.
    ///
    /// Fails if `data` does not serialize to a JSON object.
    pub fn with_serialized<T: Serialize>(mut self, data: &T) -> Result<Self, HandlerError> {
        match serde_json::to_value(data)? {
            Value::Object(map) => {
                self.data = map;
                Ok(self)
            }
            other => Err(HandlerError::new(format!(
                "response data must serialize to a JSON object, got {}",
                other
            ))),
        }
    }
}

impl Default for HandlerResult {
    fn default() -> Self {
        Self::new(DEFAULT_PHYSICAL_RESOURCE_ID)
    }
}

/// Up to three optional lifecycle handlers.
#[derive(Clone, Default)]
pub struct HandlerSet {
    pub(crate) on_create: Option<CreateHandler>,
    pub(crate) on_update: Option<UpdateHandler>,
    pub(crate) on_delete: Option<DeleteHandler>,
}

impl HandlerSet {
    /// Creates an empty handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the `Create` handler.
    pub fn on_create<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(CreateRequest, SharedContext, SharedLogger) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResult, HandlerError>> + Send + 'static,
    {
        let stored: CreateHandler = Arc::new(
            move |request: CreateRequest, ctx: SharedContext, logger: SharedLogger| -> HandlerFuture<HandlerResult> {
                Box::pin(handler(request, ctx, logger))
            },
        );
        self.on_create = Some(stored);
        self
    }

    /// Registers the `Update` handler.
    pub fn on_update<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(UpdateRequest, SharedContext, SharedLogger) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResult, HandlerError>> + Send + 'static,
    {
        let stored: UpdateHandler = Arc::new(
            move |request: UpdateRequest, ctx: SharedContext, logger: SharedLogger| -> HandlerFuture<HandlerResult> {
                Box::pin(handler(request, ctx, logger))
            },
        );
        self.on_update = Some(stored);
        self
    }

    /// Registers the `Delete` handler.
    pub fn on_delete<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(DeleteRequest, SharedContext, SharedLogger) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let stored: DeleteHandler = Arc::new(
            move |request: DeleteRequest, ctx: SharedContext, logger: SharedLogger| -> HandlerFuture<()> {
                Box::pin(handler(request, ctx, logger))
            },
        );
        self.on_delete = Some(stored);
        self
    }

    /// Returns true if a `Create` handler is registered.
    pub fn has_create(&self) -> bool {
        self.on_create.is_some()
    }

    /// Returns true if an `Update` handler is registered.
    pub fn has_update(&self) -> bool {
        self.on_update.is_some()
    }

    /// Returns true if a `Delete` handler is registered.
    pub fn has_delete(&self) -> bool {
        self.on_delete.is_some()
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSet")
            .field("on_create", &self.has_create())
            .field("on_update", &self.has_update())
            .field("on_delete", &self.has_delete())
            .finish()
    }
}

/// Produces a fresh [`HandlerSet`] for each invocation.
#[async_trait]
pub trait HandlerSetFactory: Send + Sync {
    /// Builds the handler set, given the invocation's active logger.
    async fn build(&self, logger: SharedLogger) -> Result<HandlerSet, HandlerError>;
}

#[async_trait]
impl<F, Fut> HandlerSetFactory for F
where
    F: Fn(SharedLogger) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HandlerSet, HandlerError>> + Send + 'static,
{
    async fn build(&self, logger: SharedLogger) -> Result<HandlerSet, HandlerError> {
        (self)(logger).await
    }
}

/// Factory that hands out clones of a prebuilt handler set.
#[derive(Debug, Clone)]
pub struct FixedHandlerSet(pub HandlerSet);

#[async_trait]
impl HandlerSetFactory for FixedHandlerSet {
    async fn build(&self, _logger: SharedLogger) -> Result<HandlerSet, HandlerError> {
        Ok(self.0.clone())
    }
}

/// Type alias for a shared handler set factory.
pub type SharedHandlerSetFactory = Arc<dyn HandlerSetFactory>;
