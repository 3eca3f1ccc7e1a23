//! Shared test utilities for integration tests.
//!
//! This module provides helpers for wiring a [`CustomResource`] to a
//! recording sender and proptest strategies for request fields.

#![allow(dead_code)] // These utilities are used by other integration test files

use std::sync::Arc;

use cfn_custom_resource::{CustomResource, CustomResourceEvent, HandlerSet, HandlerSetFactory};
use cfn_custom_resource_testing::{MockCallbackSender, SentResponse, TestContext};
use proptest::prelude::*;

// =============================================================================
// Resource Wiring
// =============================================================================

/// A provider wired to a [`MockCallbackSender`].
pub struct Harness {
    pub resource: CustomResource,
    pub sender: Arc<MockCallbackSender>,
}

impl Harness {
    /// Wraps a prebuilt handler set.
    pub fn new(handlers: HandlerSet) -> Self {
        Self::with_sender(CustomResource::from_handlers(handlers), MockCallbackSender::new())
    }

    /// Wraps a handler set factory.
    pub fn with_factory<F: HandlerSetFactory + 'static>(factory: F) -> Self {
        Self::with_sender(CustomResource::new(factory), MockCallbackSender::new())
    }

    /// Wires `resource` to `sender`.
    pub fn with_sender(resource: CustomResource, sender: MockCallbackSender) -> Self {
        let sender = Arc::new(sender);
        Self {
            resource: resource.with_sender(sender.clone()),
            sender,
        }
    }

    /// Serves `event` with five minutes remaining and returns the one response.
    pub async fn invoke(&self, event: CustomResourceEvent) -> SentResponse {
        self.invoke_with(event, TestContext::new()).await
    }

    /// Serves `event` under `ctx` and returns the one response.
    pub async fn invoke_with(&self, event: CustomResourceEvent, ctx: TestContext) -> SentResponse {
        self.resource
            .handle(event, ctx.shared())
            .await
            .expect("response should be delivered");
        self.sender.single()
    }
}

// =============================================================================
// Proptest Strategies
// =============================================================================

/// Strategy for request types CloudFormation never sends.
pub fn unknown_request_type_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}".prop_filter("must not be a lifecycle request type", |value| {
        !matches!(value.as_str(), "Create" | "Update" | "Delete")
    })
}

/// Strategy for non-blank error messages.
pub fn error_message_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,30}[a-zA-Z0-9]"
}

/// Strategy for physical resource ids.
pub fn physical_id_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,40}"
}
