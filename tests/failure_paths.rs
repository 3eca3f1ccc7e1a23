//! Integration tests for the failure paths of the entry point.
//!
//! Every failure before delivery must still end in exactly one FAILED
//! response. Only a failed delivery escapes to the caller.

mod common;

use std::sync::Arc;
use std::time::Duration;

use cfn_custom_resource::{
    CustomResource, CustomResourceError, HandlerError, HandlerResult, HandlerSet, LogLevel,
    ResponseStatus, SharedLogger, DEFAULT_PHYSICAL_RESOURCE_ID, INTERNAL_ERROR_REASON,
};
use cfn_custom_resource_testing::{EventBuilder, MockCallbackSender, RecordingLogger, TestContext};
use proptest::prelude::*;

use common::*;

fn failing_handlers(message: &'static str) -> HandlerSet {
    HandlerSet::new()
        .on_create(move |_request, _ctx, _logger| async move { Err(HandlerError::new(message)) })
        .on_update(move |_request, _ctx, _logger| async move { Err(HandlerError::new(message)) })
        .on_delete(move |_request, _ctx, _logger| async move { Err(HandlerError::new(message)) })
}

// =============================================================================
// Handler errors
// =============================================================================

#[tokio::test]
async fn test_handler_error_message_becomes_reason() {
    for event in [
        EventBuilder::create().build(),
        EventBuilder::update().build(),
        EventBuilder::delete().build(),
    ] {
        let harness = Harness::new(failing_handlers("boom"));

        let sent = harness.invoke(event).await;

        assert_eq!(sent.status(), ResponseStatus::Failed);
        assert_eq!(sent.reason(), "boom");
        assert_eq!(sent.envelope.physical_resource_id, DEFAULT_PHYSICAL_RESOURCE_ID);
        assert!(sent.envelope.data.is_empty());
    }
}

#[tokio::test]
async fn test_empty_handler_error_reports_internal_error() {
    let handlers = HandlerSet::new()
        .on_create(|_request, _ctx, _logger| async move { Err(HandlerError::empty()) });
    let harness = Harness::new(handlers);

    let sent = harness.invoke(EventBuilder::create().build()).await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert_eq!(sent.reason(), INTERNAL_ERROR_REASON);
}

#[tokio::test]
async fn test_property_decoding_error_fails_the_request() {
    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Required {
        #[serde(rename = "Size")]
        size: u32,
    }

    let handlers = HandlerSet::new().on_create(|request, _ctx, _logger| async move {
        let props: Required = request.properties()?;
        Ok(HandlerResult::new(format!("disk-{}", props.size)))
    });
    let harness = Harness::new(handlers);

    let sent = harness
        .invoke(EventBuilder::create().property("Size", "large").build())
        .await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert!(!sent.reason().is_empty());
    assert_ne!(sent.reason(), INTERNAL_ERROR_REASON);
}

#[tokio::test]
async fn test_factory_error_fails_the_request() {
    let harness = Harness::with_factory(|_logger: SharedLogger| async move {
        Err::<HandlerSet, _>(HandlerError::new("secret not found"))
    });

    let sent = harness.invoke(EventBuilder::create().build()).await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert_eq!(sent.reason(), "secret not found");
}

// =============================================================================
// Invalid request types
// =============================================================================

#[tokio::test]
async fn test_unknown_request_type_fails_once() {
    let harness = Harness::new(HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
        Ok(HandlerResult::new("created"))
    }));

    let sent = harness.invoke(EventBuilder::request_type("Replace").build()).await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert_eq!(sent.reason(), "Invalid RequestType: Replace");
    assert_eq!(harness.sender.send_count(), 1);
}

#[tokio::test]
async fn test_request_type_match_is_exact() {
    let harness = Harness::new(HandlerSet::new());

    let sent = harness.invoke(EventBuilder::request_type("create").build()).await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert!(sent.reason().contains("Invalid RequestType"));
}

proptest! {
    #[test]
    fn prop_unknown_request_types_yield_one_failed_response(request_type in unknown_request_type_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let sent = runtime.block_on(async {
            Harness::new(HandlerSet::new())
                .invoke(EventBuilder::request_type(request_type.clone()).build())
                .await
        });

        prop_assert_eq!(sent.status(), ResponseStatus::Failed);
        prop_assert_eq!(sent.reason(), format!("Invalid RequestType: {}", request_type));
    }

    #[test]
    fn prop_handler_messages_pass_through(message in error_message_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let handler_message = message.clone();
        let sent = runtime.block_on(async move {
            let handlers = HandlerSet::new().on_create(move |_request, _ctx, _logger| {
                let handler_message = handler_message.clone();
                async move { Err(HandlerError::new(handler_message)) }
            });
            Harness::new(handlers).invoke(EventBuilder::create().build()).await
        });

        prop_assert_eq!(sent.reason(), message.as_str());
    }
}

// =============================================================================
// Deadline
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_hanging_handler_times_out_before_deadline() {
    let handlers = HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(HandlerResult::new("too-late"))
    });
    let harness = Harness::new(handlers);
    let started = tokio::time::Instant::now();

    let sent = harness
        .invoke_with(EventBuilder::create().build(), TestContext::with_remaining(Duration::from_secs(10)))
        .await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert_eq!(sent.reason(), "Execution timed out");
    assert!(started.elapsed() >= Duration::from_secs(7));
    assert!(started.elapsed() < Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_budget_wins_over_a_later_success() {
    let handlers = HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(HandlerResult::new("would-have-succeeded"))
    });
    let harness = Harness::new(handlers);
    let started = tokio::time::Instant::now();

    let sent = harness
        .invoke_with(EventBuilder::create().build(), TestContext::with_remaining_millis(2000))
        .await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert_eq!(sent.reason(), "Execution timed out");
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(harness.sender.send_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_handler_finishing_inside_budget_succeeds() {
    let handlers = HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
        tokio::time::sleep(Duration::from_secs(6)).await;
        Ok(HandlerResult::new("in-time"))
    });
    let harness = Harness::new(handlers);

    let sent = harness
        .invoke_with(EventBuilder::create().build(), TestContext::with_remaining(Duration::from_secs(10)))
        .await;

    assert_eq!(sent.status(), ResponseStatus::Success);
    assert_eq!(sent.envelope.physical_resource_id, "in-time");
}

#[tokio::test(start_paused = true)]
async fn test_configured_safety_margin_is_used() {
    let handlers = HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
        tokio::time::sleep(Duration::from_secs(6)).await;
        Ok(HandlerResult::new("in-time"))
    });
    let resource = CustomResource::from_handlers(handlers).with_config(
        cfn_custom_resource::CustomResourceConfig::default()
            .with_safety_margin(Duration::from_secs(5)),
    );
    let harness = Harness::with_sender(resource, MockCallbackSender::new());

    let sent = harness
        .invoke_with(EventBuilder::create().build(), TestContext::with_remaining(Duration::from_secs(10)))
        .await;

    assert_eq!(sent.reason(), "Execution timed out");
}

// =============================================================================
// Delivery
// =============================================================================

#[tokio::test]
async fn test_delivery_failure_rejects_the_invocation() {
    let resource = CustomResource::from_handlers(HandlerSet::new());
    let harness = Harness::with_sender(resource, MockCallbackSender::failing("connection reset"));

    let result = harness
        .resource
        .handle(EventBuilder::create().build(), TestContext::new().shared())
        .await;

    let error = result.unwrap_err();
    assert!(error.is_delivery());
    assert!(matches!(error, CustomResourceError::Delivery { .. }));
    assert_eq!(harness.sender.send_count(), 1);
}

#[tokio::test]
async fn test_delivery_failure_after_handler_failure_is_not_retried() {
    let resource = CustomResource::from_handlers(failing_handlers("boom"));
    let harness = Harness::with_sender(resource, MockCallbackSender::failing("connection reset"));

    let result = harness
        .resource
        .handle(EventBuilder::create().build(), TestContext::new().shared())
        .await;

    assert!(result.unwrap_err().is_delivery());
    let sent = harness.sender.single();
    assert_eq!(sent.reason(), "boom");
}

// =============================================================================
// Logging
// =============================================================================

#[tokio::test]
async fn test_log_factory_replaces_default_logger() {
    let recorder = RecordingLogger::new();
    let factory_recorder = recorder.clone();
    let handlers = HandlerSet::new().on_create(|_request, _ctx, logger| async move {
        logger.info("handler ran");
        Err(HandlerError::new("boom"))
    });
    let resource = CustomResource::new(move |logger: SharedLogger| {
        let handlers = handlers.clone();
        async move {
            logger.debug("factory ran");
            Ok::<_, HandlerError>(handlers)
        }
    })
    .with_log_factory(move |_event, _ctx| factory_recorder.shared());
    let harness = Harness::with_sender(resource, MockCallbackSender::new());

    harness.invoke(EventBuilder::create().build()).await;

    assert!(recorder.contains(LogLevel::Debug, "factory ran"));
    assert!(recorder.contains(LogLevel::Info, "handler ran"));
    assert!(recorder.contains(LogLevel::Error, "boom"));
}

#[tokio::test]
async fn test_raw_event_is_logged_at_debug_before_dispatch() {
    let recorder = RecordingLogger::new();
    let factory_recorder = recorder.clone();
    let resource = CustomResource::from_handlers(HandlerSet::new())
        .with_log_factory(move |_event, _ctx| factory_recorder.shared());
    let harness = Harness::with_sender(resource, MockCallbackSender::new());

    harness.invoke(EventBuilder::create().build()).await;

    let debug = recorder.messages(LogLevel::Debug);
    assert!(debug
        .iter()
        .any(|message| message.contains("Received event") && message.contains(r#""RequestType":"Create""#)));
}

#[tokio::test]
async fn test_missing_request_type_is_answered() {
    let mut event = EventBuilder::create().build();
    event.request_type = String::new();
    let harness = Harness::new(HandlerSet::new());

    let sent = harness.invoke(event).await;

    assert_eq!(sent.status(), ResponseStatus::Failed);
    assert_eq!(sent.reason(), "Invalid RequestType: ");
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_logged_at_error() {
    let recorder = RecordingLogger::new();
    let factory_recorder = recorder.clone();
    let handlers = HandlerSet::new().on_create(|_request, _ctx, _logger| async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(HandlerResult::new("late"))
    });
    let resource = CustomResource::from_handlers(handlers)
        .with_log_factory(move |_event, _ctx| factory_recorder.shared());
    let harness = Harness::with_sender(resource, MockCallbackSender::new());

    harness
        .invoke_with(EventBuilder::create().build(), TestContext::with_remaining_millis(100))
        .await;

    assert!(recorder.contains(LogLevel::Error, "about to time out"));
}

#[tokio::test]
async fn test_log_factory_sees_the_event() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let factory_seen = seen.clone();
    let resource = CustomResource::from_handlers(HandlerSet::new()).with_log_factory(
        move |event, ctx| {
            factory_seen
                .lock()
                .unwrap()
                .push((event.request_id.clone(), ctx.log_stream_name().to_string()));
            RecordingLogger::new().shared()
        },
    );
    let harness = Harness::with_sender(resource, MockCallbackSender::new());

    harness
        .invoke_with(
            EventBuilder::create().request_id("req-42").build(),
            TestContext::new().with_log_stream_name("stream-7"),
        )
        .await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("req-42".to_string(), "stream-7".to_string())]
    );
}
