//! Mock implementation of CallbackSender for testing.
//!
//! This module provides a recording callback sender that can be used to unit
//! test custom resource providers without a presigned URL or any network.
//!
//! # Examples
//!
//! ```
//! use cfn_custom_resource_testing::MockCallbackSender;
//! use cfn_custom_resource::CustomResourceError;
//!
//! // Every send succeeds
//! let sender = MockCallbackSender::new();
//!
//! // The first send fails, later sends succeed
//! let sender = MockCallbackSender::new()
//!     .with_send_result(Err(CustomResourceError::delivery("https://example.com", "unreachable")));
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use cfn_custom_resource::{
    CallbackSender, CustomResourceError, ResponseEnvelope, ResponseStatus, SharedLogger,
};

/// Record of a send made through the mock sender.
#[derive(Debug, Clone, PartialEq)]
pub struct SentResponse {
    /// The callback URL the envelope was addressed to
    pub url: String,
    /// The envelope as it would have been serialized
    pub envelope: ResponseEnvelope,
}

impl SentResponse {
    /// Returns the response status.
    pub fn status(&self) -> ResponseStatus {
        self.envelope.status
    }

    /// Returns the response reason.
    pub fn reason(&self) -> &str {
        &self.envelope.reason
    }
}

/// Mock implementation of CallbackSender for testing.
///
/// This mock sender allows you to:
/// - Configure results for successive send calls
/// - Record every envelope for verification in tests
/// - Delay delivery to simulate a slow endpoint
///
/// # Thread Safety
///
/// The mock sender uses internal mutexes to allow safe concurrent access
/// from multiple tasks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cfn_custom_resource::{CallbackSender, ResponseEnvelope, SharedLogger, TracingLogger, LogLevel};
/// use cfn_custom_resource_testing::{EventBuilder, MockCallbackSender};
///
/// # tokio_test::block_on(async {
/// let sender = MockCallbackSender::new();
/// let event = EventBuilder::create().build();
/// let logger: SharedLogger = Arc::new(TracingLogger::new(LogLevel::Error));
///
/// sender.send(&event.response_url, &ResponseEnvelope::failed(&event, "boom"), &logger).await.unwrap();
///
/// assert_eq!(sender.send_count(), 1);
/// assert_eq!(sender.last().unwrap().reason(), "boom");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockCallbackSender {
    /// Queue of results to return, consumed FIFO
    results: Mutex<VecDeque<Result<(), CustomResourceError>>>,
    /// Record of all sends
    sent: Mutex<Vec<SentResponse>>,
    /// Optional delay applied before each send completes
    delay: Option<Duration>,
    /// Delivery failure returned once the queue is drained
    failure: Option<String>,
}

impl MockCallbackSender {
    /// Creates a new mock sender whose sends all succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock sender whose every send fails with a delivery error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Adds a result to be returned by the next unconsumed send.
    ///
    /// Results are returned in the order they were added (FIFO). Once all
    /// configured results are consumed, sends succeed unless the sender was
    /// built with [`MockCallbackSender::failing`].
    pub fn with_send_result(self, result: Result<(), CustomResourceError>) -> Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    /// Delays every send by `delay` before it completes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Gets all sends made to this mock sender.
    ///
    /// Failed sends are recorded too.
    pub fn sent(&self) -> Vec<SentResponse> {
        self.sent.lock().unwrap().clone()
    }

    /// Returns the number of sends made.
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Returns the most recent send, if any.
    pub fn last(&self) -> Option<SentResponse> {
        self.sent.lock().unwrap().last().cloned()
    }

    /// Returns the only send, panicking unless exactly one was made.
    pub fn single(&self) -> SentResponse {
        let sent = self.sent.lock().unwrap();
        assert_eq!(
            sent.len(),
            1,
            "expected exactly one response to be sent, got {}",
            sent.len()
        );
        sent[0].clone()
    }

    /// Clears all recorded sends.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl CallbackSender for MockCallbackSender {
    async fn send(
        &self,
        url: &str,
        envelope: &ResponseEnvelope,
        logger: &SharedLogger,
    ) -> Result<(), CustomResourceError> {
        logger.debug(&format!("mock send of {} response to {}", envelope.status, url));
        self.sent.lock().unwrap().push(SentResponse {
            url: url.to_string(),
            envelope: envelope.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.results.lock().unwrap().pop_front();
        match next {
            Some(Err(CustomResourceError::Delivery { message, .. })) => {
                Err(CustomResourceError::delivery(url, message))
            }
            Some(result) => result,
            None => match &self.failure {
                Some(message) => Err(CustomResourceError::delivery(url, message.clone())),
                None => Ok(()),
            },
        }
    }
}
