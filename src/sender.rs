//! Delivery of the response envelope to CloudFormation.
//!
//! This module defines the [`CallbackSender`] trait and an HTTP
//! implementation that PUTs the envelope to the presigned `ResponseURL`.
//! Delivery is attempted exactly once; there is no retry and no backoff.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::error::CustomResourceError;
use crate::logger::SharedLogger;
use crate::response::ResponseEnvelope;

/// Capability to deliver one response envelope to a callback URL.
///
/// Abstracts the transport so the entry point can be exercised without a
/// network (see the `cfn-custom-resource-testing` crate).
#[async_trait]
pub trait CallbackSender: Send + Sync {
    /// Delivers `envelope` to `url`.
    ///
    /// Fails with [`CustomResourceError::Delivery`] if the request does not
    /// complete.
    async fn send(
        &self,
        url: &str,
        envelope: &ResponseEnvelope,
        logger: &SharedLogger,
    ) -> Result<(), CustomResourceError>;
}

/// Type alias for a shared callback sender.
pub type SharedCallbackSender = Arc<dyn CallbackSender>;

/// Sends responses with a single HTTP PUT.
///
/// The presigned S3 URLs CloudFormation hands out are signed without a
/// content type, so the request carries an empty `content-type` header and
/// an explicit `content-length`.
#[derive(Debug, Clone, Default)]
pub struct HttpCallbackSender {
    http_client: reqwest::Client,
}

impl HttpCallbackSender {
    /// Creates a sender with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sender that reuses an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl CallbackSender for HttpCallbackSender {
    async fn send(
        &self,
        url: &str,
        envelope: &ResponseEnvelope,
        logger: &SharedLogger,
    ) -> Result<(), CustomResourceError> {
        let body = serde_json::to_vec(envelope)?;

        logger.debug(&format!(
            "Sending response to {}: {}",
            url,
            String::from_utf8_lossy(&body)
        ));

        let response = self
            .http_client
            .put(url)
            .header(CONTENT_TYPE, "")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .map_err(|e| CustomResourceError::delivery(url, e.without_url().to_string()))?;

        logger.info(&format!("CloudFormation response status: {}", response.status()));
        Ok(())
    }
}

/// Single-use handle that sends the one response of an invocation.
///
/// [`Responder::send`] consumes the responder, so a second send for the same
/// invocation does not type-check.
pub struct Responder {
    sender: SharedCallbackSender,
    url: String,
    logger: SharedLogger,
}

impl Responder {
    /// Creates a responder addressed to `url`.
    pub fn new(sender: SharedCallbackSender, url: impl Into<String>, logger: SharedLogger) -> Self {
        Self {
            sender,
            url: url.into(),
            logger,
        }
    }

    /// Returns the callback URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends `envelope`. A delivery failure is logged and returned.
    pub async fn send(self, envelope: &ResponseEnvelope) -> Result<(), CustomResourceError> {
        match self.sender.send(&self.url, envelope, &self.logger).await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.logger
                    .error(&format!("Failed to send {} response: {}", envelope.status, error));
                Err(error)
            }
        }
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").field("url", &self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::logger::{LogLevel, TracingLogger};
    use serde_json::json;

    struct RecordingSender {
        sent: Mutex<Vec<(String, ResponseEnvelope)>>,
        fail: bool,
    }

    #[async_trait]
    impl CallbackSender for RecordingSender {
        async fn send(
            &self,
            url: &str,
            envelope: &ResponseEnvelope,
            _logger: &SharedLogger,
        ) -> Result<(), CustomResourceError> {
            self.sent.lock().unwrap().push((url.to_string(), envelope.clone()));
            if self.fail {
                Err(CustomResourceError::delivery(url, "connection reset"))
            } else {
                Ok(())
            }
        }
    }

    fn envelope() -> ResponseEnvelope {
        let event = serde_json::from_value(json!({
            "RequestType": "Create",
            "ResponseURL": "https://example.com/cb",
            "StackId": "stack",
            "RequestId": "req",
            "LogicalResourceId": "Res",
        }))
        .unwrap();
        ResponseEnvelope::failed(&event, "boom")
    }

    fn logger() -> SharedLogger {
        Arc::new(TracingLogger::new(LogLevel::Error))
    }

    #[tokio::test]
    async fn test_responder_sends_to_url() {
        let sender = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
            fail: false,
        });
        let responder = Responder::new(sender.clone(), "https://example.com/cb", logger());
        assert_eq!(responder.url(), "https://example.com/cb");

        responder.send(&envelope()).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://example.com/cb");
        assert_eq!(sent[0].1.reason, "boom");
    }

    #[tokio::test]
    async fn test_responder_propagates_delivery_failure() {
        let sender = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
            fail: true,
        });
        let responder = Responder::new(sender.clone(), "https://example.com/cb", logger());

        let error = responder.send(&envelope()).await.unwrap_err();
        assert!(error.is_delivery());
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_http_sender_reports_connection_failure() {
        let sender = HttpCallbackSender::new();
        let error = sender
            .send("http://127.0.0.1:1/callback", &envelope(), &logger())
            .await
            .unwrap_err();
        assert!(error.is_delivery());
        assert!(error.to_string().contains("127.0.0.1:1"));
    }
}
