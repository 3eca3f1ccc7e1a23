//! Error types for the CloudFormation custom resource adapter.
//!
//! Two layers of errors exist:
//!
//! - [`HandlerError`] is what user handlers (and handler set factories)
//!   return. It carries nothing but a human-readable message, which becomes
//!   the `Reason` of the FAILED response CloudFormation shows in the stack
//!   events.
//! - [`CustomResourceError`] covers every failure the adapter itself can
//!   observe during one invocation. All variants except
//!   [`CustomResourceError::Delivery`] are converted into a FAILED response;
//!   a delivery failure has no channel left to report through and is
//!   returned to the Lambda runtime instead.

use thiserror::Error;

/// Reason used when a failure carries no message of its own.
pub const INTERNAL_ERROR_REASON: &str = "Internal Error";

/// Error returned by a user-supplied lifecycle handler.
///
/// # Example
///
/// ```rust
/// use cfn_custom_resource::HandlerError;
///
/// let error = HandlerError::new("bucket already exists");
/// assert_eq!(error.message(), "bucket already exists");
///
/// let from_str: HandlerError = "quota exceeded".into();
/// assert_eq!(from_str.to_string(), "quota exceeded");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a new handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates a handler error that carries no message.
    ///
    /// The resulting FAILED response uses [`INTERNAL_ERROR_REASON`].
    pub fn empty() -> Self {
        Self {
            message: String::new(),
        }
    }

    /// Wraps any displayable error.
    pub fn from_error(error: impl std::fmt::Display) -> Self {
        Self::new(error.to_string())
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for HandlerError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(error.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Every failure the adapter can observe while serving one invocation.
#[derive(Debug, Error)]
pub enum CustomResourceError {
    /// The event's `RequestType` is not one of `Create`, `Update`, `Delete`.
    #[error("Invalid RequestType: {request_type}")]
    InvalidRequestType {
        /// The request type as received
        request_type: String,
    },

    /// A lifecycle handler rejected. Displays as the handler's own message.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The handler set factory failed before dispatch.
    #[error("{0}")]
    HandlerSetFactory(HandlerError),

    /// The deadline guard fired before the handler settled.
    #[error("Execution timed out")]
    Timeout,

    /// The response envelope could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// The response PUT to the presigned URL did not complete.
    #[error("Failed to deliver response to {url}: {message}")]
    Delivery {
        /// The callback URL the response was addressed to
        url: String,
        /// Error message from the transport
        message: String,
    },
}

impl CustomResourceError {
    /// Creates a new InvalidRequestType error.
    pub fn invalid_request_type(request_type: impl Into<String>) -> Self {
        Self::InvalidRequestType {
            request_type: request_type.into(),
        }
    }

    /// Creates a new Delivery error.
    ///
    /// The query string and fragment of `url` are dropped, since a presigned
    /// URL carries its signature there.
    pub fn delivery(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            url: redact_url(&url.into()),
            message: message.into(),
        }
    }

    /// Returns the `Reason` to report to CloudFormation for this error.
    ///
    /// Falls back to [`INTERNAL_ERROR_REASON`] when the error has no message.
    pub fn reason(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            INTERNAL_ERROR_REASON.to_string()
        } else {
            message
        }
    }

    /// Returns true if this is the deadline guard firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns true if the response itself could not be delivered.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery { .. })
    }
}

impl From<serde_json::Error> for CustomResourceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

/// Keeps the scheme, host, and path of a URL.
fn redact_url(url: &str) -> String {
    url.split(['?', '#']).next().unwrap_or_default().to_string()
}

/// Result alias used throughout the crate.
pub type CustomResourceResult<T> = Result<T, CustomResourceError>;
