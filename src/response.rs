//! Response envelope PUT back to CloudFormation.
//!
//! The field names and capitalization of [`ResponseEnvelope`] are a
//! compatibility contract with the CloudFormation service.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dispatch::DispatchOutcome;
use crate::event::CustomResourceEvent;
use crate::handler::DEFAULT_PHYSICAL_RESOURCE_ID;

/// Reason sent with every SUCCESS response.
pub const SUCCESS_REASON: &str = "OK";

/// Outcome reported to CloudFormation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// The lifecycle operation completed
    Success,
    /// The lifecycle operation failed; the stack operation rolls back
    Failed,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// The JSON body PUT to the event's `ResponseURL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// SUCCESS or FAILED
    #[serde(rename = "Status")]
    pub status: ResponseStatus,

    /// Human-readable explanation shown in the stack events
    #[serde(rename = "Reason")]
    pub reason: String,

    /// Id of the managed resource
    #[serde(rename = "PhysicalResourceId")]
    pub physical_resource_id: String,

    /// Copied from the request
    #[serde(rename = "StackId")]
    pub stack_id: String,

    /// Copied from the request
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Copied from the request
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,

    /// Attributes readable with `Fn::GetAtt`
    #[serde(rename = "Data")]
    pub data: Map<String, Value>,
}

impl ResponseEnvelope {
    fn for_event(
        event: &CustomResourceEvent,
        status: ResponseStatus,
        reason: String,
        physical_resource_id: String,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            status,
            reason,
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data,
        }
    }

    /// Builds a SUCCESS envelope from a dispatch outcome.
    ///
    /// A completed Delete echoes the incoming physical id, falling back to
    /// `"None"` when the event carried none.
    pub fn success(event: &CustomResourceEvent, outcome: DispatchOutcome) -> Self {
        let (physical_resource_id, data) = match outcome {
            DispatchOutcome::Resource(result) => (result.physical_resource_id, result.data),
            DispatchOutcome::Deleted => (
                event
                    .physical_resource_id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PHYSICAL_RESOURCE_ID.to_string()),
                Map::new(),
            ),
        };
        Self::for_event(
            event,
            ResponseStatus::Success,
            SUCCESS_REASON.to_string(),
            physical_resource_id,
            data,
        )
    }

    /// Builds a FAILED envelope with physical id `"None"` and empty data.
    pub fn failed(event: &CustomResourceEvent, reason: impl Into<String>) -> Self {
        Self::for_event(
            event,
            ResponseStatus::Failed,
            reason.into(),
            DEFAULT_PHYSICAL_RESOURCE_ID.to_string(),
            Map::new(),
        )
    }

    /// Returns true if this is a SUCCESS response.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Returns true if this is a FAILED response.
    pub fn is_failed(&self) -> bool {
        self.status == ResponseStatus::Failed
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::handler::HandlerResult;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any SUCCESS envelope serializes to exactly the seven contract
        /// keys and carries the handler's id and data unchanged.
        #[test]
        fn prop_success_envelope_shape(
            physical_id in "[a-zA-Z0-9-]{1,40}",
            key in "[A-Za-z]{1,10}",
            value in any::<i64>(),
        ) {
            let event: CustomResourceEvent = serde_json::from_value(json!({
                "RequestType": "Create",
                "ResponseURL": "https://example.com/cb",
                "StackId": "stack",
                "RequestId": "req",
                "LogicalResourceId": "Res",
            })).unwrap();
            let result = HandlerResult::new(physical_id.clone()).with_value(key.clone(), value);
            let envelope = ResponseEnvelope::success(&event, DispatchOutcome::Resource(result));

            let json = serde_json::to_value(&envelope).unwrap();
            let object = json.as_object().unwrap();
            let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
            keys.sort_unstable();
            prop_assert_eq!(
                keys,
                vec!["Data", "LogicalResourceId", "PhysicalResourceId", "Reason", "RequestId", "StackId", "Status"]
            );
            prop_assert_eq!(&json["PhysicalResourceId"], &json!(physical_id));
            prop_assert_eq!(&json["Data"][key.as_str()], &json!(value));
            prop_assert_eq!(&json["Status"], &json!("SUCCESS"));
        }
    }
}
