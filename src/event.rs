//! CloudFormation custom resource request events.
//!
//! [`CustomResourceEvent`] is the wire shape CloudFormation delivers. The
//! request type is kept as a plain string so that an event with an
//! unrecognized `RequestType` still deserializes and can be answered with a
//! FAILED response instead of being dropped by the runtime.
//!
//! Handlers never see the raw event. The dispatcher converts it into one of
//! the typed [`CreateRequest`], [`UpdateRequest`], or [`DeleteRequest`]
//! variants, each carrying only the fields CloudFormation sends for that
//! request type.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CustomResourceError;

/// Raw custom resource event as delivered by CloudFormation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceEvent {
    /// `Create`, `Update`, or `Delete`; anything else, including a missing
    /// key, is rejected at dispatch
    #[serde(rename = "RequestType", default)]
    pub request_type: String,

    /// ARN of the stack that contains the custom resource
    #[serde(rename = "StackId")]
    pub stack_id: String,

    /// Unique id for this request
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Template logical name of the custom resource
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,

    /// Presigned URL the response must be PUT to
    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    /// ARN of the function or topic serving the resource
    #[serde(rename = "ServiceToken", default)]
    pub service_token: String,

    /// Template resource type, e.g. `Custom::Bucket`
    #[serde(rename = "ResourceType", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Physical id returned by an earlier Create or Update (Update and Delete only)
    #[serde(rename = "PhysicalResourceId", default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Properties from the template
    #[serde(rename = "ResourceProperties", default)]
    pub resource_properties: Map<String, Value>,

    /// Properties before the update (Update only)
    #[serde(rename = "OldResourceProperties", default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Map<String, Value>>,
}

impl CustomResourceEvent {
    /// Returns a string resource property, if present.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.resource_properties.get(key).and_then(Value::as_str)
    }
}

/// The three lifecycle request types CloudFormation sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// A new resource is being created
    Create,
    /// An existing resource's properties changed
    Update,
    /// The resource is being removed
    Delete,
}

impl RequestType {
    /// Returns the wire name of the request type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = CustomResourceError;

    /// Parses a request type. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Create" => Ok(Self::Create),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            other => Err(CustomResourceError::invalid_request_type(other)),
        }
    }
}

/// Fields common to every request type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCommon {
    /// ARN of the owning stack
    pub stack_id: String,
    /// Unique id for this request
    pub request_id: String,
    /// Template logical name of the resource
    pub logical_resource_id: String,
    /// Presigned callback URL
    pub response_url: String,
    /// ARN of the serving function
    pub service_token: String,
    /// Template resource type, if sent
    pub resource_type: Option<String>,
}

impl From<&CustomResourceEvent> for RequestCommon {
    fn from(event: &CustomResourceEvent) -> Self {
        Self {
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            response_url: event.response_url.clone(),
            service_token: event.service_token.clone(),
            resource_type: event.resource_type.clone(),
        }
    }
}

fn decode_properties<T: DeserializeOwned>(
    properties: &Map<String, Value>,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(properties.clone()))
}

/// A `Create` request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    /// Common request fields
    pub common: RequestCommon,
    /// Properties from the template
    pub resource_properties: Map<String, Value>,
}

impl CreateRequest {
    /// Decodes the resource properties into a user type.
    pub fn properties<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        decode_properties(&self.resource_properties)
    }
}

/// An `Update` request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    /// Common request fields
    pub common: RequestCommon,
    /// The physical id currently recorded by CloudFormation
    pub physical_resource_id: String,
    /// New properties from the template
    pub resource_properties: Map<String, Value>,
    /// Properties as they were before this update
    pub old_resource_properties: Map<String, Value>,
}

impl UpdateRequest {
    /// Decodes the new resource properties into a user type.
    pub fn properties<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        decode_properties(&self.resource_properties)
    }

    /// Decodes the pre-update resource properties into a user type.
    pub fn old_properties<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        decode_properties(&self.old_resource_properties)
    }
}

/// A `Delete` request.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    /// Common request fields
    pub common: RequestCommon,
    /// The physical id of the resource being deleted
    pub physical_resource_id: String,
    /// Properties from the template
    pub resource_properties: Map<String, Value>,
}

impl DeleteRequest {
    /// Decodes the resource properties into a user type.
    pub fn properties<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        decode_properties(&self.resource_properties)
    }
}

/// A request narrowed to its lifecycle variant.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomResourceRequest {
    /// See [`CreateRequest`]
    Create(CreateRequest),
    /// See [`UpdateRequest`]
    Update(UpdateRequest),
    /// See [`DeleteRequest`]
    Delete(DeleteRequest),
}

impl CustomResourceRequest {
    /// Returns the request type of this variant.
    pub fn request_type(&self) -> RequestType {
        match self {
            Self::Create(_) => RequestType::Create,
            Self::Update(_) => RequestType::Update,
            Self::Delete(_) => RequestType::Delete,
        }
    }
}

impl TryFrom<&CustomResourceEvent> for CustomResourceRequest {
    type Error = CustomResourceError;

    fn try_from(event: &CustomResourceEvent) -> Result<Self, Self::Error> {
        let common = RequestCommon::from(event);
        let physical_resource_id = event.physical_resource_id.clone().unwrap_or_default();
        let request = match event.request_type.parse::<RequestType>()? {
            RequestType::Create => Self::Create(CreateRequest {
                common,
                resource_properties: event.resource_properties.clone(),
            }),
            RequestType::Update => Self::Update(UpdateRequest {
                common,
                physical_resource_id,
                resource_properties: event.resource_properties.clone(),
                old_resource_properties: event.old_resource_properties.clone().unwrap_or_default(),
            }),
            RequestType::Delete => Self::Delete(DeleteRequest {
                common,
                physical_resource_id,
                resource_properties: event.resource_properties.clone(),
            }),
        };
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATE_EVENT: &str = r#"{
        "RequestType": "Update",
        "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:provider",
        "ResponseURL": "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/abc",
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/demo/guid",
        "RequestId": "req-1",
        "LogicalResourceId": "MyResource",
        "PhysicalResourceId": "phys-1",
        "ResourceType": "Custom::Thing",
        "ResourceProperties": {"ServiceToken": "arn", "Name": "new", "LogLevel": "debug"},
        "OldResourceProperties": {"ServiceToken": "arn", "Name": "old"}
    }"#;

    #[derive(Debug, Deserialize)]
    struct NameProps {
        #[serde(rename = "Name")]
        name: String,
    }

    #[test]
    fn test_event_deserialization() {
        let event: CustomResourceEvent = serde_json::from_str(UPDATE_EVENT).unwrap();
        assert_eq!(event.request_type, "Update");
        assert_eq!(event.request_id, "req-1");
        assert_eq!(event.physical_resource_id.as_deref(), Some("phys-1"));
        assert_eq!(event.resource_type.as_deref(), Some("Custom::Thing"));
        assert_eq!(event.property_str("LogLevel"), Some("debug"));
        assert!(event.old_resource_properties.is_some());
    }

    #[test]
    fn test_minimal_create_event() {
        let json = r#"{
            "RequestType": "Create",
            "ResponseURL": "https://example.com/cb",
            "StackId": "stack",
            "RequestId": "req",
            "LogicalResourceId": "Res"
        }"#;
        let event: CustomResourceEvent = serde_json::from_str(json).unwrap();
        assert!(event.resource_properties.is_empty());
        assert!(event.physical_resource_id.is_none());
        assert_eq!(event.service_token, "");
    }

    #[test]
    fn test_unknown_request_type_deserializes() {
        let json = UPDATE_EVENT.replace("\"Update\"", "\"Replace\"");
        let event: CustomResourceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.request_type, "Replace");

        let error = CustomResourceRequest::try_from(&event).unwrap_err();
        assert_eq!(error.reason(), "Invalid RequestType: Replace");
    }

    #[test]
    fn test_missing_request_type_deserializes() {
        let json = r#"{
            "ResponseURL": "https://example.com/cb",
            "StackId": "stack",
            "RequestId": "req",
            "LogicalResourceId": "Res"
        }"#;
        let event: CustomResourceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.request_type, "");

        let error = CustomResourceRequest::try_from(&event).unwrap_err();
        assert_eq!(error.reason(), "Invalid RequestType: ");
    }

    #[test]
    fn test_update_request_conversion() {
        let event: CustomResourceEvent = serde_json::from_str(UPDATE_EVENT).unwrap();
        let request = CustomResourceRequest::try_from(&event).unwrap();
        assert_eq!(request.request_type(), RequestType::Update);

        let CustomResourceRequest::Update(update) = request else {
            panic!("expected an update request");
        };
        assert_eq!(update.physical_resource_id, "phys-1");
        assert_eq!(update.common.logical_resource_id, "MyResource");
        assert_eq!(update.properties::<NameProps>().unwrap().name, "new");
        assert_eq!(update.old_properties::<NameProps>().unwrap().name, "old");
    }

    #[test]
    fn test_request_type_parsing_is_case_sensitive() {
        assert_eq!("Create".parse::<RequestType>().unwrap(), RequestType::Create);
        assert_eq!("Update".parse::<RequestType>().unwrap(), RequestType::Update);
        assert_eq!("Delete".parse::<RequestType>().unwrap(), RequestType::Delete);
        assert!("create".parse::<RequestType>().is_err());
        assert!("DELETE".parse::<RequestType>().is_err());
        assert!("".parse::<RequestType>().is_err());
    }

    #[test]
    fn test_event_serialization_keeps_wire_names() {
        let event: CustomResourceEvent = serde_json::from_str(UPDATE_EVENT).unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""ResponseURL":"#));
        assert!(json.contains(r#""OldResourceProperties":"#));
        assert!(json.contains(r#""LogicalResourceId":"MyResource""#));
    }
}
