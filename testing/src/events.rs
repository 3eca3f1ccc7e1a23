//! Builders for CloudFormation request events.

use serde_json::{Map, Value};

use cfn_custom_resource::CustomResourceEvent;

/// Stack ARN used by built events.
pub const TEST_STACK_ID: &str =
    "arn:aws:cloudformation:us-east-1:123456789012:stack/test-stack/8a0dbb70-5d1a-11ee-8c99-0242ac120002";

/// Request id used by built events.
pub const TEST_REQUEST_ID: &str = "5f1e7a9c-0c53-4c43-9d0e-3f0b6a1b2c3d";

/// Logical resource id used by built events.
pub const TEST_LOGICAL_RESOURCE_ID: &str = "TestResource";

/// Response URL used by built events.
pub const TEST_RESPONSE_URL: &str =
    "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/test-response";

/// Service token used by built events.
pub const TEST_SERVICE_TOKEN: &str = "arn:aws:lambda:us-east-1:123456789012:function:test-provider";

/// Physical resource id given to Update and Delete events by default.
pub const TEST_PHYSICAL_RESOURCE_ID: &str = "test-physical-id";

/// Fluent builder for [`CustomResourceEvent`].
///
/// # Examples
///
/// ```
/// use cfn_custom_resource_testing::EventBuilder;
///
/// let event = EventBuilder::update()
///     .property("Name", "new")
///     .old_property("Name", "old")
///     .build();
///
/// assert_eq!(event.request_type, "Update");
/// assert_eq!(event.property_str("Name"), Some("new"));
/// ```
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: CustomResourceEvent,
}

impl EventBuilder {
    /// Starts an event with an arbitrary request type.
    pub fn request_type(request_type: impl Into<String>) -> Self {
        let mut resource_properties = Map::new();
        resource_properties.insert("ServiceToken".to_string(), Value::from(TEST_SERVICE_TOKEN));

        Self {
            event: CustomResourceEvent {
                request_type: request_type.into(),
                stack_id: TEST_STACK_ID.to_string(),
                request_id: TEST_REQUEST_ID.to_string(),
                logical_resource_id: TEST_LOGICAL_RESOURCE_ID.to_string(),
                response_url: TEST_RESPONSE_URL.to_string(),
                service_token: TEST_SERVICE_TOKEN.to_string(),
                resource_type: Some("Custom::Test".to_string()),
                physical_resource_id: None,
                resource_properties,
                old_resource_properties: None,
            },
        }
    }

    /// Starts a `Create` event.
    pub fn create() -> Self {
        Self::request_type("Create")
    }

    /// Starts an `Update` event with a physical id and empty old properties.
    pub fn update() -> Self {
        let mut builder = Self::request_type("Update").physical_resource_id(TEST_PHYSICAL_RESOURCE_ID);
        builder.event.old_resource_properties = Some(Map::new());
        builder
    }

    /// Starts a `Delete` event with a physical id.
    pub fn delete() -> Self {
        Self::request_type("Delete").physical_resource_id(TEST_PHYSICAL_RESOURCE_ID)
    }

    /// Sets the physical resource id.
    pub fn physical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.event.physical_resource_id = Some(id.into());
        self
    }

    /// Removes the physical resource id.
    pub fn without_physical_resource_id(mut self) -> Self {
        self.event.physical_resource_id = None;
        self
    }

    /// Sets the response URL.
    pub fn response_url(mut self, url: impl Into<String>) -> Self {
        self.event.response_url = url.into();
        self
    }

    /// Sets the request id.
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.event.request_id = id.into();
        self
    }

    /// Sets the logical resource id.
    pub fn logical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.event.logical_resource_id = id.into();
        self
    }

    /// Adds a resource property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.resource_properties.insert(key.into(), value.into());
        self
    }

    /// Adds an old resource property.
    pub fn old_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event
            .old_resource_properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the `LogLevel` resource property.
    pub fn log_level(self, level: &str) -> Self {
        self.property("LogLevel", level)
    }

    /// Finishes the event.
    pub fn build(self) -> CustomResourceEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let event = EventBuilder::create().build();
        assert_eq!(event.request_type, "Create");
        assert_eq!(event.response_url, TEST_RESPONSE_URL);
        assert!(event.physical_resource_id.is_none());
        assert_eq!(event.property_str("ServiceToken"), Some(TEST_SERVICE_TOKEN));
    }

    #[test]
    fn test_delete_has_physical_id() {
        let event = EventBuilder::delete().build();
        assert_eq!(event.physical_resource_id.as_deref(), Some(TEST_PHYSICAL_RESOURCE_ID));

        let event = EventBuilder::delete().without_physical_resource_id().build();
        assert!(event.physical_resource_id.is_none());
    }

    #[test]
    fn test_built_event_round_trips_through_wire_format() {
        let event = EventBuilder::update().property("Size", 3).log_level("debug").build();
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CustomResourceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
