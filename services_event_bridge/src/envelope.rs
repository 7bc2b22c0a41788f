//! Outbound event envelope

use host_tree::{EventClass, EventPayload};
use render_types::{ComponentId, RendererId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Action name the producer runtime routes event envelopes by
pub const EVENT_DISPATCH_ACTION: &str = "render.dispatch_event";

/// Schema version of [`EventEnvelope`]
pub const EVENT_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

/// Unique identifier for one dispatched event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatchId(Uuid);

impl DispatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dispatch({})", self.0)
    }
}

/// Schema version for envelope payloads
///
/// Same major version = compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Identifies the attribute frame that should react to an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub renderer_id: RendererId,
    pub component_id: ComponentId,
    pub frame_index: usize,
    pub event_class: EventClass,
}

/// One outbound call to the producer runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub id: DispatchId,
    pub action: String,
    pub schema_version: SchemaVersion,
    pub descriptor: EventDescriptor,
    pub payload: EventPayload,
}

impl EventEnvelope {
    pub fn new(descriptor: EventDescriptor, payload: EventPayload) -> Self {
        Self {
            id: DispatchId::new(),
            action: EVENT_DISPATCH_ACTION.to_string(),
            schema_version: EVENT_SCHEMA_VERSION,
            descriptor,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> EventDescriptor {
        EventDescriptor {
            renderer_id: RendererId::new(1),
            component_id: ComponentId::new(2),
            frame_index: 3,
            event_class: EventClass::Click,
        }
    }

    #[test]
    fn test_dispatch_ids_unique() {
        assert_ne!(DispatchId::new(), DispatchId::new());
        assert!(DispatchId::new().to_string().starts_with("Dispatch("));
    }

    #[test]
    fn test_schema_version_compatibility() {
        let v1_0 = SchemaVersion::new(1, 0);
        let v1_2 = SchemaVersion::new(1, 2);
        let v2_0 = SchemaVersion::new(2, 0);

        assert!(v1_0.is_compatible_with(&v1_2));
        assert!(!v1_0.is_compatible_with(&v2_0));
        assert_eq!(v1_2.to_string(), "v1.2");
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope = EventEnvelope::new(descriptor(), EventPayload::Mouse);
        assert_eq!(envelope.action, EVENT_DISPATCH_ACTION);
        assert_eq!(envelope.schema_version, EVENT_SCHEMA_VERSION);
        assert_eq!(envelope.descriptor.frame_index, 3);
    }

    #[test]
    fn test_descriptor_json_shape() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rendererId": 1,
                "componentId": 2,
                "frameIndex": 3,
                "eventClass": "click"
            })
        );
    }
}
