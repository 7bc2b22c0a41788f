//! Identifiers shared between the producer runtime and the renderer

use core::fmt;
use serde::{Deserialize, Serialize};

/// Producer-assigned identifier of a component instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(u32);

impl ComponentId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component:{}", self.0)
    }
}

/// Identifier of one renderer attached to a host tree
///
/// Several renderers may drive disjoint parts of the same host; events carry
/// the renderer id so the producer can route them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererId(u32);

impl RendererId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "renderer:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_component_id_display() {
        assert_eq!(format!("{}", ComponentId::new(7)), "component:7");
    }

    #[test]
    fn test_renderer_id_display() {
        assert_eq!(format!("{}", RendererId::new(1)), "renderer:1");
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&ComponentId::new(12)).unwrap();
        assert_eq!(json, "12");
        let id: RendererId = serde_json::from_str("3").unwrap();
        assert_eq!(id, RendererId::new(3));
    }
}
