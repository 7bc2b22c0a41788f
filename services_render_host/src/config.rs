//! Renderer configuration
//!
//! Baked-in defaults with optional JSON overrides layered on top. An override
//! of `null` for an event attribute drops that default mapping.

use host_tree::EventClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_COMPONENT_CONTAINER_TAG: &str = "component-host";
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse renderer config: {0}")]
    Parse(String),

    #[error("Invalid renderer config: {0}")]
    Invalid(String),
}

/// Effective renderer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    /// Tag of the synthetic element wrapping each child component
    pub component_container_tag: String,
    /// Attribute names bound as event listeners instead of set as attributes
    pub event_attributes: BTreeMap<String, EventClass>,
    /// Deepest cursor or materialization nesting accepted in one batch
    pub max_depth: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let event_attributes = [
            ("onclick", EventClass::Click),
            ("onkeypress", EventClass::KeyPress),
            ("onchange", EventClass::Change),
        ]
        .into_iter()
        .map(|(name, class)| (name.to_string(), class))
        .collect();

        Self {
            component_container_tag: DEFAULT_COMPONENT_CONTAINER_TAG.to_string(),
            event_attributes,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Partial configuration as read from JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct ConfigOverrides {
    component_container_tag: Option<String>,
    event_attributes: BTreeMap<String, Option<EventClass>>,
    max_depth: Option<usize>,
}

impl RendererConfig {
    /// Parses JSON overrides and layers them over the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let mut config = Self::default();
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(tag) = overrides.component_container_tag {
            self.component_container_tag = tag;
        }
        for (name, class) in overrides.event_attributes {
            match class {
                Some(class) => {
                    self.event_attributes.insert(name, class);
                }
                None => {
                    self.event_attributes.remove(&name);
                }
            }
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.component_container_tag.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "componentContainerTag must not be empty".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Adds or replaces one event attribute mapping
    pub fn with_event_attribute(mut self, name: impl Into<String>, class: EventClass) -> Self {
        self.event_attributes.insert(name.into(), class);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Interaction class bound for `attribute_name`, if any
    pub fn event_class_for(&self, attribute_name: &str) -> Option<EventClass> {
        self.event_attributes.get(attribute_name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.component_container_tag, "component-host");
        assert_eq!(config.event_class_for("onclick"), Some(EventClass::Click));
        assert_eq!(
            config.event_class_for("onkeypress"),
            Some(EventClass::KeyPress)
        );
        assert_eq!(config.event_class_for("class"), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_defaults() {
        assert_eq!(
            RendererConfig::from_json("{}").unwrap(),
            RendererConfig::default()
        );
    }

    #[test]
    fn test_overrides_layer_over_defaults() {
        let config = RendererConfig::from_json(
            r#"{
                "componentContainerTag": "x-component",
                "eventAttributes": { "ondblclick": "click", "onchange": null },
                "maxDepth": 8
            }"#,
        )
        .unwrap();

        assert_eq!(config.component_container_tag, "x-component");
        assert_eq!(config.event_class_for("ondblclick"), Some(EventClass::Click));
        assert_eq!(config.event_class_for("onclick"), Some(EventClass::Click));
        assert_eq!(config.event_class_for("onchange"), None);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn test_invalid_overrides() {
        assert!(matches!(
            RendererConfig::from_json(r#"{"maxDepth": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RendererConfig::from_json(r#"{"componentContainerTag": " "}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RendererConfig::from_json(r#"{"unknownKey": 1}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = RendererConfig::default()
            .with_event_attribute("oninput", EventClass::Change)
            .with_max_depth(4);
        assert_eq!(config.event_class_for("oninput"), Some(EventClass::Change));
        assert_eq!(config.max_depth, 4);
    }
}
