//! Reference frames: the preorder-flattened shape of a component's output
//!
//! For an element or component frame at index `i`, its descendants occupy
//! `(i, descendants_end_index]`. An element's attribute frames come first in
//! that range, before any child frame.

use crate::{ComponentId, FormatError};
use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Kind of a reference frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    Element,
    Text,
    Attribute,
    Component,
}

impl FrameKind {
    /// Wire discriminator for this kind
    pub const fn discriminator(self) -> u8 {
        match self {
            FrameKind::Element => 1,
            FrameKind::Text => 2,
            FrameKind::Attribute => 3,
            FrameKind::Component => 4,
        }
    }

    /// Decodes a wire discriminator
    pub const fn from_discriminator(value: u8) -> Option<Self> {
        match value {
            1 => Some(FrameKind::Element),
            2 => Some(FrameKind::Text),
            3 => Some(FrameKind::Attribute),
            4 => Some(FrameKind::Component),
            _ => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Element => write!(f, "Element"),
            FrameKind::Text => write!(f, "Text"),
            FrameKind::Attribute => write!(f, "Attribute"),
            FrameKind::Component => write!(f, "Component"),
        }
    }
}

/// Decoded frame, borrowing its strings from the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    Element {
        name: &'a str,
        descendants_end_index: usize,
    },
    Text {
        content: &'a str,
    },
    Attribute {
        name: &'a str,
        value: &'a str,
    },
    Component {
        component_id: ComponentId,
        descendants_end_index: usize,
    },
}

impl<'a> Frame<'a> {
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Element { .. } => FrameKind::Element,
            Frame::Text { .. } => FrameKind::Text,
            Frame::Attribute { .. } => FrameKind::Attribute,
            Frame::Component { .. } => FrameKind::Component,
        }
    }

    /// Last index of this frame's descendant range, if it can have descendants
    pub fn descendants_end_index(&self) -> Option<usize> {
        match self {
            Frame::Element {
                descendants_end_index,
                ..
            }
            | Frame::Component {
                descendants_end_index,
                ..
            } => Some(*descendants_end_index),
            Frame::Text { .. } | Frame::Attribute { .. } => None,
        }
    }
}

/// Fixed-shape wire record for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrame {
    pub frame_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<ComponentId>,
    #[serde(default)]
    pub descendants_end_index: usize,
}

impl RawFrame {
    pub fn element(name: impl Into<String>, descendants_end_index: usize) -> Self {
        Self {
            frame_type: FrameKind::Element.discriminator(),
            element_name: Some(name.into()),
            descendants_end_index,
            ..Self::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            frame_type: FrameKind::Text.discriminator(),
            text_content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            frame_type: FrameKind::Attribute.discriminator(),
            attribute_name: Some(name.into()),
            attribute_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn component(component_id: ComponentId, descendants_end_index: usize) -> Self {
        Self {
            frame_type: FrameKind::Component.discriminator(),
            component_id: Some(component_id),
            descendants_end_index,
            ..Self::default()
        }
    }

    /// Decodes this record; `index` is only used for error reporting
    pub fn decode(&self, index: usize) -> Result<Frame<'_>, FormatError> {
        let kind =
            FrameKind::from_discriminator(self.frame_type).ok_or(FormatError::UnknownFrameType {
                index,
                frame_type: self.frame_type,
            })?;
        let missing = |field| FormatError::MissingField { index, field };

        Ok(match kind {
            FrameKind::Element => Frame::Element {
                name: self.element_name.as_deref().ok_or(missing("elementName"))?,
                descendants_end_index: self.descendants_end_index,
            },
            FrameKind::Text => Frame::Text {
                content: self.text_content.as_deref().ok_or(missing("textContent"))?,
            },
            FrameKind::Attribute => Frame::Attribute {
                name: self
                    .attribute_name
                    .as_deref()
                    .ok_or(missing("attributeName"))?,
                value: self.attribute_value.as_deref().unwrap_or_default(),
            },
            FrameKind::Component => Frame::Component {
                component_id: self.component_id.ok_or(missing("componentId"))?,
                descendants_end_index: self.descendants_end_index,
            },
        })
    }
}

/// Read-only indexed accessor over a frame buffer
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    frames: &'a [RawFrame],
}

impl<'a> FrameView<'a> {
    pub fn new(frames: &'a [RawFrame]) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn raw(&self, index: usize) -> Result<&'a RawFrame, FormatError> {
        self.frames.get(index).ok_or(FormatError::FrameOutOfRange {
            index,
            len: self.frames.len(),
        })
    }

    pub fn kind(&self, index: usize) -> Result<FrameKind, FormatError> {
        let raw = self.raw(index)?;
        FrameKind::from_discriminator(raw.frame_type).ok_or(FormatError::UnknownFrameType {
            index,
            frame_type: raw.frame_type,
        })
    }

    pub fn frame(&self, index: usize) -> Result<Frame<'a>, FormatError> {
        self.raw(index)?.decode(index)
    }

    pub fn element_name(&self, index: usize) -> Result<&'a str, FormatError> {
        match self.frame(index)? {
            Frame::Element { name, .. } => Ok(name),
            _ => Err(FormatError::MissingField {
                index,
                field: "elementName",
            }),
        }
    }

    pub fn text_content(&self, index: usize) -> Result<&'a str, FormatError> {
        match self.frame(index)? {
            Frame::Text { content } => Ok(content),
            _ => Err(FormatError::MissingField {
                index,
                field: "textContent",
            }),
        }
    }

    pub fn attribute_name(&self, index: usize) -> Result<&'a str, FormatError> {
        match self.frame(index)? {
            Frame::Attribute { name, .. } => Ok(name),
            _ => Err(FormatError::MissingField {
                index,
                field: "attributeName",
            }),
        }
    }

    pub fn attribute_value(&self, index: usize) -> Result<&'a str, FormatError> {
        match self.frame(index)? {
            Frame::Attribute { value, .. } => Ok(value),
            _ => Err(FormatError::MissingField {
                index,
                field: "attributeValue",
            }),
        }
    }

    pub fn component_id(&self, index: usize) -> Result<ComponentId, FormatError> {
        match self.frame(index)? {
            Frame::Component { component_id, .. } => Ok(component_id),
            _ => Err(FormatError::MissingField {
                index,
                field: "componentId",
            }),
        }
    }

    /// Inclusive end of the descendant range; zero for kinds without descendants
    pub fn descendants_end_index(&self, index: usize) -> Result<usize, FormatError> {
        Ok(self.frame(index)?.descendants_end_index().unwrap_or(0))
    }
}
