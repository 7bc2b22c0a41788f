//! Edit stream: position-relative mutations applied under a moving cursor

use crate::FormatError;
use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Kind of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    PrependFrame,
    RemoveFrame,
    SetAttribute,
    RemoveAttribute,
    UpdateText,
    StepIn,
    StepOut,
}

impl EditKind {
    /// Wire discriminator for this kind
    pub const fn discriminator(self) -> u8 {
        match self {
            EditKind::PrependFrame => 1,
            EditKind::RemoveFrame => 2,
            EditKind::SetAttribute => 3,
            EditKind::RemoveAttribute => 4,
            EditKind::UpdateText => 5,
            EditKind::StepIn => 6,
            EditKind::StepOut => 7,
        }
    }

    /// Decodes a wire discriminator
    pub const fn from_discriminator(value: u8) -> Option<Self> {
        match value {
            1 => Some(EditKind::PrependFrame),
            2 => Some(EditKind::RemoveFrame),
            3 => Some(EditKind::SetAttribute),
            4 => Some(EditKind::RemoveAttribute),
            5 => Some(EditKind::UpdateText),
            6 => Some(EditKind::StepIn),
            7 => Some(EditKind::StepOut),
            _ => None,
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::PrependFrame => "PrependFrame",
            EditKind::RemoveFrame => "RemoveFrame",
            EditKind::SetAttribute => "SetAttribute",
            EditKind::RemoveAttribute => "RemoveAttribute",
            EditKind::UpdateText => "UpdateText",
            EditKind::StepIn => "StepIn",
            EditKind::StepOut => "StepOut",
        };
        f.write_str(name)
    }
}

/// Decoded edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    /// Materialize the subtree at `frame_index` at `sibling_index`
    PrependFrame {
        sibling_index: usize,
        frame_index: usize,
    },
    RemoveFrame {
        sibling_index: usize,
    },
    SetAttribute {
        sibling_index: usize,
        frame_index: usize,
    },
    RemoveAttribute {
        sibling_index: usize,
        attribute_name: &'a str,
    },
    UpdateText {
        sibling_index: usize,
        frame_index: usize,
    },
    /// Descend into the child at `sibling_index`
    StepIn {
        sibling_index: usize,
    },
    /// Ascend to the parent scope
    StepOut,
}

impl<'a> Edit<'a> {
    pub fn kind(&self) -> EditKind {
        match self {
            Edit::PrependFrame { .. } => EditKind::PrependFrame,
            Edit::RemoveFrame { .. } => EditKind::RemoveFrame,
            Edit::SetAttribute { .. } => EditKind::SetAttribute,
            Edit::RemoveAttribute { .. } => EditKind::RemoveAttribute,
            Edit::UpdateText { .. } => EditKind::UpdateText,
            Edit::StepIn { .. } => EditKind::StepIn,
            Edit::StepOut => EditKind::StepOut,
        }
    }
}

/// Fixed-shape wire record for one edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdit {
    pub edit_type: u8,
    #[serde(default)]
    pub sibling_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_tree_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_attribute_name: Option<String>,
}

impl RawEdit {
    fn with_frame(kind: EditKind, sibling_index: usize, frame_index: usize) -> Self {
        Self {
            edit_type: kind.discriminator(),
            sibling_index,
            new_tree_index: Some(frame_index),
            removed_attribute_name: None,
        }
    }

    pub fn prepend_frame(sibling_index: usize, frame_index: usize) -> Self {
        Self::with_frame(EditKind::PrependFrame, sibling_index, frame_index)
    }

    pub fn remove_frame(sibling_index: usize) -> Self {
        Self {
            edit_type: EditKind::RemoveFrame.discriminator(),
            sibling_index,
            ..Self::default()
        }
    }

    pub fn set_attribute(sibling_index: usize, frame_index: usize) -> Self {
        Self::with_frame(EditKind::SetAttribute, sibling_index, frame_index)
    }

    pub fn remove_attribute(sibling_index: usize, attribute_name: impl Into<String>) -> Self {
        Self {
            edit_type: EditKind::RemoveAttribute.discriminator(),
            sibling_index,
            new_tree_index: None,
            removed_attribute_name: Some(attribute_name.into()),
        }
    }

    pub fn update_text(sibling_index: usize, frame_index: usize) -> Self {
        Self::with_frame(EditKind::UpdateText, sibling_index, frame_index)
    }

    pub fn step_in(sibling_index: usize) -> Self {
        Self {
            edit_type: EditKind::StepIn.discriminator(),
            sibling_index,
            ..Self::default()
        }
    }

    pub fn step_out() -> Self {
        Self {
            edit_type: EditKind::StepOut.discriminator(),
            ..Self::default()
        }
    }

    /// Decodes this record; `index` is only used for error reporting
    pub fn decode(&self, index: usize) -> Result<Edit<'_>, FormatError> {
        let kind =
            EditKind::from_discriminator(self.edit_type).ok_or(FormatError::UnknownEditType {
                index,
                edit_type: self.edit_type,
            })?;
        let sibling_index = self.sibling_index;
        let frame_index = || {
            self.new_tree_index.ok_or(FormatError::MissingField {
                index,
                field: "newTreeIndex",
            })
        };

        Ok(match kind {
            EditKind::PrependFrame => Edit::PrependFrame {
                sibling_index,
                frame_index: frame_index()?,
            },
            EditKind::RemoveFrame => Edit::RemoveFrame { sibling_index },
            EditKind::SetAttribute => Edit::SetAttribute {
                sibling_index,
                frame_index: frame_index()?,
            },
            EditKind::RemoveAttribute => Edit::RemoveAttribute {
                sibling_index,
                attribute_name: self.removed_attribute_name.as_deref().ok_or(
                    FormatError::MissingField {
                        index,
                        field: "removedAttributeName",
                    },
                )?,
            },
            EditKind::UpdateText => Edit::UpdateText {
                sibling_index,
                frame_index: frame_index()?,
            },
            EditKind::StepIn => Edit::StepIn { sibling_index },
            EditKind::StepOut => Edit::StepOut,
        })
    }
}

/// Read-only indexed accessor over a segment of an edit array
///
/// Indices passed to the accessors are relative to the segment start.
#[derive(Debug, Clone, Copy)]
pub struct EditView<'a> {
    edits: &'a [RawEdit],
}

impl<'a> EditView<'a> {
    pub fn new(edits: &'a [RawEdit]) -> Self {
        Self { edits }
    }

    /// Views `count` edits starting at `offset`
    pub fn segment(edits: &'a [RawEdit], offset: usize, count: usize) -> Result<Self, FormatError> {
        let out_of_range = FormatError::SegmentOutOfRange {
            offset,
            count,
            len: edits.len(),
        };
        let end = offset.checked_add(count).ok_or(out_of_range.clone())?;
        let edits = edits.get(offset..end).ok_or(out_of_range)?;
        Ok(Self { edits })
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    fn raw(&self, index: usize) -> Result<&'a RawEdit, FormatError> {
        self.edits.get(index).ok_or(FormatError::EditOutOfRange {
            index,
            len: self.edits.len(),
        })
    }

    pub fn kind(&self, index: usize) -> Result<EditKind, FormatError> {
        let raw = self.raw(index)?;
        EditKind::from_discriminator(raw.edit_type).ok_or(FormatError::UnknownEditType {
            index,
            edit_type: raw.edit_type,
        })
    }

    pub fn edit(&self, index: usize) -> Result<Edit<'a>, FormatError> {
        self.raw(index)?.decode(index)
    }

    pub fn sibling_index(&self, index: usize) -> Result<usize, FormatError> {
        Ok(self.raw(index)?.sibling_index)
    }

    /// Decodes edits in order
    pub fn iter(&self) -> impl Iterator<Item = Result<Edit<'a>, FormatError>> + 'a {
        self.edits
            .iter()
            .enumerate()
            .map(|(index, raw)| raw.decode(index))
    }
}
