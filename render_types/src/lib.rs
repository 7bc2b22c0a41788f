#![cfg_attr(not(test), no_std)]

//! # Render Types
//!
//! Wire schemas for remote rendering: the reference frame buffer, the edit
//! stream that mutates a host tree towards it, and the batch that carries
//! both.
//!
//! ## Philosophy
//!
//! - **Flat, not nested**: Frames are a preorder flattening of a tree; structure
//!   is carried by `descendants_end_index`, never by pointers
//! - **Relative, not absolute**: Edits address siblings relative to a cursor
//! - **Closed kinds**: Every record decodes into a closed enum or fails
//! - **Borrowed views**: Decoding never copies strings out of the buffers
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A diffing algorithm
//! - A host tree implementation
//! - A component model

extern crate alloc;

pub mod batch;
pub mod edit;
pub mod frame;
pub mod ids;

pub use batch::{ComponentDiff, RenderBatch};
pub use edit::{Edit, EditKind, EditView, RawEdit};
pub use frame::{Frame, FrameKind, FrameView, RawFrame};
pub use ids::{ComponentId, RendererId};

use core::fmt;

/// Errors raised while decoding frame or edit buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Frame discriminator is not a known frame kind
    UnknownFrameType { index: usize, frame_type: u8 },
    /// Edit discriminator is not a known edit kind
    UnknownEditType { index: usize, edit_type: u8 },
    /// A kind-specific field is absent from the record
    MissingField { index: usize, field: &'static str },
    /// Frame index past the end of the frame buffer
    FrameOutOfRange { index: usize, len: usize },
    /// Edit index past the end of the edit view
    EditOutOfRange { index: usize, len: usize },
    /// Edit segment does not fit inside the edit array
    SegmentOutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFrameType { index, frame_type } => {
                write!(f, "unknown frame type {} at frame {}", frame_type, index)
            }
            FormatError::UnknownEditType { index, edit_type } => {
                write!(f, "unknown edit type {} at edit {}", edit_type, index)
            }
            FormatError::MissingField { index, field } => {
                write!(f, "record {} is missing field '{}'", index, field)
            }
            FormatError::FrameOutOfRange { index, len } => {
                write!(f, "frame index {} out of range (len {})", index, len)
            }
            FormatError::EditOutOfRange { index, len } => {
                write!(f, "edit index {} out of range (len {})", index, len)
            }
            FormatError::SegmentOutOfRange { offset, count, len } => write!(
                f,
                "edit segment {}..{} exceeds edit array of length {}",
                offset,
                offset + count,
                len
            ),
        }
    }
}

impl core::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_format_error_display() {
        let err = FormatError::UnknownEditType {
            index: 3,
            edit_type: 42,
        };
        assert_eq!(err.to_string(), "unknown edit type 42 at edit 3");

        let err = FormatError::SegmentOutOfRange {
            offset: 2,
            count: 5,
            len: 4,
        };
        assert_eq!(
            err.to_string(),
            "edit segment 2..7 exceeds edit array of length 4"
        );
    }
}
