//! Render host error types

use host_tree::{HostTreeError, NodeId};
use render_types::{ComponentId, FormatError, FrameKind, RendererId};
use services_event_bridge::BridgeError;
use thiserror::Error;

/// Why a batch was rejected as malformed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("{0}")]
    Format(FormatError),

    #[error("frame {frame_index} is {found}, expected {expected}")]
    UnexpectedFrameKind {
        frame_index: usize,
        expected: FrameKind,
        found: FrameKind,
    },

    #[error("tree depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("child position {base} + {offset} overflows")]
    IndexOverflow { base: usize, offset: usize },
}

/// Render host error types
///
/// Every variant aborts the batch in progress; nothing is rolled back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Component not mounted: {0}")]
    ComponentNotMounted(ComponentId),

    #[error("Component already mounted: {0}")]
    ComponentAlreadyMounted(ComponentId),

    #[error("Mount node {node} already belongs to {owner}")]
    MountNodeInUse { node: NodeId, owner: ComponentId },

    #[error("Malformed edit batch at edit {edit_index}: {reason}")]
    MalformedEditBatch {
        edit_index: usize,
        reason: MalformedReason,
    },

    #[error("Attribute frame {frame_index} is not a leading child of an element")]
    AttributeOutOfPosition { frame_index: usize },

    #[error("Unbalanced scope at edit {edit_index} (depth {depth})")]
    UnbalancedScope { edit_index: usize, depth: usize },

    #[error("Renderer not found: {0}")]
    RendererNotFound(RendererId),

    #[error("Renderer already exists: {0}")]
    RendererAlreadyExists(RendererId),

    #[error("Host tree error: {0}")]
    Host(#[from] HostTreeError),

    #[error("Event bridge error: {0}")]
    Bridge(#[from] BridgeError),
}
