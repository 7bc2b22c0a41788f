//! Render batches: one update cycle's worth of component diffs

use crate::{ComponentId, EditView, FormatError, FrameView, RawEdit, RawFrame};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// The edits for one component, as a segment of the batch's shared edit array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDiff {
    pub component_id: ComponentId,
    pub edits_offset: usize,
    pub edits_count: usize,
}

/// A producer update: reference frames, packed edits, and disposals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBatch {
    pub reference_frames: Vec<RawFrame>,
    pub edits: Vec<RawEdit>,
    #[serde(default)]
    pub updated_components: Vec<ComponentDiff>,
    #[serde(default)]
    pub disposed_component_ids: Vec<ComponentId>,
}

impl RenderBatch {
    pub fn new(reference_frames: Vec<RawFrame>) -> Self {
        Self {
            reference_frames,
            ..Self::default()
        }
    }

    /// Appends the edits of one component and records its diff
    pub fn with_diff(mut self, component_id: ComponentId, edits: Vec<RawEdit>) -> Self {
        let diff = ComponentDiff {
            component_id,
            edits_offset: self.edits.len(),
            edits_count: edits.len(),
        };
        self.edits.extend(edits);
        self.updated_components.push(diff);
        self
    }

    pub fn with_disposed(mut self, component_id: ComponentId) -> Self {
        self.disposed_component_ids.push(component_id);
        self
    }

    pub fn frames(&self) -> FrameView<'_> {
        FrameView::new(&self.reference_frames)
    }

    pub fn edits_for(&self, diff: &ComponentDiff) -> Result<EditView<'_>, FormatError> {
        EditView::segment(&self.edits, diff.edits_offset, diff.edits_count)
    }
}
