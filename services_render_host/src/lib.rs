//! # Render Host Service
//!
//! Applies producer render batches to a host tree.
//!
//! ## Philosophy
//!
//! - **Executor, not differ**: The producer decides what changed; the host
//!   replays it exactly, in order
//! - **Synchronous**: A batch runs to completion or to its first error
//! - **One node per component**: Every component owns exactly one container
//!   node, so lookups by component id are O(1)
//! - **Abort, don't repair**: Malformed batches are rejected, never patched up
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A diffing algorithm
//! - A component state store
//! - A batch scheduler

pub mod config;
pub mod error;
pub mod interpreter;
pub mod listeners;
pub mod registry;

pub use config::{ConfigError, RendererConfig};
pub use error::{MalformedReason, RenderError};
pub use interpreter::EditInterpreter;
pub use listeners::ListenerTable;
pub use registry::ComponentRegistry;

use host_tree::{NodeId, TreeMutationSink};
use render_types::{ComponentId, EditView, FrameView, RawEdit, RawFrame, RenderBatch, RendererId};
use services_event_bridge::EventBridge;
use std::collections::HashMap;

/// Render host service
///
/// Owns the host tree and every renderer that drives it.
pub struct RenderHost<S: TreeMutationSink> {
    tree: S,
    config: RendererConfig,
    bridge: EventBridge,
    renderers: HashMap<RendererId, EditInterpreter>,
}

impl<S: TreeMutationSink> RenderHost<S> {
    pub fn new(tree: S, config: RendererConfig, bridge: EventBridge) -> Self {
        Self {
            tree,
            config,
            bridge,
            renderers: HashMap::new(),
        }
    }

    /// Creates a host that reports events through the process-wide bridge
    pub fn with_installed_bridge(tree: S, config: RendererConfig) -> Result<Self, RenderError> {
        let bridge = services_event_bridge::installed()?;
        Ok(Self::new(tree, config, bridge))
    }

    pub fn tree(&self) -> &S {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut S {
        &mut self.tree
    }

    pub fn add_renderer(&mut self, renderer_id: RendererId) -> Result<(), RenderError> {
        if self.renderers.contains_key(&renderer_id) {
            return Err(RenderError::RendererAlreadyExists(renderer_id));
        }
        let interpreter =
            EditInterpreter::new(renderer_id, self.config.clone(), self.bridge.clone());
        self.renderers.insert(renderer_id, interpreter);
        tracing::debug!(renderer = %renderer_id, "renderer added");
        Ok(())
    }

    /// Drops a renderer and its registry; host nodes stay in place
    pub fn remove_renderer(&mut self, renderer_id: RendererId) -> Result<(), RenderError> {
        self.renderers
            .remove(&renderer_id)
            .map(|_| ())
            .ok_or(RenderError::RendererNotFound(renderer_id))
    }

    pub fn renderer(&self, renderer_id: RendererId) -> Result<&EditInterpreter, RenderError> {
        self.renderers
            .get(&renderer_id)
            .ok_or(RenderError::RendererNotFound(renderer_id))
    }

    fn renderer_mut(
        &mut self,
        renderer_id: RendererId,
    ) -> Result<&mut EditInterpreter, RenderError> {
        self.renderers
            .get_mut(&renderer_id)
            .ok_or(RenderError::RendererNotFound(renderer_id))
    }

    pub fn list_renderers(&self) -> Vec<RendererId> {
        self.renderers.keys().copied().collect()
    }

    /// Binds a top-level component to an externally supplied host node
    pub fn attach_root(
        &mut self,
        renderer_id: RendererId,
        component_id: ComponentId,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.renderer_mut(renderer_id)?
            .attach_root(component_id, node)
    }

    /// Releases a component's mount
    pub fn detach(
        &mut self,
        renderer_id: RendererId,
        component_id: ComponentId,
    ) -> Result<Option<NodeId>, RenderError> {
        Ok(self.renderer_mut(renderer_id)?.detach(component_id))
    }

    /// Applies one component's edits against the given frames
    pub fn apply_batch(
        &mut self,
        renderer_id: RendererId,
        component_id: ComponentId,
        frames: &[RawFrame],
        edits: &[RawEdit],
    ) -> Result<(), RenderError> {
        let interpreter = self
            .renderers
            .get_mut(&renderer_id)
            .ok_or(RenderError::RendererNotFound(renderer_id))?;
        interpreter.apply_batch(
            &mut self.tree,
            component_id,
            FrameView::new(frames),
            EditView::new(edits),
        )
    }

    /// Applies every diff in `batch`, then detaches disposed components
    pub fn render_batch(
        &mut self,
        renderer_id: RendererId,
        batch: &RenderBatch,
    ) -> Result<(), RenderError> {
        let interpreter = self
            .renderers
            .get_mut(&renderer_id)
            .ok_or(RenderError::RendererNotFound(renderer_id))?;

        for diff in &batch.updated_components {
            let edits = batch
                .edits_for(diff)
                .map_err(|err| RenderError::MalformedEditBatch {
                    edit_index: diff.edits_offset,
                    reason: MalformedReason::Format(err),
                })?;
            interpreter.apply_batch(&mut self.tree, diff.component_id, batch.frames(), edits)?;
        }

        for component_id in &batch.disposed_component_ids {
            interpreter.detach(*component_id);
        }
        Ok(())
    }
}
