//! Edit interpreter: replays an edit stream against the host tree
//!
//! A batch is walked with a cursor `(parent, depth, child_index)` that starts
//! at the component's mount node. Each edit's `sibling_index` is relative to
//! `child_index` under the current parent; `StepIn`/`StepOut` move the cursor.
//! Subtrees are materialized straight from the frame buffer, using each
//! frame's `descendants_end_index` to skip ranges already handled.
//!
//! Child components are materialized as an empty container node registered
//! under their component id. Their content arrives in their own diff.

use crate::{
    ComponentRegistry, ListenerTable, MalformedReason, RenderError, RendererConfig,
};
use host_tree::{EventClass, EventHandler, EventPayload, NodeId, TreeMutationSink};
use render_types::{ComponentId, Edit, EditView, FormatError, Frame, FrameKind, FrameView, RendererId};
use services_event_bridge::{EventBridge, EventDescriptor};

/// Transient per-batch cursor
struct Cursor {
    parent: NodeId,
    ancestors: Vec<NodeId>,
    child_index: usize,
    start_index: usize,
}

impl Cursor {
    fn new(mount: NodeId, start_index: usize) -> Self {
        Self {
            parent: mount,
            ancestors: Vec::new(),
            child_index: start_index,
            start_index,
        }
    }

    fn depth(&self) -> usize {
        self.ancestors.len()
    }

    fn position(&self, sibling_index: usize) -> Option<usize> {
        self.child_index.checked_add(sibling_index)
    }
}

/// Applies edit batches for one renderer
pub struct EditInterpreter {
    renderer_id: RendererId,
    config: RendererConfig,
    bridge: EventBridge,
    registry: ComponentRegistry,
    listeners: ListenerTable,
}

impl EditInterpreter {
    pub fn new(renderer_id: RendererId, config: RendererConfig, bridge: EventBridge) -> Self {
        Self {
            renderer_id,
            config,
            bridge,
            registry: ComponentRegistry::new(),
            listeners: ListenerTable::new(),
        }
    }

    pub fn renderer_id(&self) -> RendererId {
        self.renderer_id
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    /// Binds a top-level component to an externally supplied host node
    pub fn attach_root(
        &mut self,
        component_id: ComponentId,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.registry.attach(component_id, node)?;
        tracing::debug!(renderer = %self.renderer_id, component = %component_id, %node, "attached root");
        Ok(())
    }

    /// Releases a component's mount; the host subtree is left in place
    pub fn detach(&mut self, component_id: ComponentId) -> Option<NodeId> {
        let node = self.registry.detach(component_id);
        match node {
            Some(node) => {
                tracing::debug!(renderer = %self.renderer_id, component = %component_id, %node, "detached")
            }
            None => {
                tracing::debug!(renderer = %self.renderer_id, component = %component_id, "detach of unmounted component")
            }
        }
        node
    }

    /// Applies one component's edits, starting at child 0 of its mount node
    pub fn apply_batch<S: TreeMutationSink + ?Sized>(
        &mut self,
        sink: &mut S,
        component_id: ComponentId,
        frames: FrameView<'_>,
        edits: EditView<'_>,
    ) -> Result<(), RenderError> {
        self.apply_edits_at(sink, component_id, 0, frames, edits)
    }

    /// Applies one component's edits with the root cursor at `start_index`
    pub fn apply_edits_at<S: TreeMutationSink + ?Sized>(
        &mut self,
        sink: &mut S,
        component_id: ComponentId,
        start_index: usize,
        frames: FrameView<'_>,
        edits: EditView<'_>,
    ) -> Result<(), RenderError> {
        let mount = self.registry.resolve(component_id)?;
        let span = tracing::debug_span!(
            "apply_batch",
            renderer = %self.renderer_id,
            component = %component_id,
            edits = edits.len()
        );
        let _enter = span.enter();

        let mut applier = BatchApplier {
            interpreter: self,
            sink,
            frames,
            component_id,
            cursor: Cursor::new(mount, start_index),
            edit_index: 0,
        };
        applier.run(edits)
    }
}

struct BatchApplier<'a, 'f, S: TreeMutationSink + ?Sized> {
    interpreter: &'a mut EditInterpreter,
    sink: &'a mut S,
    frames: FrameView<'f>,
    component_id: ComponentId,
    cursor: Cursor,
    edit_index: usize,
}

impl<'a, 'f, S: TreeMutationSink + ?Sized> BatchApplier<'a, 'f, S> {
    fn malformed(&self, reason: MalformedReason) -> RenderError {
        RenderError::MalformedEditBatch {
            edit_index: self.edit_index,
            reason,
        }
    }

    fn format(&self, err: FormatError) -> RenderError {
        self.malformed(MalformedReason::Format(err))
    }

    fn frame(&self, frame_index: usize) -> Result<Frame<'f>, RenderError> {
        self.frames.frame(frame_index).map_err(|err| self.format(err))
    }

    fn frame_kind(&self, frame_index: usize) -> Result<FrameKind, RenderError> {
        self.frames.kind(frame_index).map_err(|err| self.format(err))
    }

    fn unexpected(&self, frame_index: usize, expected: FrameKind, found: FrameKind) -> RenderError {
        self.malformed(MalformedReason::UnexpectedFrameKind {
            frame_index,
            expected,
            found,
        })
    }

    fn run(&mut self, edits: EditView<'_>) -> Result<(), RenderError> {
        for (index, edit) in edits.iter().enumerate() {
            self.edit_index = index;
            let edit = edit.map_err(|err| self.format(err))?;
            tracing::trace!(edit = index, kind = %edit.kind(), depth = self.cursor.depth(), "apply edit");
            self.apply(edit)?;
        }

        if self.cursor.depth() != 0 {
            return Err(RenderError::UnbalancedScope {
                edit_index: edits.len(),
                depth: self.cursor.depth(),
            });
        }
        Ok(())
    }

    fn position(&self, sibling_index: usize) -> Result<usize, RenderError> {
        self.cursor.position(sibling_index).ok_or_else(|| {
            self.malformed(MalformedReason::IndexOverflow {
                base: self.cursor.child_index,
                offset: sibling_index,
            })
        })
    }

    fn target(&self, sibling_index: usize) -> Result<NodeId, RenderError> {
        let position = self.position(sibling_index)?;
        Ok(self.sink.child_at(self.cursor.parent, position)?)
    }

    fn apply(&mut self, edit: Edit<'_>) -> Result<(), RenderError> {
        match edit {
            Edit::PrependFrame {
                sibling_index,
                frame_index,
            } => {
                let position = self.position(sibling_index)?;
                self.materialize(self.cursor.parent, position, frame_index, 0)?;
            }
            Edit::RemoveFrame { sibling_index } => {
                let position = self.position(sibling_index)?;
                let removed = self.sink.remove(self.cursor.parent, position)?;
                let mut gone = self.sink.descendants(removed)?;
                gone.push(removed);
                let pruned = self.interpreter.listeners.forget_nodes(&gone);
                if pruned > 0 {
                    tracing::trace!(node = %removed, pruned, "pruned listeners of removed subtree");
                }
            }
            Edit::SetAttribute {
                sibling_index,
                frame_index,
            } => {
                let element = self.target(sibling_index)?;
                self.apply_attribute(element, frame_index)?;
            }
            Edit::RemoveAttribute {
                sibling_index,
                attribute_name,
            } => {
                let element = self.target(sibling_index)?;
                match self.interpreter.config.event_class_for(attribute_name) {
                    Some(class) => self.unbind(element, class)?,
                    None => self.sink.remove_attribute(element, attribute_name)?,
                }
            }
            Edit::UpdateText {
                sibling_index,
                frame_index,
            } => {
                let content = match self.frame(frame_index)? {
                    Frame::Text { content } => content,
                    other => {
                        return Err(self.unexpected(frame_index, FrameKind::Text, other.kind()))
                    }
                };
                let node = self.target(sibling_index)?;
                self.sink.set_text(node, content)?;
            }
            Edit::StepIn { sibling_index } => {
                if self.cursor.depth() >= self.interpreter.config.max_depth {
                    return Err(self.malformed(MalformedReason::DepthLimitExceeded {
                        limit: self.interpreter.config.max_depth,
                    }));
                }
                let child = self.target(sibling_index)?;
                self.cursor.ancestors.push(self.cursor.parent);
                self.cursor.parent = child;
                self.cursor.child_index = 0;
            }
            Edit::StepOut => {
                let Some(parent) = self.cursor.ancestors.pop() else {
                    return Err(RenderError::UnbalancedScope {
                        edit_index: self.edit_index,
                        depth: 0,
                    });
                };
                self.cursor.parent = parent;
                // Only the root scope has a nonzero starting index.
                self.cursor.child_index = if self.cursor.depth() == 0 {
                    self.cursor.start_index
                } else {
                    0
                };
            }
        }
        Ok(())
    }

    /// Inserts the subtree rooted at `frame_index`; returns host nodes inserted
    fn materialize(
        &mut self,
        parent: NodeId,
        position: usize,
        frame_index: usize,
        depth: usize,
    ) -> Result<usize, RenderError> {
        if depth >= self.interpreter.config.max_depth {
            return Err(self.malformed(MalformedReason::DepthLimitExceeded {
                limit: self.interpreter.config.max_depth,
            }));
        }

        match self.frame(frame_index)? {
            Frame::Element {
                name,
                descendants_end_index,
            } => {
                let element = self.sink.create_element(name);
                self.sink.insert(parent, position, element)?;

                let mut descendant = frame_index + 1;
                while descendant <= descendants_end_index {
                    if self.frame_kind(descendant)? == FrameKind::Attribute {
                        self.apply_attribute(element, descendant)?;
                        descendant += 1;
                    } else {
                        self.materialize_range(
                            element,
                            0,
                            descendant,
                            descendants_end_index,
                            depth + 1,
                        )?;
                        break;
                    }
                }
                Ok(1)
            }
            Frame::Text { content } => {
                let text = self.sink.create_text(content);
                self.sink.insert(parent, position, text)?;
                Ok(1)
            }
            Frame::Component { component_id, .. } => {
                let container = self
                    .sink
                    .create_element(&self.interpreter.config.component_container_tag);
                self.sink.insert(parent, position, container)?;
                self.interpreter.registry.attach(component_id, container)?;
                tracing::debug!(
                    parent_component = %self.component_id,
                    component = %component_id,
                    node = %container,
                    "mounted child component"
                );
                Ok(1)
            }
            Frame::Attribute { .. } => Err(RenderError::AttributeOutOfPosition { frame_index }),
        }
    }

    /// Materializes sibling frames `start..=end` as consecutive children
    fn materialize_range(
        &mut self,
        parent: NodeId,
        mut position: usize,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<(), RenderError> {
        let mut index = start;
        while index <= end {
            position += self.materialize(parent, position, index, depth)?;
            let descendants_end = self.frame(index)?.descendants_end_index().unwrap_or(index);
            index = descendants_end.max(index).checked_add(1).ok_or_else(|| {
                self.format(FormatError::FrameOutOfRange {
                    index: descendants_end,
                    len: self.frames.len(),
                })
            })?;
        }
        Ok(())
    }

    fn apply_attribute(&mut self, element: NodeId, frame_index: usize) -> Result<(), RenderError> {
        let (name, value) = match self.frame(frame_index)? {
            Frame::Attribute { name, value } => (name, value),
            other => {
                return Err(self.unexpected(frame_index, FrameKind::Attribute, other.kind()))
            }
        };

        match self.interpreter.config.event_class_for(name) {
            Some(class) => {
                self.unbind(element, class)?;
                let handler = self.event_handler(frame_index, class);
                let handle = self.sink.bind_event(element, class, handler)?;
                self.interpreter.listeners.insert(element, class, handle);
            }
            None => self.sink.set_attribute(element, name, value)?,
        }
        Ok(())
    }

    fn unbind(&mut self, element: NodeId, class: EventClass) -> Result<(), RenderError> {
        if let Some(previous) = self.interpreter.listeners.take(element, class) {
            self.sink.unbind_event(element, class, previous)?;
        }
        Ok(())
    }

    fn event_handler(&self, frame_index: usize, class: EventClass) -> EventHandler {
        let bridge = self.interpreter.bridge.clone();
        let descriptor = EventDescriptor {
            renderer_id: self.interpreter.renderer_id,
            component_id: self.component_id,
            frame_index,
            event_class: class,
        };
        Box::new(move |payload: &EventPayload| {
            if let Err(err) = bridge.dispatch(descriptor, payload.clone()) {
                tracing::warn!(
                    component = %descriptor.component_id,
                    frame = descriptor.frame_index,
                    class = %descriptor.event_class,
                    %err,
                    "failed to deliver event to producer"
                );
            }
        })
    }
}
