//! Arena-backed host tree for tests and headless embedding

use crate::{
    EventClass, EventHandler, EventPayload, HostTreeError, ListenerHandle, NodeId,
    TreeMutationSink,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

const ROOT_ELEMENT: &str = "root";

/// One recorded sink call, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    CreateElement { node: NodeId, name: String },
    CreateText { node: NodeId },
    Insert { parent: NodeId, index: usize, node: NodeId },
    Remove { parent: NodeId, index: usize },
    SetAttribute { element: NodeId, name: String },
    RemoveAttribute { element: NodeId, name: String },
    SetText { node: NodeId },
    BindEvent { element: NodeId, class: EventClass },
    UnbindEvent { element: NodeId, class: EventClass },
}

impl MutationRecord {
    /// The node this call changed, if it changed an existing node
    pub fn target(&self) -> Option<NodeId> {
        match self {
            MutationRecord::CreateElement { .. } | MutationRecord::CreateText { .. } => None,
            MutationRecord::Insert { parent, .. } | MutationRecord::Remove { parent, .. } => {
                Some(*parent)
            }
            MutationRecord::SetAttribute { element, .. }
            | MutationRecord::RemoveAttribute { element, .. }
            | MutationRecord::BindEvent { element, .. }
            | MutationRecord::UnbindEvent { element, .. } => Some(*element),
            MutationRecord::SetText { node } => Some(*node),
        }
    }
}

struct Listener {
    class: EventClass,
    handler: EventHandler,
}

enum NodeData {
    Element {
        name: String,
        attributes: BTreeMap<String, String>,
        listeners: BTreeMap<ListenerHandle, Listener>,
    },
    Text {
        content: String,
    },
}

struct NodeRecord {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// In-memory host tree
///
/// Removed nodes stay in the arena, detached, so callers can still inspect
/// them. Nothing is ever freed, so the arena only grows; this tree is meant
/// for tests and short-lived sessions, not long-running hosts.
pub struct InMemoryTree {
    nodes: HashMap<NodeId, NodeRecord>,
    root: NodeId,
    next_node: u64,
    next_listener: u64,
    log: Vec<MutationRecord>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            root: NodeId::from_raw(0),
            next_node: 0,
            next_listener: 1,
            log: Vec::new(),
        };
        tree.root = tree.alloc(NodeData::Element {
            name: ROOT_ELEMENT.to_string(),
            attributes: BTreeMap::new(),
            listeners: BTreeMap::new(),
        });
        tree
    }

    /// The node every tree starts with
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_raw(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            NodeRecord {
                parent: None,
                children: Vec::new(),
                data,
            },
        );
        id
    }

    fn record(&self, node: NodeId) -> Result<&NodeRecord, HostTreeError> {
        self.nodes.get(&node).ok_or(HostTreeError::NodeNotFound(node))
    }

    fn record_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, HostTreeError> {
        self.nodes
            .get_mut(&node)
            .ok_or(HostTreeError::NodeNotFound(node))
    }

    fn element_mut(
        &mut self,
        node: NodeId,
    ) -> Result<
        (
            &mut BTreeMap<String, String>,
            &mut BTreeMap<ListenerHandle, Listener>,
        ),
        HostTreeError,
    > {
        match &mut self.record_mut(node)?.data {
            NodeData::Element {
                attributes,
                listeners,
                ..
            } => Ok((attributes, listeners)),
            NodeData::Text { .. } => Err(HostTreeError::NotAnElement(node)),
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|record| record.parent)
    }

    pub fn element_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(&node)?.data {
            NodeData::Element { name, .. } => Some(name),
            NodeData::Text { .. } => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(&node)?.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text { .. } => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(&node)?.data {
            NodeData::Text { content } => Some(content),
            NodeData::Element { .. } => None,
        }
    }

    /// Number of listeners currently bound for `class` on `node`
    pub fn listener_count(&self, node: NodeId, class: EventClass) -> usize {
        match self.nodes.get(&node).map(|record| &record.data) {
            Some(NodeData::Element { listeners, .. }) => listeners
                .values()
                .filter(|listener| listener.class == class)
                .count(),
            _ => 0,
        }
    }

    /// Simulates a host interaction; returns how many handlers ran
    pub fn fire(&self, node: NodeId, class: EventClass, payload: &EventPayload) -> usize {
        let Some(NodeData::Element { listeners, .. }) = self.nodes.get(&node).map(|r| &r.data)
        else {
            tracing::debug!(%node, %class, "event fired at a node that cannot listen");
            return 0;
        };

        let mut invoked = 0;
        for listener in listeners.values().filter(|listener| listener.class == class) {
            (listener.handler)(payload);
            invoked += 1;
        }
        invoked
    }

    /// Every sink call made so far, in order
    pub fn mutations(&self) -> &[MutationRecord] {
        &self.log
    }

    pub fn clear_mutations(&mut self) {
        self.log.clear();
    }

    /// Serializes `node` and its subtree as markup
    pub fn to_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serializes only the children of `node`
    pub fn inner_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let Some(record) = self.nodes.get(&node) else {
            return;
        };
        match &record.data {
            NodeData::Text { content } => out.push_str(&escape(content, false)),
            NodeData::Element {
                name, attributes, ..
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", key, escape(value, true));
                }
                out.push('>');
                for child in &record.children {
                    self.write_node(*child, out);
                }
                let _ = write!(out, "</{}>", name);
            }
        }
    }
}

impl Default for InMemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(raw: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

impl TreeMutationSink for InMemoryTree {
    fn create_element(&mut self, name: &str) -> NodeId {
        let node = self.alloc(NodeData::Element {
            name: name.to_string(),
            attributes: BTreeMap::new(),
            listeners: BTreeMap::new(),
        });
        self.log.push(MutationRecord::CreateElement {
            node,
            name: name.to_string(),
        });
        node
    }

    fn create_text(&mut self, content: &str) -> NodeId {
        let node = self.alloc(NodeData::Text {
            content: content.to_string(),
        });
        self.log.push(MutationRecord::CreateText { node });
        node
    }

    fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), HostTreeError> {
        if self.record(node)?.parent.is_some() {
            return Err(HostTreeError::AlreadyAttached(node));
        }
        let parent_record = self.record_mut(parent)?;
        if let NodeData::Text { .. } = parent_record.data {
            return Err(HostTreeError::NotAnElement(parent));
        }
        let len = parent_record.children.len();
        if index > len {
            return Err(HostTreeError::ChildOutOfRange { parent, index, len });
        }
        parent_record.children.insert(index, node);
        self.record_mut(node)?.parent = Some(parent);
        self.log
            .push(MutationRecord::Insert { parent, index, node });
        Ok(())
    }

    fn remove(&mut self, parent: NodeId, index: usize) -> Result<NodeId, HostTreeError> {
        let parent_record = self.record_mut(parent)?;
        let len = parent_record.children.len();
        if index >= len {
            return Err(HostTreeError::ChildOutOfRange { parent, index, len });
        }
        let node = parent_record.children.remove(index);
        self.record_mut(node)?.parent = None;
        self.log.push(MutationRecord::Remove { parent, index });
        Ok(node)
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, HostTreeError> {
        let children = &self.record(parent)?.children;
        children
            .get(index)
            .copied()
            .ok_or(HostTreeError::ChildOutOfRange {
                parent,
                index,
                len: children.len(),
            })
    }

    fn descendants(&self, node: NodeId) -> Result<Vec<NodeId>, HostTreeError> {
        let mut found = Vec::new();
        let mut pending = self.record(node)?.children.clone();
        while let Some(next) = pending.pop() {
            found.push(next);
            pending.extend(self.record(next)?.children.iter().copied());
        }
        Ok(found)
    }

    fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), HostTreeError> {
        let (attributes, _) = self.element_mut(element)?;
        attributes.insert(name.to_string(), value.to_string());
        self.log.push(MutationRecord::SetAttribute {
            element,
            name: name.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, element: NodeId, name: &str) -> Result<(), HostTreeError> {
        let (attributes, _) = self.element_mut(element)?;
        attributes.remove(name);
        self.log.push(MutationRecord::RemoveAttribute {
            element,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_text(&mut self, text_node: NodeId, content: &str) -> Result<(), HostTreeError> {
        match &mut self.record_mut(text_node)?.data {
            NodeData::Text { content: current } => {
                *current = content.to_string();
            }
            NodeData::Element { .. } => return Err(HostTreeError::NotAText(text_node)),
        }
        self.log.push(MutationRecord::SetText { node: text_node });
        Ok(())
    }

    fn bind_event(
        &mut self,
        element: NodeId,
        class: EventClass,
        handler: EventHandler,
    ) -> Result<ListenerHandle, HostTreeError> {
        let handle = ListenerHandle::from_raw(self.next_listener);
        let (_, listeners) = self.element_mut(element)?;
        listeners.insert(handle, Listener { class, handler });
        self.next_listener += 1;
        self.log.push(MutationRecord::BindEvent { element, class });
        Ok(handle)
    }

    fn unbind_event(
        &mut self,
        element: NodeId,
        class: EventClass,
        handle: ListenerHandle,
    ) -> Result<(), HostTreeError> {
        let (_, listeners) = self.element_mut(element)?;
        if listeners
            .get(&handle)
            .is_some_and(|listener| listener.class == class)
        {
            listeners.remove(&handle);
        }
        self.log.push(MutationRecord::UnbindEvent { element, class });
        Ok(())
    }
}
