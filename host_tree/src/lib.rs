//! # Host Tree
//!
//! The mutable tree a renderer drives, seen only through [`TreeMutationSink`].
//!
//! ## Philosophy
//!
//! - **Interface, not technology**: The renderer never knows what the host is
//! - **Immediate**: Every mutation is synchronous and observable at once
//! - **Handles, not properties**: Event listeners are identified by opaque
//!   handles, never by data stashed on host nodes
//!
//! [`InMemoryTree`] is a complete headless host used by tests and embedders.

pub mod memory;

pub use memory::{InMemoryTree, MutationRecord};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque reference to a host node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// Opaque reference to a bound event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Interaction classes a renderer can bind listeners for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventClass {
    Click,
    KeyPress,
    Change,
}

impl EventClass {
    /// Name of the host-side event this class listens to
    pub fn host_event_name(&self) -> &'static str {
        match self {
            EventClass::Click => "click",
            EventClass::KeyPress => "keypress",
            EventClass::Change => "change",
        }
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_event_name())
    }
}

/// Host-originated event data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventPayload {
    Mouse,
    Keyboard { key: String },
    Change { value: String },
}

/// Callback the host invokes when a bound interaction occurs
pub type EventHandler = Box<dyn Fn(&EventPayload)>;

/// Host tree errors
///
/// All of these indicate a renderer or producer bug; a well-formed batch
/// never triggers them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostTreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Child index {index} out of range under {parent} ({len} children)")]
    ChildOutOfRange {
        parent: NodeId,
        index: usize,
        len: usize,
    },

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Node is not a text node: {0}")]
    NotAText(NodeId),

    #[error("Node already has a parent: {0}")]
    AlreadyAttached(NodeId),
}

/// Primitive mutations against the host tree
pub trait TreeMutationSink {
    fn create_element(&mut self, name: &str) -> NodeId;

    fn create_text(&mut self, content: &str) -> NodeId;

    /// Inserts a detached node as the `index`-th child of `parent`
    fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), HostTreeError>;

    /// Detaches the `index`-th child of `parent` and returns it
    fn remove(&mut self, parent: NodeId, index: usize) -> Result<NodeId, HostTreeError>;

    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, HostTreeError>;

    /// Every node below `node`, excluding `node` itself
    fn descendants(&self, node: NodeId) -> Result<Vec<NodeId>, HostTreeError>;

    fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), HostTreeError>;

    fn remove_attribute(&mut self, element: NodeId, name: &str) -> Result<(), HostTreeError>;

    fn set_text(&mut self, text_node: NodeId, content: &str) -> Result<(), HostTreeError>;

    fn bind_event(
        &mut self,
        element: NodeId,
        class: EventClass,
        handler: EventHandler,
    ) -> Result<ListenerHandle, HostTreeError>;

    /// Unbinding a handle that is no longer bound is a no-op
    fn unbind_event(
        &mut self,
        element: NodeId,
        class: EventClass,
        handle: ListenerHandle,
    ) -> Result<(), HostTreeError>;
}
