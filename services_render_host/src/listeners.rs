//! Side table of bound event listeners, keyed by host node and class

use host_tree::{EventClass, ListenerHandle, NodeId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ListenerTable {
    bound: HashMap<(NodeId, EventClass), ListenerHandle>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `handle`, returning the handle it replaces
    pub fn insert(
        &mut self,
        node: NodeId,
        class: EventClass,
        handle: ListenerHandle,
    ) -> Option<ListenerHandle> {
        self.bound.insert((node, class), handle)
    }

    pub fn take(&mut self, node: NodeId, class: EventClass) -> Option<ListenerHandle> {
        self.bound.remove(&(node, class))
    }

    /// Drops every entry for the given nodes; returns how many went
    pub fn forget_nodes(&mut self, nodes: &[NodeId]) -> usize {
        let nodes: HashSet<NodeId> = nodes.iter().copied().collect();
        let before = self.bound.len();
        self.bound.retain(|(node, _), _| !nodes.contains(node));
        before - self.bound.len()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut table = ListenerTable::new();
        let node = NodeId::from_raw(1);

        assert_eq!(
            table.insert(node, EventClass::Click, ListenerHandle::from_raw(1)),
            None
        );
        assert_eq!(
            table.insert(node, EventClass::Click, ListenerHandle::from_raw(2)),
            Some(ListenerHandle::from_raw(1))
        );
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.take(node, EventClass::Click),
            Some(ListenerHandle::from_raw(2))
        );
    }

    #[test]
    fn test_classes_are_independent() {
        let mut table = ListenerTable::new();
        let node = NodeId::from_raw(1);
        table.insert(node, EventClass::Click, ListenerHandle::from_raw(1));
        table.insert(node, EventClass::KeyPress, ListenerHandle::from_raw(2));

        assert_eq!(
            table.take(node, EventClass::Click),
            Some(ListenerHandle::from_raw(1))
        );
        assert_eq!(table.take(node, EventClass::Click), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_forget_nodes() {
        let mut table = ListenerTable::new();
        table.insert(NodeId::from_raw(1), EventClass::Click, ListenerHandle::from_raw(1));
        table.insert(NodeId::from_raw(1), EventClass::Change, ListenerHandle::from_raw(2));
        table.insert(NodeId::from_raw(2), EventClass::Click, ListenerHandle::from_raw(3));

        assert_eq!(table.forget_nodes(&[NodeId::from_raw(1)]), 2);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
