//! Component registry: which host node stands for which component

use crate::RenderError;
use host_tree::NodeId;
use render_types::ComponentId;
use std::collections::HashMap;

/// Maps component ids to their mount nodes
///
/// Mount nodes are unique: no two live components share one.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    mounts: HashMap<ComponentId, NodeId>,
    owners: HashMap<NodeId, ComponentId>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, component_id: ComponentId, node: NodeId) -> Result<(), RenderError> {
        if self.mounts.contains_key(&component_id) {
            return Err(RenderError::ComponentAlreadyMounted(component_id));
        }
        if let Some(owner) = self.owner_of(node) {
            return Err(RenderError::MountNodeInUse { node, owner });
        }
        self.mounts.insert(component_id, node);
        self.owners.insert(node, component_id);
        Ok(())
    }

    pub fn resolve(&self, component_id: ComponentId) -> Result<NodeId, RenderError> {
        self.mounts
            .get(&component_id)
            .copied()
            .ok_or(RenderError::ComponentNotMounted(component_id))
    }

    /// Removes the mapping, returning the node it pointed at
    pub fn detach(&mut self, component_id: ComponentId) -> Option<NodeId> {
        let node = self.mounts.remove(&component_id)?;
        self.owners.remove(&node);
        Some(node)
    }

    pub fn owner_of(&self, node: NodeId) -> Option<ComponentId> {
        self.owners.get(&node).copied()
    }

    pub fn contains(&self, component_id: ComponentId) -> bool {
        self.mounts.contains_key(&component_id)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_resolve_detach() {
        let mut registry = ComponentRegistry::new();
        let id = ComponentId::new(1);
        let node = NodeId::from_raw(10);

        registry.attach(id, node).unwrap();
        assert_eq!(registry.resolve(id), Ok(node));
        assert_eq!(registry.owner_of(node), Some(id));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.detach(id), Some(node));
        assert_eq!(
            registry.resolve(id),
            Err(RenderError::ComponentNotMounted(id))
        );
        assert_eq!(registry.owner_of(node), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_detach_unknown_is_none() {
        let mut registry = ComponentRegistry::new();
        assert_eq!(registry.detach(ComponentId::new(4)), None);
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut registry = ComponentRegistry::new();
        let id = ComponentId::new(1);
        registry.attach(id, NodeId::from_raw(1)).unwrap();

        assert_eq!(
            registry.attach(id, NodeId::from_raw(2)),
            Err(RenderError::ComponentAlreadyMounted(id))
        );
    }

    #[test]
    fn test_shared_mount_node_rejected() {
        let mut registry = ComponentRegistry::new();
        let node = NodeId::from_raw(7);
        registry.attach(ComponentId::new(1), node).unwrap();

        assert_eq!(
            registry.attach(ComponentId::new(2), node),
            Err(RenderError::MountNodeInUse {
                node,
                owner: ComponentId::new(1)
            })
        );
    }

    #[test]
    fn test_node_reusable_after_detach() {
        let mut registry = ComponentRegistry::new();
        let node = NodeId::from_raw(7);
        registry.attach(ComponentId::new(1), node).unwrap();
        registry.detach(ComponentId::new(1));

        assert!(registry.attach(ComponentId::new(2), node).is_ok());
        assert!(registry.contains(ComponentId::new(2)));
    }
}
