//! # Render Contract Tests
//!
//! "Golden" tests for the renderer's wire contracts, so they don't drift
//! accidentally over time.
//!
//! ## Structure
//!
//! - `wire`: frame and edit discriminators and JSON field names
//! - `events`: event envelope action, schema version and payload shapes
//! - `scenarios`: end-to-end batches with their expected host trees

pub mod events;
pub mod scenarios;
pub mod wire;

/// Common test helpers for contract validation
pub mod test_helpers {
    use host_tree::{InMemoryTree, NodeId, TreeMutationSink};
    use render_types::{ComponentId, RenderBatch, RendererId};
    use services_event_bridge::{EventBridge, EventEnvelope, InMemoryChannel, SchemaVersion};
    use services_render_host::{RenderError, RenderHost, RendererConfig};
    use std::sync::Arc;

    pub const RENDERER: RendererId = RendererId::new(0);
    pub const ROOT_COMPONENT: ComponentId = ComponentId::new(0);

    /// A render host over an in-memory tree with one mounted root component
    pub struct Harness {
        pub host: RenderHost<InMemoryTree>,
        pub channel: Arc<InMemoryChannel>,
        pub mount: NodeId,
    }

    impl Harness {
        pub fn new() -> Self {
            let channel = Arc::new(InMemoryChannel::new());
            let mut host = RenderHost::new(
                InMemoryTree::new(),
                RendererConfig::default(),
                EventBridge::new(channel.clone()),
            );
            let mount = host.tree_mut().create_element("app");
            let root = host.tree().root();
            host.tree_mut()
                .insert(root, 0, mount)
                .expect("Failed to insert mount node");
            host.add_renderer(RENDERER).expect("Failed to add renderer");
            host.attach_root(RENDERER, ROOT_COMPONENT, mount)
                .expect("Failed to attach root component");
            Self {
                host,
                channel,
                mount,
            }
        }

        /// Applies a batch given as JSON wire text
        pub fn render_json(&mut self, json: &str) -> Result<(), RenderError> {
            let batch: RenderBatch = serde_json::from_str(json).expect("Invalid batch JSON");
            self.host.render_batch(RENDERER, &batch)
        }

        pub fn markup(&self) -> String {
            self.host.tree().inner_markup(self.mount)
        }
    }

    impl Default for Harness {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Verifies an envelope has the expected action and version
    pub fn verify_envelope_contract(
        envelope: &EventEnvelope,
        expected_action: &str,
        expected_version: SchemaVersion,
    ) {
        assert_eq!(
            envelope.action, expected_action,
            "Action identifier changed: expected '{}', got '{}'",
            expected_action, envelope.action
        );
        assert_eq!(
            envelope.schema_version, expected_version,
            "Schema version changed: expected {}, got {}",
            expected_version, envelope.schema_version
        );
    }
}
