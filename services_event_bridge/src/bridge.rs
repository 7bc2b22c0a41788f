//! Event bridge and the process-wide producer target

use crate::{BridgeError, DispatchId, EventDescriptor, EventEnvelope, ProducerChannel};
use host_tree::EventPayload;
use std::sync::{Arc, OnceLock};

static PRODUCER_TARGET: OnceLock<EventBridge> = OnceLock::new();

/// Installs the process-wide producer target
///
/// Succeeds once; later calls fail with [`BridgeError::AlreadyInstalled`].
pub fn install(channel: Arc<dyn ProducerChannel>) -> Result<(), BridgeError> {
    PRODUCER_TARGET
        .set(EventBridge::new(channel))
        .map_err(|_| BridgeError::AlreadyInstalled)?;
    tracing::debug!("producer target installed");
    Ok(())
}

/// Returns the process-wide bridge set by [`install`]
pub fn installed() -> Result<EventBridge, BridgeError> {
    PRODUCER_TARGET
        .get()
        .cloned()
        .ok_or(BridgeError::NotInstalled)
}

/// Packages interactions and forwards them to the producer
#[derive(Clone)]
pub struct EventBridge {
    channel: Arc<dyn ProducerChannel>,
}

impl EventBridge {
    pub fn new(channel: Arc<dyn ProducerChannel>) -> Self {
        Self { channel }
    }

    /// Sends one event envelope; the producer reacts asynchronously
    pub fn dispatch(
        &self,
        descriptor: EventDescriptor,
        payload: EventPayload,
    ) -> Result<DispatchId, BridgeError> {
        let envelope = EventEnvelope::new(descriptor, payload);
        let id = envelope.id;
        tracing::trace!(
            dispatch = %id,
            component = %descriptor.component_id,
            frame = descriptor.frame_index,
            class = %descriptor.event_class,
            "dispatching event"
        );
        self.channel.send(envelope)?;
        Ok(id)
    }
}
