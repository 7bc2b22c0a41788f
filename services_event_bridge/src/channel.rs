//! Producer channels: where event envelopes go

use crate::{BridgeError, EventEnvelope};
use std::io::Write;
use std::sync::Mutex;

/// Outbound path to the producer runtime
///
/// Channels are shared by every handler the renderer binds, so sending takes
/// `&self`.
pub trait ProducerChannel: Send + Sync {
    fn send(&self, envelope: EventEnvelope) -> Result<(), BridgeError>;
}

/// JSON-line channel for stream transports
pub struct JsonLineChannel<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineChannel<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, BridgeError> {
        self.writer.into_inner().map_err(|_| BridgeError::Poisoned)
    }
}

impl<W: Write + Send> ProducerChannel for JsonLineChannel<W> {
    fn send(&self, envelope: EventEnvelope) -> Result<(), BridgeError> {
        let mut writer = self.writer.lock().map_err(|_| BridgeError::Poisoned)?;
        serde_json::to_writer(&mut *writer, &envelope)
            .map_err(|err| BridgeError::Encode(err.to_string()))?;
        writer
            .write_all(b"\n")
            .map_err(|err| BridgeError::Io(err.to_string()))?;
        writer
            .flush()
            .map_err(|err| BridgeError::Io(err.to_string()))?;
        Ok(())
    }
}

/// In-memory channel for tests
#[derive(Default)]
pub struct InMemoryChannel {
    envelopes: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.envelopes
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl ProducerChannel for InMemoryChannel {
    fn send(&self, envelope: EventEnvelope) -> Result<(), BridgeError> {
        self.envelopes
            .lock()
            .map_err(|_| BridgeError::Poisoned)?
            .push(envelope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventDescriptor;
    use host_tree::{EventClass, EventPayload};
    use render_types::{ComponentId, RendererId};

    fn envelope() -> EventEnvelope {
        EventEnvelope::new(
            EventDescriptor {
                renderer_id: RendererId::new(0),
                component_id: ComponentId::new(4),
                frame_index: 9,
                event_class: EventClass::KeyPress,
            },
            EventPayload::Keyboard {
                key: "a".to_string(),
            },
        )
    }

    #[test]
    fn test_in_memory_channel_records() {
        let channel = InMemoryChannel::new();
        channel.send(envelope()).unwrap();
        channel.send(envelope()).unwrap();

        let sent = channel.envelopes();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].descriptor.component_id, ComponentId::new(4));
    }

    #[test]
    fn test_json_line_channel_writes_lines() {
        let channel = JsonLineChannel::new(Vec::new());
        let first = envelope();
        channel.send(first.clone()).unwrap();
        channel.send(envelope()).unwrap();

        let bytes = channel.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let decoded: EventEnvelope = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded, first);
    }
}
