//! # Event Bridge Service
//!
//! Carries host interactions back to the producer runtime.
//!
//! ## Philosophy
//!
//! - **Fire-and-forget**: The renderer never waits for the producer's reaction
//! - **Addressed by frame**: Events name the attribute frame that should react,
//!   not the host node that saw the interaction
//! - **Installed once**: The process-wide producer target is set a single time
//!   and only read afterwards
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A transport (channels are pluggable)
//! - An event loop
//! - A handler registry on the producer side

pub mod bridge;
pub mod channel;
pub mod envelope;

pub use bridge::{install, installed, EventBridge};
pub use channel::{InMemoryChannel, JsonLineChannel, ProducerChannel};
pub use envelope::{
    DispatchId, EventDescriptor, EventEnvelope, SchemaVersion, EVENT_DISPATCH_ACTION,
    EVENT_SCHEMA_VERSION,
};

use thiserror::Error;

/// Errors for event delivery
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Serialization error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Producer channel lock poisoned")]
    Poisoned,

    #[error("No producer target installed")]
    NotInstalled,

    #[error("Producer target already installed")]
    AlreadyInstalled,
}
