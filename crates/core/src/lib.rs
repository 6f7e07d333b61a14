//! Causeway Core Library
//!
//! Lineage and correlation metadata for messages on event-sourced streams:
//! identifiers derived from stream positions, causal continuation between
//! messages, and the persisted projection of metadata.

pub mod config;
pub mod error;
pub mod identifier;
pub mod message;
pub mod transform;
pub mod write;

// Re-export commonly used items at crate root
pub use config::{TransientPolicy, WriteConfig};
pub use error::{CausewayError, Result};
pub use identifier::{MessageIdentifier, identifier};
pub use message::{
    Message, MessagePayload, MetadataField, MetadataRecord, correlated, follow, follows,
};
pub use transform::MessageData;
pub use write::{Recorded, SubstituteWriter, Writer};
