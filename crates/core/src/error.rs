use thiserror::Error;

use crate::message::MetadataRecord;

#[derive(Error, Debug)]
pub enum CausewayError {
    #[error("Metadata doesn't follow prior metadata (metadata: {candidate:?}, prior: {prior:?})")]
    LineageViolation {
        candidate: Box<MetadataRecord>,
        prior: Box<MetadataRecord>,
    },

    #[error("Transient metadata field {field} can't be written")]
    TransientField { field: String },

    #[error("Can't reply to {message_type}: metadata has no reply stream name")]
    MissingReplyStreamName { message_type: String },

    #[error("Nothing to write to {stream_name}: batch is empty")]
    EmptyBatch { stream_name: String },

    #[error("Message type mismatch: expected {expected}, got {actual}")]
    MessageTypeMismatch { expected: String, actual: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CausewayError>;
