//! Conversion between typed messages and the raw records storage works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    config::{TransientPolicy, WriteConfig},
    error::{CausewayError, Result},
    message::{Message, MessagePayload, MetadataRecord},
};

/// A message as storage sees it.
///
/// `stream_name`, `position`, `global_position` and `time` are only filled
/// in on records read back from a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub message_type: String,
    pub data: Value,
    pub metadata: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_position: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl MessageData {
    pub fn is_type(&self, message_type: &str) -> bool {
        self.message_type == message_type
    }
}

pub fn write<T: MessagePayload>(message: &Message<T>) -> Result<MessageData> {
    Ok(MessageData {
        id: message.id,
        message_type: T::MESSAGE_TYPE.to_string(),
        data: serde_json::to_value(&message.data)?,
        metadata: message.metadata.persistable_projection(),
        stream_name: None,
        position: None,
        global_position: None,
        time: None,
    })
}

/// Decodes a stored record. Source identity, global position and time come
/// from the record itself, never from its metadata map.
pub fn read<T: MessagePayload>(message_data: &MessageData) -> Result<Message<T>> {
    if !message_data.is_type(T::MESSAGE_TYPE) {
        return Err(CausewayError::MessageTypeMismatch {
            expected: T::MESSAGE_TYPE.to_string(),
            actual: message_data.message_type.clone(),
        });
    }

    let data: T = serde_json::from_value(message_data.data.clone())?;

    let mut metadata = MetadataRecord::from_projection(&message_data.metadata)?;
    metadata.source_stream_name = message_data.stream_name.clone();
    metadata.source_position = message_data.position;
    metadata.global_position = message_data.global_position;
    metadata.time = message_data.time;

    Ok(Message {
        id: message_data.id,
        data,
        metadata,
    })
}

/// Applies the configured transient policy to a raw metadata map.
pub fn sanitize_metadata(metadata: &mut Map<String, Value>, config: &WriteConfig) -> Result<()> {
    let transient: Vec<String> = metadata
        .keys()
        .filter(|name| MetadataRecord::is_transient(name))
        .cloned()
        .collect();

    if transient.is_empty() {
        return Ok(());
    }

    match config.transient_policy {
        TransientPolicy::Reject => Err(CausewayError::TransientField {
            field: transient.join(", "),
        }),
        TransientPolicy::Strip => {
            tracing::warn!(fields = ?transient, "stripping transient metadata fields");
            for name in &transient {
                metadata.remove(name);
            }
            Ok(())
        }
    }
}
