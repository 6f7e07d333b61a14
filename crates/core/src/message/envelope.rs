use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{error::Result, message::MetadataRecord};

/// Typed body of a message. `MESSAGE_TYPE` is the name written to storage.
pub trait MessagePayload: Serialize + DeserializeOwned {
    const MESSAGE_TYPE: &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message<T> {
    pub id: Uuid,
    pub data: T,
    pub metadata: MetadataRecord,
}

impl<T: MessagePayload> Message<T> {
    pub fn new(data: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            metadata: MetadataRecord::new(),
        }
    }

    /// Builds a message caused by `prior`: correlation stream, reply stream
    /// and properties are carried over, then causation is stamped.
    pub fn follow<U>(prior: &Message<U>, data: T) -> Result<Self> {
        let mut message = Self::new(data);

        message.metadata.correlation_stream_name = prior.metadata.correlation_stream_name.clone();
        message.metadata.reply_stream_name = prior.metadata.reply_stream_name.clone();
        message.metadata.properties = prior.metadata.properties.clone();

        message.metadata.follow(&prior.metadata)?;

        Ok(message)
    }

    pub fn follows<U>(&self, prior: &Message<U>) -> bool {
        self.metadata.follows(&prior.metadata)
    }

    pub fn correlated(&self, stream_name: &str) -> bool {
        self.metadata.correlated(stream_name)
    }

    pub fn message_type(&self) -> &'static str {
        T::MESSAGE_TYPE
    }
}
