pub mod substitute;

pub use substitute::*;

use crate::{
    config::WriteConfig,
    error::{CausewayError, Result},
    message::{Message, MessagePayload, MetadataField},
    transform::{self, MessageData},
};

/// Storage-side writer. Implementors only append raw records; transient
/// metadata handling and replies are provided here.
pub trait Writer {
    fn config(&self) -> &WriteConfig;

    /// Appends `batch` to `stream_name`, returning the position of the last
    /// record written. An empty batch is an error.
    fn append(&mut self, batch: Vec<MessageData>, stream_name: &str) -> Result<u64>;

    fn append_reply(&mut self, batch: Vec<MessageData>, stream_name: &str) -> Result<u64> {
        self.append(batch, stream_name)
    }

    fn write_data(&mut self, mut batch: Vec<MessageData>, stream_name: &str) -> Result<u64> {
        if batch.is_empty() {
            return Err(CausewayError::EmptyBatch {
                stream_name: stream_name.to_string(),
            });
        }

        for message_data in &mut batch {
            transform::sanitize_metadata(&mut message_data.metadata, self.config())?;
        }

        tracing::debug!(stream_name, count = batch.len(), "writing");

        self.append(batch, stream_name)
    }

    fn write<T: MessagePayload>(&mut self, message: &Message<T>, stream_name: &str) -> Result<u64>
    where
        Self: Sized,
    {
        let message_data = transform::write(message)?;
        self.write_data(vec![message_data], stream_name)
    }

    /// Sends `message` to its own reply stream. Once the reply is appended
    /// the reply stream is cleared from `message` so the chain ends here; on
    /// failure `message` is left as it was.
    fn reply<T: MessagePayload>(&mut self, message: &mut Message<T>) -> Result<u64>
    where
        Self: Sized,
    {
        let Some(reply_stream_name) = message.metadata.reply_stream_name.clone() else {
            return Err(CausewayError::MissingReplyStreamName {
                message_type: T::MESSAGE_TYPE.to_string(),
            });
        };

        let mut message_data = transform::write(message)?;
        message_data
            .metadata
            .remove(MetadataField::ReplyStreamName.name());

        tracing::debug!(
            stream_name = %reply_stream_name,
            message_type = T::MESSAGE_TYPE,
            "replying"
        );

        let position = self.append_reply(vec![message_data], &reply_stream_name)?;
        message.metadata.clear_reply_stream_name();

        Ok(position)
    }
}
