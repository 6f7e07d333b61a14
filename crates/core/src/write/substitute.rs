use std::collections::HashMap;

use crate::{
    config::WriteConfig,
    error::{CausewayError, Result},
    message::{Message, MessagePayload},
    transform::{self, MessageData},
    write::Writer,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub message_data: MessageData,
    pub stream_name: String,
    pub position: u64,
}

/// In-memory writer that records everything written through it.
#[derive(Debug, Default)]
pub struct SubstituteWriter {
    config: WriteConfig,
    writes: Vec<Recorded>,
    replies: Vec<Recorded>,
    next_positions: HashMap<String, u64>,
}

impl SubstituteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WriteConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn written(&self) -> bool {
        !self.writes.is_empty()
    }

    pub fn writes(&self, predicate: impl Fn(&MessageData, &str) -> bool) -> Vec<&Recorded> {
        Self::select(&self.writes, predicate)
    }

    pub fn replied(&self) -> bool {
        !self.replies.is_empty()
    }

    pub fn replied_with(&self, predicate: impl Fn(&MessageData, &str) -> bool) -> bool {
        self.replies
            .iter()
            .any(|r| predicate(&r.message_data, &r.stream_name))
    }

    pub fn replies(&self, predicate: impl Fn(&MessageData, &str) -> bool) -> Vec<&Recorded> {
        Self::select(&self.replies, predicate)
    }

    /// Replies of type `T`, decoded and filtered by `predicate`.
    pub fn message_replies<T: MessagePayload>(
        &self,
        predicate: impl Fn(&Message<T>, &str) -> bool,
    ) -> Result<Vec<Message<T>>> {
        let mut matched = Vec::new();

        for recorded in &self.replies {
            if !recorded.message_data.is_type(T::MESSAGE_TYPE) {
                continue;
            }

            let message = transform::read::<T>(&recorded.message_data)?;
            if predicate(&message, &recorded.stream_name) {
                matched.push(message);
            }
        }

        Ok(matched)
    }

    fn select(
        recorded: &[Recorded],
        predicate: impl Fn(&MessageData, &str) -> bool,
    ) -> Vec<&Recorded> {
        recorded
            .iter()
            .filter(|r| predicate(&r.message_data, &r.stream_name))
            .collect()
    }

    /// Assigns positions to `batch`, returning the records and the position
    /// of the last one.
    fn record(
        &mut self,
        batch: Vec<MessageData>,
        stream_name: &str,
    ) -> Result<(Vec<Recorded>, u64)> {
        if batch.is_empty() {
            return Err(CausewayError::EmptyBatch {
                stream_name: stream_name.to_string(),
            });
        }

        let next = self.next_positions.entry(stream_name.to_string()).or_insert(0);
        let first = *next;
        *next += batch.len() as u64;

        let recorded = batch
            .into_iter()
            .zip(first..)
            .map(|(message_data, position)| Recorded {
                message_data,
                stream_name: stream_name.to_string(),
                position,
            })
            .collect();

        Ok((recorded, *next - 1))
    }
}

impl Writer for SubstituteWriter {
    fn config(&self) -> &WriteConfig {
        &self.config
    }

    fn append(&mut self, batch: Vec<MessageData>, stream_name: &str) -> Result<u64> {
        let (recorded, position) = self.record(batch, stream_name)?;
        self.writes.extend(recorded);
        Ok(position)
    }

    fn append_reply(&mut self, batch: Vec<MessageData>, stream_name: &str) -> Result<u64> {
        let (recorded, position) = self.record(batch, stream_name)?;
        self.replies.extend(recorded);
        Ok(position)
    }
}
