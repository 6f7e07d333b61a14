use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a single message inside a named stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageIdentifier {
    stream_name: String,
    position: u64,
}

impl MessageIdentifier {
    pub fn new(stream_name: impl Into<String>, position: u64) -> Self {
        Self {
            stream_name: stream_name.into(),
            position,
        }
    }

    /// Builds an identifier only when both halves are known.
    pub fn from_parts(stream_name: Option<&str>, position: Option<u64>) -> Option<Self> {
        match (stream_name, position) {
            (Some(stream_name), Some(position)) => Some(Self::new(stream_name, position)),
            _ => None,
        }
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    pub fn position(&self) -> u64 {
        self.position
    }
}

impl fmt::Display for MessageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stream_name, self.position)
    }
}

/// Renders `<stream_name>/<position>`, or `None` if either part is unset.
pub fn identifier(stream_name: Option<&str>, position: Option<u64>) -> Option<String> {
    MessageIdentifier::from_parts(stream_name, position).map(|id| id.to_string())
}
