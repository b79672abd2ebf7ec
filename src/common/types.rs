use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One chat entry scraped from the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub timestamp: String,
    pub username: Option<String>,
    pub message: Option<String>,
}

impl ChatMessage {
    /// Builds a message only when both username and text are non-empty.
    pub fn complete(
        timestamp: String,
        username: Option<String>,
        message: Option<String>,
    ) -> Option<Self> {
        let has_username = username.as_deref().is_some_and(|name| !name.is_empty());
        let has_message = message.as_deref().is_some_and(|text| !text.is_empty());
        if !has_username || !has_message {
            return None;
        }

        Some(Self {
            timestamp,
            username,
            message,
        })
    }
}

/// Identifier used to recognise a message node between polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// The node's `id` attribute.
    Dom(String),
    /// Hash of the node's visible text, used when the node carries no id.
    TextHash(u64),
}

impl MessageId {
    pub fn text_hash(text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        MessageId::TextHash(hasher.finish())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Dom(id) => write!(f, "#{id}"),
            MessageId::TextHash(hash) => write!(f, "text:{hash:016x}"),
        }
    }
}
