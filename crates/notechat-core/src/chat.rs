//! Chat message types for the panel transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Text typed (or triggered) by the user.
    User,
    /// Answer returned by the model.
    Bot,
    /// Failure notice produced locally. Never sent to the model.
    Error,
}

impl ChatRole {
    /// Bot answers are rendered as formatted markup, everything else as plain text.
    pub fn is_formatted(&self) -> bool {
        matches!(self, Self::Bot)
    }
}

/// A message in the transcript.
///
/// Messages are immutable once created; the conversation keeps them in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of this message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new chat message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create a bot message.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Bot, content)
    }

    /// Create an error message.
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Error, content)
    }
}
