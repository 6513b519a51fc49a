//! Conversation memory
//!
//! Chat history lifecycle plus the keyword-overlap relevance filter applied
//! before prompt assembly.

mod relevance;

pub use relevance::RelevanceFilter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Conversation history, single source of truth for one session
///
/// Messages are stored in chronological order; trimming and relevance
/// filtering never mutate the history itself, they produce the prompt view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::User, content));
        tracing::debug!("user message added to chat history");
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::Assistant, content));
        tracing::debug!("assistant message added to chat history");
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        tracing::info!("chat history cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_preserves_order() {
        let mut history = ChatHistory::new();
        history.push_user("first question");
        history.push_assistant("first answer");
        history.push_user("second question");

        assert_eq!(history.len(), 3);
        assert_eq!(history.messages()[0].role, Role::User);
        assert_eq!(history.messages()[1].role, Role::Assistant);
        assert_eq!(history.messages()[2].content, "second question");
    }

    #[test]
    fn test_clear() {
        let mut history = ChatHistory::new();
        history.push_user("hello");
        history.clear();
        assert!(history.is_empty());
    }
}
