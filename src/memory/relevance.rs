//! Rule-based relevance filtering of chat history

use crate::memory::Message;
use ahash::AHashSet;

/// Keyword-overlap relevance filter
///
/// Lightweight and purely lexical: a message qualifies when its lowercase
/// word set intersects the query's. History is scanned newest-to-oldest and
/// collection stops at `2 * max_turns` qualifying messages, which are then
/// restored to chronological order. No side effects beyond logging.
pub struct RelevanceFilter {
    max_turns: usize,
}

impl RelevanceFilter {
    pub fn new(max_turns: usize) -> Self {
        Self { max_turns }
    }

    /// Select messages relevant to `query`
    pub fn filter(&self, query: &str, chat_history: &[Message]) -> Vec<Message> {
        if chat_history.is_empty() {
            return Vec::new();
        }

        let query_keywords: AHashSet<String> =
            query.split_whitespace().map(str::to_lowercase).collect();

        let mut relevant: Vec<Message> = Vec::new();

        for message in chat_history.iter().rev() {
            let overlaps = message
                .content
                .split_whitespace()
                .any(|word| query_keywords.contains(&word.to_lowercase()));

            if overlaps {
                relevant.push(message.clone());
            }

            if relevant.len() >= self.max_turns * 2 {
                break;
            }
        }

        relevant.reverse();

        tracing::info!(selected = relevant.len(), "relevance filter applied");

        relevant
    }
}
