//! Context assembly for prompt construction
//!
//! Combines the user query, a relevance-filtered slice of chat history, and
//! whatever the active pipeline retrieved into one [`Context`] value handed
//! to the prompt renderer.

use crate::memory::{Message, RelevanceFilter};
use crate::retrieval::RetrievedChunk;
use crate::sources::WebResult;
use serde::{Deserialize, Serialize};

/// Retrieved content, tagged by the pipeline that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RetrievalData {
    Documents { chunks: Vec<RetrievedChunk> },
    Web { results: Vec<WebResult> },
    Arxiv { paper_id: String, chunks: Vec<RetrievedChunk> },
}

/// Everything the generator needs to answer one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub query: String,
    pub chat_history: Vec<Message>,
    pub retrieved_content: Option<RetrievalData>,
}

/// Assembles contexts with a bounded, relevance-filtered history window
///
/// History is first trimmed to the most recent `2 * max_turns` messages and
/// only then relevance-filtered, so a long unrelated tail can never crowd
/// out recent exchanges.
pub struct ContextBuilder {
    max_turns: usize,
    filter: RelevanceFilter,
}

impl ContextBuilder {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            filter: RelevanceFilter::new(max_turns),
        }
    }

    pub fn build(
        &self,
        query: &str,
        chat_history: &[Message],
        retrieved_content: Option<RetrievalData>,
    ) -> Context {
        tracing::info!("building context for generation");

        let window_start = chat_history.len().saturating_sub(self.max_turns * 2);
        let recent = &chat_history[window_start..];

        let filtered = self.filter.filter(query, recent);

        Context {
            query: query.to_string(),
            chat_history: filtered,
            retrieved_content,
        }
    }
}
