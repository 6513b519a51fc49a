//! Answer generation
//!
//! Prompt rendering plus the [`Generator`] trait the pipeline depends on;
//! [`OllamaGenerator`] is the production implementation.

mod ollama;

pub use ollama::OllamaGenerator;

use crate::context::{Context, RetrievalData};
use crate::memory::Role;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Empty response received from the model")]
    EmptyResponse,

    #[error("Model request timed out")]
    Timeout,

    #[error("Model request failed: {0}")]
    Http(String),
}

/// Produces an answer for a fully rendered prompt
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Render a [`Context`] into the final prompt string
///
/// Interleaves conversation history, retrieved content, and the user
/// question into a fixed instruction template.
pub fn render_prompt(context: &Context) -> String {
    let history_text: String = context
        .chat_history
        .iter()
        .map(|message| {
            let role = match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            format!("{}: {}\n", role, message.content)
        })
        .collect();

    let retrieved_text = match &context.retrieved_content {
        None => String::new(),
        Some(RetrievalData::Documents { chunks }) | Some(RetrievalData::Arxiv { chunks, .. }) => {
            chunks
                .iter()
                .map(|chunk| chunk.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        }
        Some(RetrievalData::Web { results }) => results
            .iter()
            .map(|r| format!("{}: {} ({})", r.title, r.snippet, r.url))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    format!(
        "You are an intelligent assistant.\n\
         \n\
         Use the provided context to answer the question.\n\
         If the answer is not found in context, say you do not know.\n\
         \n\
         Conversation History:\n\
         {history_text}\n\
         Retrieved Context:\n\
         {retrieved_text}\n\
         \n\
         User Question:\n\
         {query}\n\
         \n\
         Answer:\n",
        query = context.query,
    )
}
