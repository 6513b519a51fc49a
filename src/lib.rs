//! QueryWave - Retrieval core for a RAG assistant
//!
//! Turns raw documents into a ranked candidate-context set: sliding-window
//! chunking, dual indexing (dense vectors + BM25), union fusion per query,
//! and assembly of the prompt-ready context payload. The chat UI, prompt
//! engineering, and the LLM backend's generation behavior are external
//! collaborators reached through the typed interfaces in `sources` and `llm`.

pub mod chunking;
pub mod config;
pub mod context;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod memory;
pub mod pipeline;
pub mod retrieval;
pub mod sources;

pub use error::{QuerywaveError, Result};
