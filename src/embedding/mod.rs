//! Embedding and indexing
//!
//! Dual index backends for hybrid retrieval:
//! - `EmbeddingProvider` trait with a FastEmbed implementation (all-MiniLM-L6-v2, 384-dim)
//! - `VectorStore` for dense cosine-similarity search (exact scan)
//! - `Bm25Index` for sparse lexical scoring, position-aligned with the corpus

mod lexical_index;
mod provider;
mod vector_store;

pub use lexical_index::{tokenize, Bm25Index};
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
pub use vector_store::{VectorStore, VectorStoreError};

use serde::{Deserialize, Serialize};

/// Configuration for embedding generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub model: String,
    /// Embedding dimension (384 for MiniLM)
    pub dimension: usize,
    /// Batch size for encoding chunk texts
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            batch_size: 32,
        }
    }
}

/// Configuration for the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Vector dimension (must match embedding dimension)
    pub vector_dim: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { vector_dim: 384 }
    }
}
