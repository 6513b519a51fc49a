//! Hybrid retrieval
//!
//! One retriever instance owns a dense vector store, a BM25 lexical index,
//! and the corpus snapshot both were built from. Queries run both paths and
//! the results are merged into a single deduplicated set per query.

mod fusion;
mod retriever;

pub use fusion::union_fuse;
pub use retriever::{DocumentRetriever, RetrievalError};

use serde::{Deserialize, Serialize};

/// Default number of chunks returned per query
pub const DEFAULT_TOP_K: usize = 5;

/// Which retrieval path nominated a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalPath {
    /// Dense embedding similarity
    Vector,
    /// BM25 lexical scoring
    Lexical,
}

/// A retrieved chunk with its relevance score
///
/// Deduplicated by `(source, chunk_id)`. The score scale depends on `path`:
/// cosine similarity for the vector path, BM25 for the lexical path. The
/// two are not comparable and the fused set is not ranked by a unified
/// score (see [`union_fuse`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Source identifier of the originating document
    pub source: String,

    /// Window index within the source
    pub chunk_id: u32,

    /// Chunk text
    pub text: String,

    /// Path-local relevance score
    pub score: f32,

    /// Path that last nominated this chunk
    pub path: RetrievalPath,
}

impl RetrievedChunk {
    /// Identity key used for deduplication across paths
    pub fn key(&self) -> (String, u32) {
        (self.source.clone(), self.chunk_id)
    }
}
