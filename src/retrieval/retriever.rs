//! Hybrid document retriever combining dense and lexical search

use crate::chunking::Chunk;
use crate::embedding::{
    tokenize, Bm25Index, EmbeddingError, EmbeddingProvider, IndexConfig, VectorStore,
    VectorStoreError,
};
use crate::retrieval::{union_fuse, RetrievalPath, RetrievedChunk};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Querying before `index_chunks` is a caller bug, not a data condition
    #[error("Index not built: index_chunks must run before retrieve")]
    IndexNotBuilt,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
}

/// The dual index plus the corpus snapshot it was built from
///
/// The vector store and the BM25 index hold the chunks in the same order,
/// so lexical result positions map back to chunk metadata through `corpus`.
struct HybridIndex {
    vector_store: VectorStore<Chunk>,
    lexical: Bm25Index,
    corpus: Vec<Chunk>,
}

/// Hybrid retriever over one document set
///
/// Created once per document set (or per arXiv paper) and cached by the
/// caller; `index_chunks` runs once to build both indexes, after which the
/// instance is read-only. Re-running `index_chunks` fully replaces the
/// prior index; there is no incremental update path. An indexed-but-empty
/// retriever returns empty results; an unindexed one fails with
/// [`RetrievalError::IndexNotBuilt`].
pub struct DocumentRetriever {
    provider: Arc<dyn EmbeddingProvider>,
    index_config: IndexConfig,
    index: Option<HybridIndex>,
}

impl DocumentRetriever {
    /// Create an unindexed retriever
    ///
    /// The embedding provider is injected here. The configured `vector_dim`
    /// must match the provider's output dimension (enforced when chunks are
    /// indexed).
    pub fn new(provider: Arc<dyn EmbeddingProvider>, index_config: IndexConfig) -> Self {
        Self {
            provider,
            index_config,
            index: None,
        }
    }

    /// Whether `index_chunks` has run on this instance
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Number of indexed chunks
    pub fn indexed_chunks(&self) -> usize {
        self.index.as_ref().map_or(0, |i| i.corpus.len())
    }

    /// Build both indexes from a chunk set, replacing any prior index
    ///
    /// Embeds every chunk text in one batch, inserts into a fresh vector
    /// store, whitespace-tokenizes the same texts, and builds a fresh BM25
    /// index; the chunk list itself becomes the corpus-order reference used
    /// to map lexical positions back to `(source, chunk_id, text)`.
    pub fn index_chunks(&mut self, chunks: &[Chunk]) -> Result<(), RetrievalError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let embeddings = self.provider.embed_batch(&texts)?;

        let mut vector_store = VectorStore::new(self.index_config.vector_dim);
        vector_store.add(&embeddings, chunks)?;

        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();
        let lexical = Bm25Index::build(&tokenized);

        self.index = Some(HybridIndex {
            vector_store,
            lexical,
            corpus: chunks.to_vec(),
        });

        tracing::info!(chunks = chunks.len(), "hybrid index built (vector + BM25)");

        Ok(())
    }

    /// Run both retrieval paths for `query` and fuse the results
    ///
    /// Returns at most `top_k` chunks, deduplicated by `(source, chunk_id)`,
    /// vector-path entries first in insertion order. Lexical results win
    /// metadata collisions (see [`union_fuse`]). Deterministic: an unchanged
    /// index and identical query produce identical ordered output.
    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let index = self.index.as_ref().ok_or(RetrievalError::IndexNotBuilt)?;

        // Indexed but empty: "no data" is an empty result, not an error
        if index.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(query)?;
        let vector_results: Vec<RetrievedChunk> = index
            .vector_store
            .search(&query_embedding, top_k)?
            .into_iter()
            .map(|(chunk, score)| RetrievedChunk {
                source: chunk.source,
                chunk_id: chunk.chunk_id,
                text: chunk.text,
                score,
                path: RetrievalPath::Vector,
            })
            .collect();

        let query_tokens = tokenize(query);
        let lexical_results: Vec<RetrievedChunk> = index
            .lexical
            .top_indices(&query_tokens, top_k)
            .into_iter()
            .map(|(position, score)| {
                let chunk = &index.corpus[position];
                RetrievedChunk {
                    source: chunk.source.clone(),
                    chunk_id: chunk.chunk_id,
                    text: chunk.text.clone(),
                    score,
                    path: RetrievalPath::Lexical,
                }
            })
            .collect();

        let fused = union_fuse(vector_results, lexical_results, top_k);

        tracing::info!(results = fused.len(), "hybrid retrieval complete");

        Ok(fused)
    }
}
