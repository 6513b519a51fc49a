//! Dense vector store with metadata, exact cosine scan

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Length mismatch: {vectors} vectors but {metadatas} metadata records")]
    LengthMismatch { vectors: usize, metadatas: usize },
}

/// In-memory vector store pairing each embedding with a metadata record
///
/// Search is an exact scan over all stored vectors: the corpus is one
/// document set, small enough that a linear pass is cheap, and exactness
/// makes the results deterministic. Similarity is cosine (fixed, not
/// caller-selectable). The embedding dimension is fixed when the store is
/// created and every inserted or queried vector must match it. Metadata is
/// returned by `search` in decreasing-similarity order; ties keep insertion
/// order.
pub struct VectorStore<M> {
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
    metadata: Vec<M>,
    dimension: usize,
}

impl<M: Clone> VectorStore<M> {
    /// Create an empty store for vectors of `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: Vec::new(),
            norms: Vec::new(),
            metadata: Vec::new(),
            dimension,
        }
    }

    /// Insert vectors with their metadata records
    ///
    /// The two slices must have equal length and every vector must match the
    /// store dimension; nothing is inserted when either check fails.
    pub fn add(&mut self, vectors: &[Vec<f32>], metadatas: &[M]) -> Result<(), VectorStoreError> {
        if vectors.len() != metadatas.len() {
            return Err(VectorStoreError::LengthMismatch {
                vectors: vectors.len(),
                metadatas: metadatas.len(),
            });
        }

        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(VectorStoreError::InvalidDimension {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        for vector in vectors {
            self.norms.push(norm(vector));
            self.vectors.push(vector.clone());
        }
        self.metadata.extend_from_slice(metadatas);

        Ok(())
    }

    /// Search for the `top_k` nearest neighbors of `query`
    ///
    /// Returns at most `top_k` `(metadata, similarity)` pairs ordered by
    /// decreasing cosine similarity; all stored entries when fewer than
    /// `top_k` are indexed. Zero-norm vectors score 0 against everything.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(M, f32)>, VectorStoreError> {
        if query.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        if self.metadata.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_norm = norm(query);

        let mut ranked: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(position, (vector, &vector_norm))| {
                let similarity = if query_norm == 0.0 || vector_norm == 0.0 {
                    0.0
                } else {
                    dot(query, vector) / (query_norm * vector_norm)
                };
                (position, similarity)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);

        Ok(ranked
            .into_iter()
            .map(|(position, similarity)| (self.metadata[position].clone(), similarity))
            .collect())
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Fixed vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(vector: &[f32]) -> f32 {
    dot(vector, vector).sqrt()
}
