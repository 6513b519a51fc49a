//! Document chunking
//!
//! Splits raw document text into overlapping fixed-size character windows.
//! Chunks are the unit of indexing and retrieval: each one carries its
//! source identifier and a 0-based window index unique within that source.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default window size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive windows in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

#[derive(Error, Debug)]
pub enum ChunkingError {
    #[error(
        "Invalid chunk geometry: chunk_overlap ({chunk_overlap}) must be \
         smaller than chunk_size ({chunk_size}) and chunk_size must be non-zero"
    )]
    InvalidGeometry {
        chunk_size: usize,
        chunk_overlap: usize,
    },
}

/// A raw document produced by a loader or fetcher
///
/// Immutable once produced; consumed by [`chunk_documents`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier (filename, paper ID, URL)
    pub source: String,

    /// Full extracted text
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// An overlapping window of a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Source identifier of the originating document
    pub source: String,

    /// 0-based window index within the source
    pub chunk_id: u32,

    /// Window text
    pub text: String,
}

impl Chunk {
    /// Identity key used to merge results across retrieval paths
    pub fn key(&self) -> (String, u32) {
        (self.source.clone(), self.chunk_id)
    }
}

/// Split documents into overlapping character windows
///
/// Each window covers `[start, start + chunk_size)` clipped to the text end;
/// the next window starts exactly `chunk_size - chunk_overlap` characters
/// later. Counting is in characters, so multi-byte text never splits a code
/// point. `chunk_id` restarts at 0 for every document. Empty text yields no
/// chunks.
///
/// Fails with [`ChunkingError::InvalidGeometry`] when `chunk_overlap >=
/// chunk_size` (the window would never advance) or `chunk_size == 0`.
pub fn chunk_documents(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>, ChunkingError> {
    if chunk_size == 0 || chunk_overlap >= chunk_size {
        return Err(ChunkingError::InvalidGeometry {
            chunk_size,
            chunk_overlap,
        });
    }

    let step = chunk_size - chunk_overlap;
    let mut chunks = Vec::new();

    for doc in documents {
        // Byte offset of every character, so windows slice on char boundaries
        let boundaries: Vec<usize> = doc.text.char_indices().map(|(i, _)| i).collect();
        let total_chars = boundaries.len();

        let mut start = 0usize;
        let mut chunk_id = 0u32;

        while start < total_chars {
            let end = (start + chunk_size).min(total_chars);
            let byte_start = boundaries[start];
            let byte_end = if end == total_chars {
                doc.text.len()
            } else {
                boundaries[end]
            };

            chunks.push(Chunk {
                source: doc.source.clone(),
                chunk_id,
                text: doc.text[byte_start..byte_end].to_string(),
            });

            start += step;
            chunk_id += 1;
        }

        tracing::debug!(source = %doc.source, chunks = chunk_id, "chunked document");
    }

    tracing::info!(
        documents = documents.len(),
        chunks = chunks.len(),
        "chunking complete"
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_offsets_and_ids() {
        // 22 chars, size 10, overlap 2 -> windows at offsets 0, 8, 16
        let docs = vec![Document::new("doc1", "the cat sat on the mat")];
        let chunks = chunk_documents(&docs, 10, 2).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "the cat sa");
        assert_eq!(chunks[1].text, "t on the m");
        assert_eq!(chunks[2].text, "he mat");

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i as u32);
            assert_eq!(chunk.source, "doc1");
        }
    }

    #[test]
    fn test_consecutive_windows_overlap_exactly() {
        let text: String = ('a'..='z').cycle().take(100).collect();
        let docs = vec![Document::new("cycle", text)];
        let chunk_size = 30;
        let overlap = 7;

        let chunks = chunk_documents(&docs, chunk_size, overlap).unwrap();

        for pair in chunks.windows(2) {
            let prev_tail: String = pair[0].text.chars().skip(chunk_size - overlap).collect();
            let next_head: String = pair[1].text.chars().take(prev_tail.chars().count()).collect();
            assert_eq!(prev_tail, next_head);
        }
    }

    #[test]
    fn test_window_count_matches_formula() {
        for (len, size, overlap) in [(100usize, 30usize, 7usize), (500, 500, 50), (501, 500, 50)] {
            let text: String = "x".repeat(len);
            let docs = vec![Document::new("d", text)];
            let chunks = chunk_documents(&docs, size, overlap).unwrap();

            // windows start at 0, step, 2*step, ... while start < len
            let step = size - overlap;
            assert_eq!(chunks.len(), len.div_ceil(step));
        }
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let docs = vec![Document::new("d", "some text")];
        assert!(matches!(
            chunk_documents(&docs, 10, 10),
            Err(ChunkingError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            chunk_documents(&docs, 10, 25),
            Err(ChunkingError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            chunk_documents(&docs, 0, 0),
            Err(ChunkingError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_empty_document_yields_no_chunks() {
        let docs = vec![Document::new("empty", "")];
        let chunks = chunk_documents(&docs, 10, 2).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunk_ids_independent_across_documents() {
        let docs = vec![
            Document::new("a", "0123456789abcdef"),
            Document::new("b", "0123456789"),
        ];
        let chunks = chunk_documents(&docs, 8, 2).unwrap();

        let a_ids: Vec<u32> = chunks
            .iter()
            .filter(|c| c.source == "a")
            .map(|c| c.chunk_id)
            .collect();
        let b_ids: Vec<u32> = chunks
            .iter()
            .filter(|c| c.source == "b")
            .map(|c| c.chunk_id)
            .collect();

        assert_eq!(a_ids, vec![0, 1, 2]);
        assert_eq!(b_ids, vec![0, 1]);
    }

    #[test]
    fn test_multibyte_text_not_split_mid_codepoint() {
        let docs = vec![Document::new("utf8", "héllo wörld déjà vu ünïcode")];
        let chunks = chunk_documents(&docs, 5, 1).unwrap();

        let total: usize = docs[0].text.chars().count();
        let covered: usize = chunks.last().unwrap().text.chars().count()
            + (chunks.len() - 1) * 4; // step = 4
        assert_eq!(covered, total);
    }
}
