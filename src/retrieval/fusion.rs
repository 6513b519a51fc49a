//! Union fusion of the two retrieval paths
//!
//! Deliberately a set union rather than combined-score rank fusion: the
//! output never contains duplicate `(source, chunk_id)` pairs and has size
//! `min(top_k, unique keys found)`, but it is NOT the top_k best passages
//! under any unified score. Known limitation, kept as designed.

use crate::retrieval::RetrievedChunk;
use ahash::AHashMap;

/// Merge vector-path and lexical-path results into one deduplicated set
///
/// Vector results are inserted first in their ranked order, then lexical
/// results are upserted: on a key collision the lexical entry replaces the
/// vector entry in place (last write wins, position kept). The fused set is
/// returned in insertion order, truncated to `top_k`.
pub fn union_fuse(
    vector_results: Vec<RetrievedChunk>,
    lexical_results: Vec<RetrievedChunk>,
    top_k: usize,
) -> Vec<RetrievedChunk> {
    let mut fused: Vec<RetrievedChunk> = Vec::new();
    let mut positions: AHashMap<(String, u32), usize> = AHashMap::new();

    for result in vector_results.into_iter().chain(lexical_results) {
        match positions.get(&result.key()) {
            Some(&at) => fused[at] = result,
            None => {
                positions.insert(result.key(), fused.len());
                fused.push(result);
            }
        }
    }

    fused.truncate(top_k);
    fused
}
