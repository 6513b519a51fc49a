//! Okapi BM25 lexical index, position-aligned with its corpus

use ahash::AHashMap;

const K1: f32 = 1.5;
const B: f32 = 0.75;
// Floor factor applied to negative IDF values, matching Okapi practice
const EPSILON: f32 = 0.25;

/// Whitespace tokenizer shared by indexing and querying
///
/// Lowercased so lexical matching is case-insensitive; both sides of the
/// index must use the same tokenization or scores are meaningless.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// BM25 index over a tokenized corpus
///
/// Built once from the full corpus; `scores` returns one relevance score per
/// corpus position, in corpus order, so results map back to chunk metadata
/// by index. Rebuilding means constructing a new instance; there is no
/// incremental update.
pub struct Bm25Index {
    term_freqs: Vec<AHashMap<String, u32>>,
    idf: AHashMap<String, f32>,
    doc_lens: Vec<f32>,
    avgdl: f32,
}

impl Bm25Index {
    /// Build the index from a tokenized corpus
    pub fn build(corpus: &[Vec<String>]) -> Self {
        let n_docs = corpus.len();

        let mut term_freqs = Vec::with_capacity(n_docs);
        let mut doc_freqs: AHashMap<String, u32> = AHashMap::new();
        let mut doc_lens = Vec::with_capacity(n_docs);

        for doc in corpus {
            let mut freqs: AHashMap<String, u32> = AHashMap::new();
            for token in doc {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lens.push(doc.len() as f32);
            term_freqs.push(freqs);
        }

        let avgdl = if n_docs == 0 {
            0.0
        } else {
            doc_lens.iter().sum::<f32>() / n_docs as f32
        };

        // Raw Okapi IDF can go negative for terms in most documents; those
        // are floored to a fraction of the average IDF to keep them from
        // subtracting relevance.
        let mut idf: AHashMap<String, f32> = AHashMap::with_capacity(doc_freqs.len());
        let mut idf_sum = 0.0;
        let mut negative_terms = Vec::new();

        for (term, df) in doc_freqs {
            let value = ((n_docs as f32 - df as f32 + 0.5) / (df as f32 + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative_terms.push(term.clone());
            }
            idf.insert(term, value);
        }

        if !idf.is_empty() {
            let floor = EPSILON * (idf_sum / idf.len() as f32).max(0.0);
            for term in negative_terms {
                idf.insert(term, floor);
            }
        }

        tracing::debug!(documents = n_docs, terms = idf.len(), "BM25 index built");

        Self {
            term_freqs,
            idf,
            doc_lens,
            avgdl,
        }
    }

    /// Score every corpus position against the query tokens
    ///
    /// The returned vector is aligned positionally with the corpus the index
    /// was built from; unmatched documents score 0.
    pub fn scores(&self, query_tokens: &[String]) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.term_freqs.len()];

        if self.avgdl == 0.0 {
            return scores;
        }

        for token in query_tokens {
            let Some(&idf) = self.idf.get(token) else {
                continue;
            };

            for (position, freqs) in self.term_freqs.iter().enumerate() {
                let tf = *freqs.get(token).unwrap_or(&0) as f32;
                if tf == 0.0 {
                    continue;
                }
                let norm = K1 * (1.0 - B + B * self.doc_lens[position] / self.avgdl);
                scores[position] += idf * (tf * (K1 + 1.0)) / (tf + norm);
            }
        }

        scores
    }

    /// The `top_k` highest-scoring corpus positions with their scores
    ///
    /// Score ties break toward the lowest corpus index (stable sort), so
    /// output is reproducible across runs with identical input.
    pub fn top_indices(&self, query_tokens: &[String], top_k: usize) -> Vec<(usize, f32)> {
        let scores = self.scores(query_tokens);

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);

        ranked
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    /// Check if the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }
}
