//! Orchestrator tests with stubbed collaborators: no network, no model
//! downloads.

use async_trait::async_trait;
use querywave::config::Config;
use querywave::embedding::{tokenize, EmbeddingError, EmbeddingProvider};
use querywave::llm::{GenerationError, Generator};
use querywave::memory::ChatHistory;
use querywave::pipeline::{Orchestrator, RagRequest, RagResponse};
use querywave::sources::{PaperFetcher, SourceError, UploadedFile, WebResult, WebSearch};
use querywave::QuerywaveError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

struct StubProvider {
    dimension: usize,
}

impl EmbeddingProvider for StubProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            vector[(hasher.finish() as usize) % self.dimension] += 1.0;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Returns a fixed answer, counting calls and keeping the last prompt
struct StubGenerator {
    calls: AtomicUsize,
    last_prompt: Mutex<String>,
}

impl StubGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        }
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = prompt.to_string();
        Ok("stub answer".to_string())
    }
}

struct StubFetcher {
    fetches: AtomicUsize,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PaperFetcher for StubFetcher {
    async fn fetch(&self, paper_id: &str) -> Result<String, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if paper_id == "0000.0000" {
            return Err(SourceError::PaperNotFound {
                id: paper_id.to_string(),
            });
        }
        Ok(format!(
            "Paper {paper_id}\n\nAttention mechanisms replace recurrence entirely."
        ))
    }
}

struct StubSearch;

#[async_trait]
impl WebSearch for StubSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, SourceError> {
        Ok(vec![WebResult {
            title: format!("result for {query}"),
            snippet: "a snippet".to_string(),
            url: "https://example.com".to_string(),
        }])
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.embedding.dimension = 64;
    config.indexing.vector_dim = 64;
    config.chunking.chunk_size = 60;
    config.chunking.chunk_overlap = 10;
    config
}

fn orchestrator(
    generator: Arc<StubGenerator>,
    fetcher: Arc<StubFetcher>,
) -> Orchestrator {
    Orchestrator::new(
        config(),
        Arc::new(StubProvider { dimension: 64 }),
        generator,
        fetcher,
        Arc::new(StubSearch),
    )
}

fn text_file(name: &str, content: &str) -> UploadedFile {
    UploadedFile::new(name, content.as_bytes().to_vec())
}

#[tokio::test]
async fn test_document_flow() {
    let generator = Arc::new(StubGenerator::new());
    let mut orchestrator = orchestrator(Arc::clone(&generator), Arc::new(StubFetcher::new()));

    let session = Uuid::new_v4();
    let history = ChatHistory::new();

    let response = orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "how does the retry policy work".to_string(),
                files: vec![text_file(
                    "manual.txt",
                    "the retry policy uses exponential backoff with three attempts",
                )],
            },
            &history,
        )
        .await
        .unwrap();

    match response {
        RagResponse::Document { answer, sources } => {
            assert_eq!(answer, "stub answer");
            assert!(!sources.is_empty());
            assert!(sources.iter().all(|s| s.source == "manual.txt"));
        }
        other => panic!("expected document response, got {other:?}"),
    }
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    // The rendered prompt carries the question and the retrieved text
    let prompt = generator.last_prompt.lock().unwrap();
    assert!(prompt.contains("how does the retry policy work"));
    assert!(prompt.contains("exponential backoff"));
}

#[tokio::test]
async fn test_document_query_without_prior_upload_fails() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let result = orchestrator
        .execute(
            Uuid::new_v4(),
            RagRequest::Document {
                query: "anything".to_string(),
                files: vec![],
            },
            &ChatHistory::new(),
        )
        .await;

    assert!(matches!(result, Err(QuerywaveError::MissingInput(_))));
}

#[tokio::test]
async fn test_followup_query_reuses_session_index() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let session = Uuid::new_v4();
    let history = ChatHistory::new();

    orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "first".to_string(),
                files: vec![text_file("notes.txt", "indexing happens exactly once")],
            },
            &history,
        )
        .await
        .unwrap();

    // No files this time: must hit the cached retriever
    let response = orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "indexing".to_string(),
                files: vec![],
            },
            &history,
        )
        .await
        .unwrap();

    match response {
        RagResponse::Document { sources, .. } => {
            assert!(sources.iter().all(|s| s.source == "notes.txt"));
        }
        other => panic!("expected document response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_new_upload_replaces_session_index() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let session = Uuid::new_v4();
    let history = ChatHistory::new();

    orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "first".to_string(),
                files: vec![text_file("old.txt", "obsolete content here")],
            },
            &history,
        )
        .await
        .unwrap();

    let response = orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "content".to_string(),
                files: vec![text_file("new.txt", "fresh content here")],
            },
            &history,
        )
        .await
        .unwrap();

    match response {
        RagResponse::Document { sources, .. } => {
            assert!(sources.iter().all(|s| s.source == "new.txt"));
        }
        other => panic!("expected document response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalidate_session_forces_reupload() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let session = Uuid::new_v4();
    let history = ChatHistory::new();

    orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "first".to_string(),
                files: vec![text_file("notes.txt", "some indexed text")],
            },
            &history,
        )
        .await
        .unwrap();

    orchestrator.invalidate_session(session);

    let result = orchestrator
        .execute(
            session,
            RagRequest::Document {
                query: "second".to_string(),
                files: vec![],
            },
            &history,
        )
        .await;

    assert!(matches!(result, Err(QuerywaveError::MissingInput(_))));
}

#[tokio::test]
async fn test_unsupported_upload_is_rejected() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let result = orchestrator
        .execute(
            Uuid::new_v4(),
            RagRequest::Document {
                query: "anything".to_string(),
                files: vec![UploadedFile::new("report.pdf", b"%PDF-1.4".to_vec())],
            },
            &ChatHistory::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(QuerywaveError::Source(SourceError::UnsupportedInput { .. }))
    ));
}

#[tokio::test]
async fn test_web_flow_carries_results() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let response = orchestrator
        .execute(
            Uuid::new_v4(),
            RagRequest::Web {
                query: "rust news".to_string(),
            },
            &ChatHistory::new(),
        )
        .await
        .unwrap();

    match response {
        RagResponse::Web { answer, results } => {
            assert_eq!(answer, "stub answer");
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].title, "result for rust news");
        }
        other => panic!("expected web response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_arxiv_paper_indexed_once_across_sessions() {
    let fetcher = Arc::new(StubFetcher::new());
    let mut orchestrator = orchestrator(Arc::new(StubGenerator::new()), Arc::clone(&fetcher));

    let history = ChatHistory::new();

    for _ in 0..2 {
        let response = orchestrator
            .execute(
                Uuid::new_v4(),
                RagRequest::Arxiv {
                    query: "attention mechanisms".to_string(),
                    paper_id: "1706.03762".to_string(),
                },
                &history,
            )
            .await
            .unwrap();

        match response {
            RagResponse::Arxiv {
                paper_id, sources, ..
            } => {
                assert_eq!(paper_id, "1706.03762");
                assert!(sources.iter().all(|s| s.source == "1706.03762"));
            }
            other => panic!("expected arXiv response, got {other:?}"),
        }
    }

    // Second request hits the paper-scoped cache
    assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_arxiv_unknown_paper_propagates_not_found() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let result = orchestrator
        .execute(
            Uuid::new_v4(),
            RagRequest::Arxiv {
                query: "anything".to_string(),
                paper_id: "0000.0000".to_string(),
            },
            &ChatHistory::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(QuerywaveError::Source(SourceError::PaperNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_arxiv_blank_paper_id_rejected() {
    let mut orchestrator =
        orchestrator(Arc::new(StubGenerator::new()), Arc::new(StubFetcher::new()));

    let result = orchestrator
        .execute(
            Uuid::new_v4(),
            RagRequest::Arxiv {
                query: "anything".to_string(),
                paper_id: "  ".to_string(),
            },
            &ChatHistory::new(),
        )
        .await;

    assert!(matches!(result, Err(QuerywaveError::MissingInput(_))));
}
