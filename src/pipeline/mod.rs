//! Request orchestration
//!
//! Routes a [`RagRequest`] to its pipeline (document, web, or arXiv), runs
//! retrieval where the mode calls for it, and hands the assembled context to
//! the generator. All collaborators are injected; nothing here holds global
//! state.

use crate::chunking::{chunk_documents, Document};
use crate::config::Config;
use crate::context::{ContextBuilder, RetrievalData};
use crate::embedding::EmbeddingProvider;
use crate::error::{QuerywaveError, Result};
use crate::llm::{render_prompt, Generator};
use crate::memory::ChatHistory;
use crate::retrieval::{DocumentRetriever, RetrievedChunk};
use crate::sources::{load_documents, PaperFetcher, UploadedFile, WebResult, WebSearch};
use ahash::AHashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A routed request, tagged by pipeline mode
#[derive(Debug, Clone)]
pub enum RagRequest {
    Document {
        query: String,
        files: Vec<UploadedFile>,
    },
    Web {
        query: String,
    },
    Arxiv {
        query: String,
        paper_id: String,
    },
}

impl RagRequest {
    pub fn query(&self) -> &str {
        match self {
            RagRequest::Document { query, .. }
            | RagRequest::Web { query }
            | RagRequest::Arxiv { query, .. } => query,
        }
    }
}

/// A pipeline answer, tagged to match the request mode
#[derive(Debug, Clone)]
pub enum RagResponse {
    Document {
        answer: String,
        sources: Vec<RetrievedChunk>,
    },
    Web {
        answer: String,
        results: Vec<WebResult>,
    },
    Arxiv {
        answer: String,
        paper_id: String,
        sources: Vec<RetrievedChunk>,
    },
}

/// Cache key for built retrievers
///
/// Session-scoped for uploaded documents, paper-scoped for arXiv so a paper
/// indexed once serves every session that asks about it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RetrieverKey {
    Session(Uuid),
    Paper(String),
}

/// Indexed-retriever cache
///
/// Indexing is the expensive step (embedding every chunk), so built
/// retrievers are kept and reused until invalidated.
#[derive(Default)]
pub struct RetrieverCache {
    retrievers: AHashMap<RetrieverKey, Arc<DocumentRetriever>>,
}

impl RetrieverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RetrieverKey) -> Option<Arc<DocumentRetriever>> {
        self.retrievers.get(key).cloned()
    }

    pub fn insert(&mut self, key: RetrieverKey, retriever: Arc<DocumentRetriever>) {
        self.retrievers.insert(key, retriever);
    }

    /// Drop the session's document retriever, forcing a rebuild on the next
    /// document request. Paper-scoped entries are untouched.
    pub fn invalidate_session(&mut self, session_id: Uuid) {
        if self.retrievers.remove(&RetrieverKey::Session(session_id)).is_some() {
            tracing::info!(%session_id, "session retriever invalidated");
        }
    }

    pub fn len(&self) -> usize {
        self.retrievers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retrievers.is_empty()
    }
}

/// Pipeline orchestrator
///
/// Owns the retriever cache and the injected collaborators. One instance
/// serves many sessions; chat history stays with the caller and is passed
/// per request.
pub struct Orchestrator {
    config: Config,
    provider: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn Generator>,
    paper_fetcher: Arc<dyn PaperFetcher>,
    web_search: Arc<dyn WebSearch>,
    context_builder: ContextBuilder,
    cache: RetrieverCache,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        provider: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn Generator>,
        paper_fetcher: Arc<dyn PaperFetcher>,
        web_search: Arc<dyn WebSearch>,
    ) -> Self {
        let context_builder = ContextBuilder::new(config.memory.max_turns);
        Self {
            config,
            provider,
            generator,
            paper_fetcher,
            web_search,
            context_builder,
            cache: RetrieverCache::new(),
        }
    }

    /// Forget the session's indexed documents (new upload, session reset)
    pub fn invalidate_session(&mut self, session_id: Uuid) {
        self.cache.invalidate_session(session_id);
    }

    /// Execute one request end to end
    pub async fn execute(
        &mut self,
        session_id: Uuid,
        request: RagRequest,
        history: &ChatHistory,
    ) -> Result<RagResponse> {
        match request {
            RagRequest::Document { query, files } => {
                self.execute_document(session_id, &query, &files, history).await
            }
            RagRequest::Web { query } => self.execute_web(&query, history).await,
            RagRequest::Arxiv { query, paper_id } => {
                self.execute_arxiv(&query, &paper_id, history).await
            }
        }
    }

    async fn execute_document(
        &mut self,
        session_id: Uuid,
        query: &str,
        files: &[UploadedFile],
        history: &ChatHistory,
    ) -> Result<RagResponse> {
        let key = RetrieverKey::Session(session_id);

        // A new upload replaces whatever this session had indexed before
        let retriever = if files.is_empty() {
            self.cache.get(&key).ok_or_else(|| {
                QuerywaveError::MissingInput(
                    "document mode needs uploaded files before the first query".to_string(),
                )
            })?
        } else {
            tracing::info!(%session_id, "building document retriever");

            let documents = load_documents(files)?;
            let retriever = Arc::new(self.build_retriever(&documents)?);
            self.cache.insert(key, Arc::clone(&retriever));
            retriever
        };

        let chunks = retriever.retrieve(query, self.config.retrieval.top_k)?;

        let context = self.context_builder.build(
            query,
            history.messages(),
            Some(RetrievalData::Documents {
                chunks: chunks.clone(),
            }),
        );

        let answer = self.generator.generate(&render_prompt(&context)).await?;

        Ok(RagResponse::Document {
            answer,
            sources: chunks,
        })
    }

    async fn execute_web(&self, query: &str, history: &ChatHistory) -> Result<RagResponse> {
        let results = self.web_search.search(query).await?;

        let context = self.context_builder.build(
            query,
            history.messages(),
            Some(RetrievalData::Web {
                results: results.clone(),
            }),
        );

        let answer = self.generator.generate(&render_prompt(&context)).await?;

        Ok(RagResponse::Web { answer, results })
    }

    async fn execute_arxiv(
        &mut self,
        query: &str,
        paper_id: &str,
        history: &ChatHistory,
    ) -> Result<RagResponse> {
        if paper_id.trim().is_empty() {
            return Err(QuerywaveError::MissingInput(
                "arXiv mode needs a paper ID".to_string(),
            ));
        }

        let key = RetrieverKey::Paper(paper_id.to_string());

        let retriever = match self.cache.get(&key) {
            Some(retriever) => retriever,
            None => {
                tracing::info!(paper_id, "building retriever for arXiv paper");

                let text = self.paper_fetcher.fetch(paper_id).await?;
                let documents = vec![Document::new(paper_id, &text)];
                let retriever = Arc::new(self.build_retriever(&documents)?);
                self.cache.insert(key, Arc::clone(&retriever));
                retriever
            }
        };

        let chunks = retriever.retrieve(query, self.config.retrieval.top_k)?;

        let context = self.context_builder.build(
            query,
            history.messages(),
            Some(RetrievalData::Arxiv {
                paper_id: paper_id.to_string(),
                chunks: chunks.clone(),
            }),
        );

        let answer = self.generator.generate(&render_prompt(&context)).await?;

        Ok(RagResponse::Arxiv {
            answer,
            paper_id: paper_id.to_string(),
            sources: chunks,
        })
    }

    fn build_retriever(&self, documents: &[Document]) -> Result<DocumentRetriever> {
        let chunks = chunk_documents(
            documents,
            self.config.chunking.chunk_size,
            self.config.chunking.chunk_overlap,
        )?;

        let mut retriever =
            DocumentRetriever::new(Arc::clone(&self.provider), self.config.indexing.clone());
        retriever.index_chunks(&chunks)?;

        Ok(retriever)
    }
}
