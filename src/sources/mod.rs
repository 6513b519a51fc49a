//! External content sources
//!
//! Uploaded-file loading plus the network collaborators (arXiv metadata
//! fetch, DuckDuckGo web search). Network collaborators live behind traits
//! so the pipeline can run against stubs in tests.

mod arxiv;
mod loader;
mod web;

pub use arxiv::ArxivFetcher;
pub use loader::load_documents;
pub use web::DuckDuckGoSearch;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Unsupported file type: {source_name}")]
    UnsupportedInput { source_name: String },

    #[error("No text extracted from {source_name}")]
    EmptyDocument { source_name: String },

    #[error("No paper found with ID {id}")]
    PaperNotFound { id: String },

    #[error("File {source_name} is not valid UTF-8")]
    Decode { source_name: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A file handed to the document pipeline, name plus raw bytes
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A single web search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Fetches the text of a paper by its arXiv identifier
#[async_trait]
pub trait PaperFetcher: Send + Sync {
    async fn fetch(&self, paper_id: &str) -> Result<String, SourceError>;
}

/// Searches the web for a query
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, SourceError>;
}
