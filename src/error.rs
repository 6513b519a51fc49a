use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the QueryWave retrieval core
///
/// The core never recovers locally: every failure propagates to the caller
/// as a typed variant so "no usable input", "index not built", and
/// "downstream generation failed" can be told apart without inspecting
/// message strings. Retry policy lives only in the network-facing
/// collaborators (`llm`, `sources`), never here.
#[derive(Error, Debug)]
pub enum QuerywaveError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Chunk geometry errors (overlap >= size)
    #[error(transparent)]
    Chunking(#[from] crate::chunking::ChunkingError),

    /// Embedding provider errors
    #[error(transparent)]
    Embedding(#[from] crate::embedding::EmbeddingError),

    /// Vector store errors (dimension mismatches included)
    #[error(transparent)]
    VectorStore(#[from] crate::embedding::VectorStoreError),

    /// Retrieval path errors (index-not-built included)
    #[error(transparent)]
    Retrieval(#[from] crate::retrieval::RetrievalError),

    /// Document loading and external fetching errors
    #[error(transparent)]
    Source(#[from] crate::sources::SourceError),

    /// Downstream LLM generation errors
    #[error(transparent)]
    Generation(#[from] crate::llm::GenerationError),

    /// A pipeline was invoked without the input its mode requires
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for QueryWave operations
pub type Result<T> = std::result::Result<T, QuerywaveError>;
