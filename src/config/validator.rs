use crate::config::Config;
use crate::error::{QuerywaveError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_chunking(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_indexing(config, &mut errors);
        Self::validate_retrieval(config, &mut errors);
        Self::validate_memory(config, &mut errors);
        Self::validate_llm(config, &mut errors);
        Self::validate_sources(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(QuerywaveError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_chunking(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.chunking.chunk_size == 0 {
            errors.push(ValidationError::new(
                "chunking.chunk_size",
                "Chunk size must be greater than 0",
            ));
        }

        // Equal or larger overlap would stop the window from ever advancing
        if config.chunking.chunk_overlap >= config.chunking.chunk_size {
            errors.push(ValidationError::new(
                "chunking.chunk_overlap",
                format!(
                    "Chunk overlap ({}) must be smaller than chunk size ({})",
                    config.chunking.chunk_overlap, config.chunking.chunk_size
                ),
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.embedding.model.is_empty() {
            errors.push(ValidationError::new(
                "embedding.model",
                "Model name cannot be empty",
            ));
        }

        if config.embedding.batch_size == 0 {
            errors.push(ValidationError::new(
                "embedding.batch_size",
                "Batch size must be greater than 0",
            ));
        }

        if config.embedding.dimension == 0 {
            errors.push(ValidationError::new(
                "embedding.dimension",
                "Embedding dimension must be greater than 0",
            ));
        }
    }

    fn validate_indexing(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.indexing.vector_dim != config.embedding.dimension {
            errors.push(ValidationError::new(
                "indexing.vector_dim",
                format!(
                    "Vector dimension ({}) must match embedding dimension ({})",
                    config.indexing.vector_dim, config.embedding.dimension
                ),
            ));
        }
    }

    fn validate_retrieval(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.retrieval.top_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.top_k",
                "top_k must be greater than 0",
            ));
        }
    }

    fn validate_memory(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.memory.max_turns == 0 {
            errors.push(ValidationError::new(
                "memory.max_turns",
                "max_turns must be greater than 0",
            ));
        }
    }

    fn validate_llm(config: &Config, errors: &mut Vec<ValidationError>) {
        let temp = config.llm.temperature;
        if !(0.0..=2.0).contains(&temp) {
            errors.push(ValidationError::new(
                "llm.temperature",
                format!("Temperature must be between 0.0 and 2.0, got {}", temp),
            ));
        }

        if config.llm.base_url.is_empty() {
            errors.push(ValidationError::new(
                "llm.base_url",
                "Base URL cannot be empty",
            ));
        }

        if config.llm.max_retries == 0 {
            errors.push(ValidationError::new(
                "llm.max_retries",
                "max_retries must be at least 1",
            ));
        }
    }

    fn validate_sources(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.sources.arxiv_base_url.is_empty() {
            errors.push(ValidationError::new(
                "sources.arxiv_base_url",
                "arXiv base URL cannot be empty",
            ));
        }

        if config.sources.web_max_results == 0 {
            errors.push(ValidationError::new(
                "sources.web_max_results",
                "web_max_results must be greater than 0",
            ));
        }
    }
}
