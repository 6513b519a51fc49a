//! Ollama generation client

use crate::config::LlmConfig;
use crate::llm::{GenerationError, Generator};
use async_trait::async_trait;
use std::time::Duration;

const RETRY_BASE_DELAY_SECS: u64 = 1;
const RETRY_BACKOFF_FACTOR: u64 = 2;

/// Non-streaming client for the Ollama `/api/generate` endpoint
///
/// Transient HTTP failures are retried with exponential backoff
/// (`max_retries` attempts, 1s base delay, doubling). Timeouts and empty
/// responses are terminal: retrying a slow model or a model that answered
/// with nothing does not help.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_retries: u32,
}

impl OllamaGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        tracing::info!(model = %config.model, "Ollama generator initialized");

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "temperature": self.temperature,
                "stream": false,
            }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Http(e.to_string())
                }
            })?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let answer = body
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        if answer.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(answer)
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut delay = Duration::from_secs(RETRY_BASE_DELAY_SECS);

        for attempt in 1..=self.max_retries {
            match self.generate_once(prompt).await {
                Ok(answer) => return Ok(answer),
                Err(GenerationError::Http(message)) if attempt < self.max_retries => {
                    tracing::warn!(attempt, %message, "generation attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= RETRY_BACKOFF_FACTOR as u32;
                }
                Err(e) => return Err(e),
            }
        }

        // max_retries is validated to be at least 1
        Err(GenerationError::Http("retries exhausted".to_string()))
    }
}
