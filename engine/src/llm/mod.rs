//! Inference Client Abstraction Layer
//!
//! The assistant talks to its language model through the [`InferenceClient`]
//! trait: one prompt in, one completion out. The client is constructed once at
//! startup and shared read-only between requests; there is no streaming,
//! retry or cancellation.

use async_trait::async_trait;
use sdk::EngineError;

pub mod ollama;

/// Result type for inference operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during inference
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<LLMError> for EngineError {
    fn from(err: LLMError) -> Self {
        EngineError::LLMProvider(err.to_string())
    }
}

/// A text-completion backend
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Returns the name of the backend (e.g., "ollama")
    fn name(&self) -> &str;

    /// Returns the model identifier the backend runs
    fn model(&self) -> &str;

    /// Send one prompt and return the model's completion text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is currently reachable
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }
}
