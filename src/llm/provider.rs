use async_trait::async_trait;

use super::error::{EmbeddingError, GenerationError};
use super::types::{ChatRequest, EmbeddingVector};

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// chat completion (non-streaming), returns the first choice's text
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, GenerationError>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model_name(&self) -> &str;

    /// embed a single text; callers pass non-empty input
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;
}
