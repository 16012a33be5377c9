//! LLM trait definitions

use super::{GenerationConfig, GenerationResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Vendor-agnostic chat completion
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send a single prompt and return the normalized reply
    async fn send_message(
        &self,
        prompt: &str,
        options: &GenerationConfig,
    ) -> Result<GenerationResponse>;
}

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of texts, one vector per input in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Vectors returned by an embedding vendor for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingBatch {
    pub embeddings: Vec<Vec<f32>>,
    pub model: String,
    pub total_tokens: u32,
}
