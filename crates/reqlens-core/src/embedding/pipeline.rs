//! Embedding pipeline with synthetic fallback

use super::fallback::{approximate_usage, SyntheticEmbedder, FALLBACK_MODEL};
use crate::config::EmbeddingConfig;
use crate::error::{ReqlensError, Result};
use crate::llm::{Embedder, OpenAiEmbeddingClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingUsage {
    pub total_tokens: u32,
}

/// Vectors for one batch, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingBatchResult {
    pub embeddings: Vec<Vec<f32>>,
    pub model: String,
    pub usage: EmbeddingUsage,
    /// Vectors are synthetic; do not use them for similarity search
    pub fallback: bool,
}

/// Maps texts to fixed-length vectors, never failing on vendor problems.
///
/// Vendor-backed when an embedder is configured; otherwise, or when the vendor
/// call fails for any reason, every vector is synthetic and `fallback` is set.
pub struct EmbeddingPipeline {
    vendor: Option<Arc<dyn Embedder>>,
    synthetic: SyntheticEmbedder,
}

impl EmbeddingPipeline {
    pub fn new(vendor: Option<Arc<dyn Embedder>>, synthetic: SyntheticEmbedder) -> Self {
        Self { vendor, synthetic }
    }

    /// Build from configuration; the vendor branch exists only when a key is configured
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let vendor: Option<Arc<dyn Embedder>> = if config.has_credential() {
            Some(Arc::new(OpenAiEmbeddingClient::new(config.clone())?))
        } else {
            None
        };
        Ok(Self::new(
            vendor,
            SyntheticEmbedder::new(config.dimensions, config.fallback_seed),
        ))
    }

    pub fn has_vendor(&self) -> bool {
        self.vendor.is_some()
    }

    pub fn dimensions(&self) -> usize {
        self.synthetic.dimensions()
    }

    pub async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatchResult> {
        if texts.is_empty() {
            return Err(ReqlensError::InvalidInput(
                "texts must contain at least one entry".to_string(),
            ));
        }

        let Some(vendor) = &self.vendor else {
            tracing::warn!(
                inputs = texts.len(),
                "No embedding credential configured, using synthetic vectors"
            );
            return Ok(self.synthetic_batch(texts));
        };

        match vendor.embed_batch(texts).await {
            Ok(batch) if self.is_shape_correct(&batch.embeddings, texts.len()) => {
                tracing::info!(
                    model = %batch.model,
                    inputs = texts.len(),
                    total_tokens = batch.total_tokens,
                    "Embedding batch completed"
                );
                Ok(EmbeddingBatchResult {
                    embeddings: batch.embeddings,
                    model: batch.model,
                    usage: EmbeddingUsage {
                        total_tokens: batch.total_tokens,
                    },
                    fallback: false,
                })
            }
            Ok(batch) => {
                tracing::warn!(
                    model = %batch.model,
                    returned = batch.embeddings.len(),
                    expected = texts.len(),
                    "Embedding vendor returned wrong shape, using synthetic vectors"
                );
                Ok(self.synthetic_batch(texts))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    stage = e.stage(),
                    inputs = texts.len(),
                    "Embedding vendor failed, using synthetic vectors"
                );
                Ok(self.synthetic_batch(texts))
            }
        }
    }

    fn is_shape_correct(&self, embeddings: &[Vec<f32>], expected: usize) -> bool {
        embeddings.len() == expected
            && embeddings
                .iter()
                .all(|v| v.len() == self.synthetic.dimensions())
    }

    fn synthetic_batch(&self, texts: &[String]) -> EmbeddingBatchResult {
        EmbeddingBatchResult {
            embeddings: self.synthetic.generate(texts.len()),
            model: FALLBACK_MODEL.to_string(),
            usage: EmbeddingUsage {
                total_tokens: approximate_usage(texts),
            },
            fallback: true,
        }
    }
}
