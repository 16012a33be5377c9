//! Wiring of configured clients into ready-to-use pipelines

use crate::analysis::DocumentAnalysisPipeline;
use crate::config::Config;
use crate::embedding::EmbeddingPipeline;
use crate::error::Result;
use crate::llm::{MessageGateway, VendorKind};
use std::sync::Arc;

/// Pipelines built once at startup and shared by every request
#[derive(Clone)]
pub struct Pipelines {
    pub gateway: Arc<MessageGateway>,
    pub analysis: Arc<DocumentAnalysisPipeline>,
    pub embedding: Arc<EmbeddingPipeline>,
}

impl Pipelines {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = Arc::new(MessageGateway::new(&config.chat)?);
        let analysis = Arc::new(DocumentAnalysisPipeline::new(
            gateway.clone(),
            config.analysis.clone(),
        ));
        let embedding = Arc::new(EmbeddingPipeline::from_config(&config.embedding)?);

        let chat_vendors = gateway.available_vendors();
        if chat_vendors.is_empty() {
            tracing::warn!("No chat vendor credential configured; analysis requests will fail");
        }
        if !embedding.has_vendor() {
            tracing::warn!("No embedding credential configured; embeddings will be synthetic");
        }
        tracing::info!(
            chat_vendors = ?chat_vendors,
            embedding_vendor = embedding.has_vendor(),
            "Pipelines initialized"
        );

        Ok(Self {
            gateway,
            analysis,
            embedding,
        })
    }

    /// Chat vendors with a credential, in preference order
    pub fn chat_vendors(&self) -> Vec<VendorKind> {
        self.gateway.available_vendors()
    }
}
