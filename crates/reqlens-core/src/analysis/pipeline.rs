//! Document analysis pipeline

use super::prompt::{build_analysis_prompt, prepare_document, ANALYSIS_SYSTEM_PROMPT};
use super::schema::AnalysisResult;
use crate::config::AnalysisConfig;
use crate::error::{ReqlensError, Result};
use crate::llm::{ChatGateway, FinishReason, GenerationConfig, TokenUsage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Validated analysis plus what the caller needs to interpret it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub analysis: AnalysisResult,
    /// The document exceeded the character ceiling and was cut
    pub truncated: bool,
    pub original_length: usize,
    pub model: String,
    pub usage: TokenUsage,
    pub analyzed_at: DateTime<Utc>,
}

/// Turns raw document text into a validated [`AnalysisResult`] with one gateway call
pub struct DocumentAnalysisPipeline {
    gateway: Arc<dyn ChatGateway>,
    config: AnalysisConfig,
}

impl DocumentAnalysisPipeline {
    pub fn new(gateway: Arc<dyn ChatGateway>, config: AnalysisConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub async fn analyze(&self, extracted_text: &str) -> Result<DocumentAnalysis> {
        if extracted_text.trim().is_empty() {
            return Err(ReqlensError::InvalidInput(
                "extractedText must not be empty".to_string(),
            ));
        }

        let document = prepare_document(extracted_text, self.config.max_input_chars);
        if document.truncated {
            tracing::info!(
                original_chars = document.original_chars,
                max_chars = self.config.max_input_chars,
                "Document exceeds ceiling, truncating"
            );
        }

        let prompt = build_analysis_prompt(&document.text);
        let options = GenerationConfig::new(self.config.max_tokens, self.config.temperature)
            .with_system(ANALYSIS_SYSTEM_PROMPT);

        let response = self.gateway.send_message(&prompt, &options).await?;

        let analysis = AnalysisResult::from_model_output(&response.content).map_err(|e| {
            match (e, response.finish_reason) {
                (ReqlensError::AnalysisSchema { message, raw_content }, FinishReason::Length) => {
                    ReqlensError::AnalysisSchema {
                        message: format!("{message} (model output was cut off at the token limit)"),
                        raw_content,
                    }
                }
                (other, _) => other,
            }
        })?;

        tracing::info!(
            model = %response.model,
            functional = analysis.functional_requirements.len(),
            non_functional = analysis.non_functional_requirements.len(),
            risks = analysis.risk_factors.len(),
            confidence = analysis.confidence_score,
            truncated = document.truncated,
            "Document analysis completed"
        );

        Ok(DocumentAnalysis {
            analysis,
            truncated: document.truncated,
            original_length: document.original_chars,
            model: response.model,
            usage: response.usage,
            analyzed_at: Utc::now(),
        })
    }
}
