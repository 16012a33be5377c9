//! OpenAI-compatible clients (OpenAI, vLLM, and other compatible services)

use super::transport::{build_http_client, endpoint, send_json};
use super::{EmbeddingBatch, Embedder, GenerationRequest, VendorKind};
use crate::config::{EmbeddingConfig, VendorConfig};
use crate::error::{ReqlensError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// `POST /v1/chat/completions` request body
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// `POST /v1/chat/completions` success body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Typed client for OpenAI-compatible chat completions
pub struct OpenAiChatClient {
    http_client: reqwest::Client,
    config: VendorConfig,
}

impl OpenAiChatClient {
    pub fn new(config: VendorConfig) -> Result<Self> {
        let http_client = build_http_client(config.timeout_secs)?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.config.has_credential()
    }

    pub fn default_model(&self) -> &str {
        &self.config.model
    }

    pub async fn chat_completion(
        &self,
        request: &GenerationRequest,
    ) -> Result<ChatCompletionResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ReqlensError::missing_credential("openai"))?;

        let settings = &request.settings;
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &settings.system {
            messages.push(ChatMessage::system(system.as_str()));
        }
        messages.push(ChatMessage::user(request.prompt.as_str()));

        let body = ChatCompletionRequest {
            model: settings.model.as_deref().unwrap_or(&self.config.model),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };

        let url = endpoint(&self.config.base_url, "v1/chat/completions");
        tracing::debug!(model = body.model, max_tokens = body.max_tokens, "POST {}", url);

        let req = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body);

        send_json(VendorKind::OpenAi, req).await
    }
}

/// `POST /v1/embeddings` request body
#[derive(Debug, Serialize)]
pub struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

/// `POST /v1/embeddings` success body
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    /// Position of the input this vector belongs to
    pub index: Option<usize>,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingUsage {
    #[serde(default)]
    pub total_tokens: u32,
}

/// Typed client for OpenAI-compatible embeddings
pub struct OpenAiEmbeddingClient {
    http_client: reqwest::Client,
    config: EmbeddingConfig,
}

impl OpenAiEmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let http_client = build_http_client(config.timeout_secs)?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Raw vendor reply for one batched request
    pub async fn create_embeddings(&self, texts: &[String]) -> Result<EmbeddingResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ReqlensError::missing_credential("embedding"))?;

        let body = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let url = endpoint(&self.config.base_url, "v1/embeddings");
        tracing::debug!(model = body.model, inputs = texts.len(), "POST {}", url);

        let req = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body);

        send_json(VendorKind::OpenAi, req).await
    }
}

#[async_trait]
impl Embedder for OpenAiEmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let response = self.create_embeddings(texts).await?;
        order_embeddings(response, texts.len(), self.config.dimensions, &self.config.model)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Place each returned vector at its input position and check the shape
fn order_embeddings(
    response: EmbeddingResponse,
    expected: usize,
    dimensions: usize,
    default_model: &str,
) -> Result<EmbeddingBatch> {
    let malformed = |message: String| ReqlensError::VendorParse {
        vendor: VendorKind::OpenAi,
        message,
    };

    if response.data.len() != expected {
        return Err(malformed(format!(
            "expected {} embeddings, got {}",
            expected,
            response.data.len()
        )));
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for (position, item) in response.data.into_iter().enumerate() {
        let index = item.index.unwrap_or(position);
        if item.embedding.len() != dimensions {
            return Err(malformed(format!(
                "embedding {} has {} components, expected {}",
                index,
                item.embedding.len(),
                dimensions
            )));
        }
        let Some(slot) = slots.get_mut(index) else {
            return Err(malformed(format!("embedding index {index} out of range")));
        };
        if slot.is_some() {
            return Err(malformed(format!("duplicate embedding index {index}")));
        }
        *slot = Some(item.embedding);
    }

    let embeddings = slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| malformed("missing embedding index".to_string()))?;

    Ok(EmbeddingBatch {
        embeddings,
        model: response
            .model
            .unwrap_or_else(|| default_model.to_string()),
        total_tokens: response.usage.unwrap_or_default().total_tokens,
    })
}
