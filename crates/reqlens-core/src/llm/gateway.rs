//! Vendor-agnostic message gateway
//!
//! Picks the first chat vendor with a credential (in configured preference
//! order), performs exactly one call, and maps the vendor's wire reply into
//! [`GenerationResponse`]. Vendor-specific fields stop here.

use super::anthropic::{AnthropicClient, ContentBlock, MessagesResponse};
use super::openai::{ChatCompletionResponse, OpenAiChatClient};
use super::{
    ChatGateway, FinishReason, GenerationConfig, GenerationRequest, GenerationResponse,
    TokenUsage, VendorKind,
};
use crate::config::ChatConfig;
use crate::error::{ReqlensError, Result};
use async_trait::async_trait;
use std::time::Instant;

/// Production [`ChatGateway`] backed by the configured vendors
pub struct MessageGateway {
    order: [VendorKind; 2],
    anthropic: AnthropicClient,
    openai: OpenAiChatClient,
}

impl MessageGateway {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        Ok(Self {
            order: config.vendor_order(),
            anthropic: AnthropicClient::new(config.anthropic.clone())?,
            openai: OpenAiChatClient::new(config.openai.clone())?,
        })
    }

    fn has_credential(&self, vendor: VendorKind) -> bool {
        match vendor {
            VendorKind::Anthropic => self.anthropic.has_credential(),
            VendorKind::OpenAi => self.openai.has_credential(),
        }
    }

    /// Vendor the next call would use, if any has a credential
    pub fn select_vendor(&self) -> Option<VendorKind> {
        self.order
            .into_iter()
            .find(|kind| self.has_credential(*kind))
    }

    /// Chat vendors with a credential, in preference order
    pub fn available_vendors(&self) -> Vec<VendorKind> {
        self.order
            .into_iter()
            .filter(|kind| self.has_credential(*kind))
            .collect()
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        request.validate()?;

        let vendor = self
            .select_vendor()
            .ok_or_else(|| ReqlensError::missing_credential("chat vendor"))?;

        let start = Instant::now();
        let response = match vendor {
            VendorKind::Anthropic => {
                normalize_anthropic(self.anthropic.create_message(request).await?)?
            }
            VendorKind::OpenAi => normalize_openai(self.openai.chat_completion(request).await?)?,
        };

        tracing::info!(
            vendor = %vendor,
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            finish_reason = ?response.finish_reason,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generation completed"
        );

        Ok(response)
    }
}

#[async_trait]
impl ChatGateway for MessageGateway {
    async fn send_message(
        &self,
        prompt: &str,
        options: &GenerationConfig,
    ) -> Result<GenerationResponse> {
        self.generate(&GenerationRequest::new(prompt, options.clone()))
            .await
    }
}

fn normalize_anthropic(reply: MessagesResponse) -> Result<GenerationResponse> {
    let content: String = reply
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
        .collect();

    if content.is_empty() && reply.stop_reason.is_none() {
        return Err(ReqlensError::VendorParse {
            vendor: VendorKind::Anthropic,
            message: "reply has neither text content nor a stop reason".to_string(),
        });
    }

    let finish_reason = match reply.stop_reason.as_deref() {
        Some("end_turn" | "stop_sequence" | "tool_use") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Error,
    };

    Ok(GenerationResponse {
        content,
        model: reply.model,
        usage: TokenUsage {
            input_tokens: reply.usage.input_tokens,
            output_tokens: reply.usage.output_tokens,
        },
        finish_reason,
        vendor: VendorKind::Anthropic,
    })
}

fn normalize_openai(reply: ChatCompletionResponse) -> Result<GenerationResponse> {
    let choice = reply
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ReqlensError::VendorParse {
            vendor: VendorKind::OpenAi,
            message: "reply contains no choices".to_string(),
        })?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        _ => FinishReason::Error,
    };
    let usage = reply.usage.unwrap_or_default();

    Ok(GenerationResponse {
        content: choice.message.content.unwrap_or_default(),
        model: reply.model,
        usage: TokenUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        },
        finish_reason,
        vendor: VendorKind::OpenAi,
    })
}
