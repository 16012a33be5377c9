//! Anthropic Messages API client

use super::transport::{build_http_client, endpoint, send_json};
use super::{GenerationRequest, VendorKind};
use crate::config::VendorConfig;
use crate::error::{ReqlensError, Result};
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// `POST /v1/messages` request body
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: Vec<MessageParam<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MessageParam<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// `POST /v1/messages` success body
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: MessagesUsage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Typed client for the Anthropic Messages API
pub struct AnthropicClient {
    http_client: reqwest::Client,
    config: VendorConfig,
}

impl AnthropicClient {
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

    /// Send one user turn and return the raw Messages API reply
    pub async fn create_message(&self, request: &GenerationRequest) -> Result<MessagesResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ReqlensError::missing_credential("anthropic"))?;

        let settings = &request.settings;
        let body = MessagesRequest {
            model: settings.model.as_deref().unwrap_or(&self.config.model),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            system: settings.system.as_deref(),
            messages: vec![MessageParam {
                role: "user",
                content: &request.prompt,
            }],
        };

        let url = endpoint(&self.config.base_url, "v1/messages");
        tracing::debug!(model = body.model, max_tokens = body.max_tokens, "POST {}", url);

        let req = self
            .http_client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        send_json(VendorKind::Anthropic, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationConfig;
    use serde_json::json;

    fn config(base_url: String, api_key: Option<&str>) -> VendorConfig {
        VendorConfig {
            api_key: api_key.map(String::from),
            base_url,
            model: "claude-test".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_decode_mixed_content_blocks() {
        let body = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-test",
            "content": [
                {"type": "text", "text": "Hello"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": " world"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 4}
        });
        let parsed: MessagesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.content.len(), 3);
        assert!(matches!(parsed.content[1], ContentBlock::Other));
        assert_eq!(parsed.usage.output_tokens, 4);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Unroutable base URL: a network attempt would surface as VendorRequest
        let client = AnthropicClient::new(config("http://127.0.0.1:9".to_string(), None)).unwrap();
        let request = GenerationRequest::new("ping", GenerationConfig::new(10, 0.1));
        let err = client.create_message(&request).await.unwrap_err();
        assert!(matches!(err, ReqlensError::VendorAuth { .. }));
    }

    #[tokio::test]
    async fn test_sends_vendor_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "override-model",
                "max_tokens": 10,
                "system": "be brief",
                "messages": [{"role": "user", "content": "ping"}]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "model": "override-model",
                    "content": [{"type": "text", "text": "pong"}],
                    "stop_reason": "end_turn",
                    "usage": {"input_tokens": 3, "output_tokens": 1}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = AnthropicClient::new(config(server.url(), Some("test-key"))).unwrap();
        let settings = GenerationConfig::new(10, 0.1)
            .with_system("be brief")
            .with_model("override-model");
        let reply = client
            .create_message(&GenerationRequest::new("ping", settings))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.model, "override-model");
        assert_eq!(reply.stop_reason.as_deref(), Some("end_turn"));
    }
}
