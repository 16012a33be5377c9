//! LLM integration
//!
//! Provides traits and implementations for:
//! - Typed vendor clients (Anthropic Messages, OpenAI-compatible chat and embeddings)
//! - A vendor-agnostic message gateway with normalized responses

mod anthropic;
mod gateway;
mod openai;
mod traits;
mod transport;
mod types;

pub use anthropic::{AnthropicClient, ANTHROPIC_VERSION};
pub use gateway::MessageGateway;
pub use openai::{ChatMessage, OpenAiChatClient, OpenAiEmbeddingClient};
pub use traits::*;
pub use types::*;
