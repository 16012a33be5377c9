//! Reqlens Core Library
//!
//! Turns unstructured document text into validated requirement analyses and
//! vector embeddings by orchestrating external AI vendors.
//!
//! # Features
//! - Typed clients for Anthropic and OpenAI-compatible APIs
//! - Vendor-agnostic message gateway with normalized responses
//! - Schema-constrained document analysis with all-or-nothing validation
//! - Batched embeddings with synthetic fallback when the vendor is unavailable

pub mod analysis;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod services;

pub use analysis::{
    extract_json_object, AnalysisResult, DocumentAnalysis, DocumentAnalysisPipeline, Level,
};
pub use config::{AnalysisConfig, ChatConfig, Config, EmbeddingConfig, ServerConfig, VendorConfig};
pub use embedding::{EmbeddingBatchResult, EmbeddingPipeline, SyntheticEmbedder};
pub use error::{Error, ReqlensError, Result};
pub use llm::{
    ChatGateway, Embedder, FinishReason, GenerationConfig, GenerationRequest, GenerationResponse,
    MessageGateway, TokenUsage, VendorKind,
};
pub use services::Pipelines;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "reqlens";
