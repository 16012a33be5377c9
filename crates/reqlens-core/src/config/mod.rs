//! Configuration management
//!
//! Configuration is resolved once at process start (YAML file, then
//! environment overrides) and handed to the clients that need it. Vendor
//! credentials are optional: their absence is detected per call.

use crate::error::{ReqlensError, Result};
use crate::llm::{VendorKind, MAX_TOKENS_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat/completion vendors
    #[serde(default)]
    pub chat: ChatConfig,

    /// Embedding vendor
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Document analysis tuning
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,
}

/// Chat vendor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Vendor tried first when several have credentials
    #[serde(default = "default_preferred_vendor")]
    pub preferred: VendorKind,

    #[serde(default = "VendorConfig::anthropic")]
    pub anthropic: VendorConfig,

    #[serde(default = "VendorConfig::openai")]
    pub openai: VendorConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred_vendor(),
            anthropic: VendorConfig::anthropic(),
            openai: VendorConfig::openai(),
        }
    }
}

impl ChatConfig {
    /// Vendors in the order the gateway should consider them
    pub fn vendor_order(&self) -> [VendorKind; 2] {
        match self.preferred {
            VendorKind::Anthropic => [VendorKind::Anthropic, VendorKind::OpenAi],
            VendorKind::OpenAi => [VendorKind::OpenAi, VendorKind::Anthropic],
        }
    }

    pub fn vendor(&self, kind: VendorKind) -> &VendorConfig {
        match kind {
            VendorKind::Anthropic => &self.anthropic,
            VendorKind::OpenAi => &self.openai,
        }
    }

    /// Chat vendors that currently have a credential
    pub fn configured_vendors(&self) -> Vec<VendorKind> {
        self.vendor_order()
            .into_iter()
            .filter(|kind| self.vendor(*kind).has_credential())
            .collect()
    }
}

/// Connection settings for one chat vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// API key (optional; absence is detected per call)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the vendor API
    pub base_url: String,

    /// Default model for completions
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

impl VendorConfig {
    pub fn anthropic() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            timeout_secs: default_chat_timeout(),
        }
    }

    pub fn openai() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: default_chat_timeout(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Embedding vendor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API key; without one every batch uses synthetic vectors
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_embedding_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Length of every returned vector, vendor-backed or synthetic
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    /// Seed for reproducible synthetic vectors
    #[serde(default)]
    pub fallback_seed: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_embedding_url(),
            model: default_embedding_model(),
            dimensions: default_dimensions(),
            timeout_secs: default_embedding_timeout(),
            fallback_seed: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Document analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Character ceiling before the document is truncated
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    #[serde(default = "default_analysis_temperature")]
    pub temperature: f32,

    #[serde(default = "default_analysis_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            temperature: default_analysis_temperature(),
            max_tokens: default_analysis_max_tokens(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_preferred_vendor() -> VendorKind {
    VendorKind::Anthropic
}

fn default_chat_timeout() -> u64 {
    60
}

fn default_embedding_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_dimensions() -> usize {
    crate::embedding::DEFAULT_DIMENSIONS
}

fn default_embedding_timeout() -> u64 {
    30
}

fn default_max_input_chars() -> usize {
    crate::analysis::DEFAULT_MAX_INPUT_CHARS
}

fn default_analysis_temperature() -> f32 {
    0.1
}

fn default_analysis_max_tokens() -> u32 {
    4096
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Config {
    /// Load config from default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a specific path (missing file means defaults),
    /// then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml_str(&content)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without consulting the environment
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Overlay environment variables; empty values count as absent
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.chat.anthropic.api_key = Some(key);
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.chat.openai.api_key = Some(key.clone());
            if self.embedding.api_key.is_none() {
                self.embedding.api_key = Some(key);
            }
        }
        if let Some(key) = get("REQLENS_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(key);
        }
        if let Some(vendor) = get("REQLENS_CHAT_VENDOR") {
            match vendor.parse() {
                Ok(kind) => self.chat.preferred = kind,
                Err(e) => tracing::warn!("Ignoring REQLENS_CHAT_VENDOR: {}", e),
            }
        }
        if let Some(url) = get("REQLENS_ANTHROPIC_URL") {
            self.chat.anthropic.base_url = url;
        }
        if let Some(url) = get("REQLENS_OPENAI_URL") {
            self.chat.openai.base_url = url;
        }
        if let Some(url) = get("REQLENS_EMBEDDING_URL") {
            self.embedding.base_url = url;
        }
        if let Some(bind) = get("REQLENS_BIND") {
            self.server.bind = bind;
        }
    }

    /// Reject values no pipeline can work with
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimensions == 0 {
            return Err(ReqlensError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }
        if self.analysis.max_input_chars == 0 {
            return Err(ReqlensError::Config(
                "analysis.max_input_chars must be greater than zero".to_string(),
            ));
        }
        if self.analysis.max_tokens == 0 || self.analysis.max_tokens > MAX_TOKENS_LIMIT {
            return Err(ReqlensError::Config(format!(
                "analysis.max_tokens must be within 1..={MAX_TOKENS_LIMIT}, got {}",
                self.analysis.max_tokens
            )));
        }
        if !(0.0..=1.0).contains(&self.analysis.temperature) {
            return Err(ReqlensError::Config(format!(
                "analysis.temperature must be within [0, 1], got {}",
                self.analysis.temperature
            )));
        }
        Ok(())
    }

    /// Copy with every credential masked, safe to print
    pub fn redacted(&self) -> Self {
        fn mask(key: &mut Option<String>) {
            if key.is_some() {
                *key = Some("********".to_string());
            }
        }

        let mut copy = self.clone();
        mask(&mut copy.chat.anthropic.api_key);
        mask(&mut copy.chat.openai.api_key);
        mask(&mut copy.embedding.api_key);
        copy
    }
}
