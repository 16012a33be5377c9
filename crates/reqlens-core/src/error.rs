//! Error types for reqlens

use crate::llm::VendorKind;
use thiserror::Error;

/// Result type alias using ReqlensError
pub type Result<T> = std::result::Result<T, ReqlensError>;

/// Error type alias for convenience
pub type Error = ReqlensError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const VENDOR_ERROR: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for reqlens
#[derive(Debug, Error)]
pub enum ReqlensError {
    /// No credential configured for any usable vendor, or the vendor rejected it.
    #[error("Vendor authentication error: {message}")]
    VendorAuth {
        vendor: Option<VendorKind>,
        message: String,
    },

    /// Vendor answered with a non-success status, or could not be reached at all.
    #[error("{vendor} request failed{}: {body}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    VendorRequest {
        vendor: VendorKind,
        status: Option<u16>,
        body: String,
    },

    /// Vendor answered 2xx but the body did not match its wire format.
    #[error("{vendor} response could not be decoded: {message}")]
    VendorParse { vendor: VendorKind, message: String },

    /// Model output failed JSON or schema validation.
    #[error("Analysis schema error: {message}")]
    AnalysisSchema { message: String, raw_content: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ReqlensError {
    pub(crate) fn missing_credential(what: &str) -> Self {
        Self::VendorAuth {
            vendor: None,
            message: format!("no {what} credential configured"),
        }
    }

    pub(crate) fn schema(message: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self::AnalysisSchema {
            message: message.into(),
            raw_content: raw_content.into(),
        }
    }

    /// Pipeline stage the error belongs to, as reported to API callers
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "input",
            Self::VendorAuth { .. } => "vendor_auth",
            Self::VendorRequest { .. } => "vendor_request",
            Self::VendorParse { .. } => "vendor_parse",
            Self::AnalysisSchema { .. } => "analysis_schema",
            _ => "internal",
        }
    }

    /// Whether the caller is at fault (maps to a 400-class response)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) | Self::Config(_) | Self::Yaml(_) => exit_codes::INVALID_INPUT,
            Self::VendorAuth { .. }
            | Self::VendorRequest { .. }
            | Self::VendorParse { .. }
            | Self::AnalysisSchema { .. } => exit_codes::VENDOR_ERROR,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_request_display_includes_status() {
        let err = ReqlensError::VendorRequest {
            vendor: VendorKind::Anthropic,
            status: Some(503),
            body: "overloaded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "anthropic request failed (HTTP 503): overloaded"
        );

        let err = ReqlensError::VendorRequest {
            vendor: VendorKind::OpenAi,
            status: None,
            body: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "openai request failed: connection refused");
    }

    #[test]
    fn test_stage_and_client_error() {
        let err = ReqlensError::InvalidInput("empty".into());
        assert_eq!(err.stage(), "input");
        assert!(err.is_client_error());
        assert_eq!(err.exit_code(), exit_codes::INVALID_INPUT);

        let err = ReqlensError::schema("missing field", "{}");
        assert_eq!(err.stage(), "analysis_schema");
        assert!(!err.is_client_error());
        assert_eq!(err.exit_code(), exit_codes::VENDOR_ERROR);

        let err = crate::config::Config::from_yaml_str("chat: [unterminated").unwrap_err();
        assert!(matches!(err, ReqlensError::Yaml(_)));
        assert_eq!(err.exit_code(), exit_codes::INVALID_INPUT);

        let err = ReqlensError::missing_credential("chat vendor");
        assert_eq!(err.stage(), "vendor_auth");
        assert!(err.to_string().contains("no chat vendor credential"));
    }
}
