//! Shared HTTP plumbing for vendor clients

use super::VendorKind;
use crate::error::{ReqlensError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Vendor error bodies are kept for diagnostics but capped
const MAX_ERROR_BODY_CHARS: usize = 2000;

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(ReqlensError::Http)
}

/// Join a base URL and an API path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a prepared request and decode a 2xx body into the vendor's wire type.
///
/// 401/403 become `VendorAuth`, other non-success statuses and transport
/// failures become `VendorRequest`, undecodable success bodies `VendorParse`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    vendor: VendorKind,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ReqlensError::VendorRequest {
            vendor,
            status: e.status().map(|s| s.as_u16()),
            body: transport_message(&e),
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ReqlensError::VendorRequest {
            vendor,
            status: Some(status.as_u16()),
            body: transport_message(&e),
        })?;

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        tracing::warn!(vendor = %vendor, status = status.as_u16(), "Vendor rejected credential");
        return Err(ReqlensError::VendorAuth {
            vendor: Some(vendor),
            message: format!(
                "{vendor} rejected the credential (HTTP {}): {}",
                status.as_u16(),
                cap(&body)
            ),
        });
    }

    if !status.is_success() {
        tracing::warn!(vendor = %vendor, status = status.as_u16(), "Vendor request failed");
        return Err(ReqlensError::VendorRequest {
            vendor,
            status: Some(status.as_u16()),
            body: cap(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ReqlensError::VendorParse {
        vendor,
        message: e.to_string(),
    })
}

// Credentials travel in headers only, so the URL in reqwest's message is safe.
fn transport_message(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "transport error"
    };
    format!("{kind}: {e}")
}

fn cap(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut capped: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        capped.push_str("...");
        capped
    }
}
