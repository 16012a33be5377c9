//! Mapping of pipeline errors onto HTTP responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqlens_core::ReqlensError;
use serde_json::{json, Map, Value};

/// Failure body returned by every API route:
/// `{ success: false, error, stage, details? }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    stage: &'static str,
    details: Option<Value>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }
}

impl From<ReqlensError> for ApiError {
    fn from(err: ReqlensError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let details = match &err {
            ReqlensError::VendorRequest { status, body, .. } => {
                let mut map = Map::new();
                if let Some(code) = status {
                    map.insert("status".to_string(), json!(code));
                }
                map.insert("body".to_string(), json!(body));
                Some(Value::Object(map))
            }
            ReqlensError::AnalysisSchema { raw_content, .. } => {
                Some(json!({ "rawContent": raw_content }))
            }
            _ => None,
        };

        Self {
            status,
            message: err.to_string(),
            stage: err.stage(),
            details,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
            stage: "input",
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(stage = self.stage, "Request failed: {}", self.message);
        } else {
            tracing::debug!(stage = self.stage, "Rejected request: {}", self.message);
        }

        let mut body = json!({
            "success": false,
            "error": self.message,
            "stage": self.stage,
        });
        if let (Some(details), Some(map)) = (self.details, body.as_object_mut()) {
            map.insert("details".to_string(), details);
        }

        (self.status, Json(body)).into_response()
    }
}
