//! HTTP request handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use reqlens_core::{DocumentAnalysis, EmbeddingBatchResult, VendorKind};
use serde::{Deserialize, Serialize};

/// POST /api/analyze payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub extracted_text: String,
}

/// POST /api/embeddings payload
#[derive(Debug, Deserialize)]
pub struct EmbeddingsRequest {
    pub texts: Vec<String>,
}

/// Successful body: `{ success: true, ...data }`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

impl<T> Success<T> {
    fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub chat_vendors: Vec<VendorKind>,
    pub embedding_vendor: bool,
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Success<DocumentAnalysis>>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(
        chars = request.extracted_text.chars().count(),
        "Analyze request"
    );

    let result = state
        .pipelines
        .analysis
        .analyze(&request.extracted_text)
        .await?;
    Ok(Success::new(result))
}

pub async fn embeddings(
    State(state): State<AppState>,
    payload: Result<Json<EmbeddingsRequest>, JsonRejection>,
) -> Result<Json<Success<EmbeddingBatchResult>>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(texts = request.texts.len(), "Embeddings request");

    let result = state.pipelines.embedding.embed(&request.texts).await?;
    Ok(Success::new(result))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        chat_vendors: state.pipelines.chat_vendors(),
        embedding_vendor: state.pipelines.embedding.has_vendor(),
    })
}
