//! Rate limit gate applied in front of the API routes

use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Admission check run before any pipeline work.
///
/// Any status other than 200 OK rejects the request, and the returned
/// response is sent to the caller unchanged.
#[async_trait]
pub trait RateLimitGate: Send + Sync {
    async fn check(&self, parts: &Parts) -> Response;
}

/// Gate that admits every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl RateLimitGate for AllowAll {
    async fn check(&self, _parts: &Parts) -> Response {
        StatusCode::OK.into_response()
    }
}

pub(crate) async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let verdict = state.gate.check(&parts).await;

    if verdict.status() != StatusCode::OK {
        tracing::info!(
            path = parts.uri.path(),
            status = verdict.status().as_u16(),
            "Request rejected by rate limit gate"
        );
        return verdict;
    }

    next.run(Request::from_parts(parts, body)).await
}
