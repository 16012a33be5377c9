//! Route definitions

use crate::gate;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

/// Upper bound on request bodies; documents beyond the analysis limit are
/// still accepted and truncated by the pipeline.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/embeddings", post(handlers::embeddings))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::enforce));

    Router::new()
        .merge(api)
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
