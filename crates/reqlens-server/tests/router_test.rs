//! Router tests driven through tower's oneshot

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{request::Parts, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use mockito::{Matcher, Server};
use reqlens_core::{Config, Pipelines};
use reqlens_server::{create_router, AppState, RateLimitGate};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

fn offline_config() -> Config {
    let mut config = Config::default();
    // Point every vendor at a closed port so nothing leaves the machine
    config.chat.anthropic.base_url = "http://127.0.0.1:9".to_string();
    config.chat.openai.base_url = "http://127.0.0.1:9".to_string();
    config.embedding.base_url = "http://127.0.0.1:9".to_string();
    config
}

fn state(config: &Config) -> AppState {
    AppState::new(Pipelines::from_config(config).unwrap())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct DenyAll {
    checks: AtomicUsize,
}

#[async_trait]
impl RateLimitGate for DenyAll {
    async fn check(&self, _parts: &Parts) -> Response {
        self.checks.fetch_add(1, Ordering::SeqCst);
        (
            StatusCode::TOO_MANY_REQUESTS,
            [("retry-after", "30")],
            "slow down",
        )
            .into_response()
    }
}

#[tokio::test]
async fn test_health_lists_vendors_without_keys() {
    let mut config = offline_config();
    config.chat.openai.api_key = Some("sk-hidden".to_string());

    let response = create_router(state(&config))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chatVendors"], json!(["openai"]));
    assert_eq!(body["embeddingVendor"], false);
    assert!(!body.to_string().contains("sk-hidden"));
}

#[tokio::test]
async fn test_gate_rejection_is_returned_verbatim() {
    let gate = Arc::new(DenyAll {
        checks: AtomicUsize::new(0),
    });
    let app = create_router(state(&offline_config()).with_gate(gate.clone()));

    let response = app
        .oneshot(post_json("/api/embeddings", r#"{"texts": ["a"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "30");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"slow down");
    assert_eq!(gate.checks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_gate_does_not_cover_health() {
    let gate = Arc::new(DenyAll {
        checks: AtomicUsize::new(0),
    });
    let app = create_router(state(&offline_config()).with_gate(gate.clone()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(gate.checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_embeddings_without_credential_fall_back() {
    let response = create_router(state(&offline_config()))
        .oneshot(post_json("/api/embeddings", r#"{"texts": ["a", "b"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["fallback"], true);
    let embeddings = body["embeddings"].as_array().unwrap();
    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[0].as_array().unwrap().len(), 1536);
    assert_eq!(body["usage"]["totalTokens"], 2);
}

#[tokio::test]
async fn test_empty_texts_is_bad_request() {
    let response = create_router(state(&offline_config()))
        .oneshot(post_json("/api/embeddings", r#"{"texts": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["stage"], "input");
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    for (uri, payload) in [
        ("/api/analyze", "not json"),
        ("/api/analyze", r#"{"text": "wrong field"}"#),
        ("/api/analyze", r#"{"extractedText": 42}"#),
        ("/api/embeddings", r#"{"texts": "a"}"#),
        ("/api/embeddings", r#"{"texts": [1, 2]}"#),
    ] {
        let response = create_router(state(&offline_config()))
            .oneshot(post_json(uri, payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri} {payload}");
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["stage"], "input");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn test_empty_document_is_bad_request() {
    let response = create_router(state(&offline_config()))
        .oneshot(post_json("/api/analyze", r#"{"extractedText": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["stage"], "input");
}

#[tokio::test]
async fn test_analyze_without_chat_credential_is_vendor_auth() {
    let response = create_router(state(&offline_config()))
        .oneshot(post_json("/api/analyze", r#"{"extractedText": "A document"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["stage"], "vendor_auth");
}

#[tokio::test]
async fn test_analyze_success_through_mock_vendor() {
    let mut server = Server::new_async().await;
    let analysis = json!({
        "projectOverview": {
            "title": "Inventory Sync",
            "description": "Keeps stock levels aligned",
            "scope": "Warehouse and shop",
            "objectives": ["Accurate stock"]
        },
        "functionalRequirements": [],
        "nonFunctionalRequirements": [{
            "title": "Latency",
            "description": "Sync within a minute",
            "category": "performance",
            "priority": "medium",
            "metric": "sync delay",
            "targetValue": "under 60s"
        }],
        "keywords": ["inventory"],
        "riskFactors": [],
        "confidenceScore": 0.75
    });
    let _mock = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::Regex("Warehouse stock".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "model": "claude-test",
                "content": [{"type": "text", "text": analysis.to_string()}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 50, "output_tokens": 40}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = offline_config();
    config.chat.anthropic.api_key = Some("ak-test".to_string());
    config.chat.anthropic.base_url = server.url();

    let response = create_router(state(&config))
        .oneshot(post_json(
            "/api/analyze",
            r#"{"extractedText": "Warehouse stock must match the shop"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["truncated"], false);
    assert_eq!(body["model"], "claude-test");
    assert_eq!(body["analysis"]["projectOverview"]["title"], "Inventory Sync");
    assert_eq!(
        body["analysis"]["nonFunctionalRequirements"][0]["priority"],
        "medium"
    );
    assert!(body["analyzedAt"].is_string());
}

#[tokio::test]
async fn test_vendor_failure_reports_stage_and_details() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let mut config = offline_config();
    config.chat.anthropic.api_key = Some("ak-test".to_string());
    config.chat.anthropic.base_url = server.url();

    let response = create_router(state(&config))
        .oneshot(post_json("/api/analyze", r#"{"extractedText": "doc"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["stage"], "vendor_request");
    assert_eq!(body["details"]["status"], 500);
    assert_eq!(body["details"]["body"], "upstream exploded");
}

#[tokio::test]
async fn test_schema_failure_includes_raw_content() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(
            json!({
                "model": "claude-test",
                "content": [{"type": "text", "text": "I could not analyze this."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 5, "output_tokens": 6}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = offline_config();
    config.chat.anthropic.api_key = Some("ak-test".to_string());
    config.chat.anthropic.base_url = server.url();

    let response = create_router(state(&config))
        .oneshot(post_json("/api/analyze", r#"{"extractedText": "doc"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["stage"], "analysis_schema");
    assert_eq!(body["details"]["rawContent"], "I could not analyze this.");
}
