//! Integration tests for the HTTP chat-completion surface.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! engine is the scripted [`common::MockBackend`], so these tests cover
//! everything except the real vendor engine.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::MockBackend;
use mineru_gateway::{server, GatewayConfig, PipelineBackend, EMPTY_RESULT_FALLBACK};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// ── Test helpers ─────────────────────────────────────────────────────────

fn router_with(backend: Arc<dyn PipelineBackend>) -> Router {
    let config = GatewayConfig::builder()
        .backend(backend)
        .build()
        .expect("valid config");
    server::create_router(config).expect("router must build")
}

fn chat_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request must build")
}

fn image_payload(model: Option<&str>) -> Value {
    let mut body = json!({
        "messages": [
            { "role": "user", "content": [
                { "type": "image_url", "image_url": {
                    "url": format!("data:image/png;base64,{}", STANDARD.encode(b"\x89PNG\r\n\x1a\n fake"))
                }}
            ]}
        ]
    });
    if let Some(m) = model {
        body["model"] = json!(m);
    }
    body
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must be readable");
    serde_json::from_slice(&bytes).expect("body must be JSON")
}

// ── Chat completions ─────────────────────────────────────────────────────

#[tokio::test]
async fn chat_success_returns_completion_envelope() {
    let backend = MockBackend::always(json!([{ "md_content": "# Invoice" }]));
    let app = router_with(backend);

    let response = app
        .oneshot(chat_request(&image_payload(Some("mineru"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["model"], "mineru");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    assert_eq!(body["choices"][0]["message"]["content"], "# Invoice");
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
}

#[tokio::test]
async fn chat_defaults_the_model_name() {
    let backend = MockBackend::always(json!(["text"]));
    let app = router_with(backend);

    let response = app.oneshot(chat_request(&image_payload(None))).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["model"], "mineru");
}

#[tokio::test]
async fn chat_without_image_part_is_400() {
    let backend = MockBackend::always(json!(["unreached"]));
    let app = router_with(backend);

    let payload = json!({
        "messages": [ { "role": "user", "content": "just words, no document" } ]
    });
    let response = app.oneshot(chat_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("no document"));
}

#[tokio::test]
async fn chat_with_bad_base64_is_400() {
    let backend = MockBackend::always(json!(["unreached"]));
    let app = router_with(backend);

    let payload = json!({
        "messages": [ { "role": "user", "content": [
            { "type": "image_url", "image_url": { "url": "data:image/png;base64,@@@" } }
        ]}]
    });
    let response = app.oneshot(chat_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pipeline_failure_is_500_with_engine_detail() {
    let backend = MockBackend::failing("layout model crashed");
    let app = router_with(backend);

    let response = app.oneshot(chat_request(&image_payload(None))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert!(
        body["detail"].as_str().unwrap().contains("layout model crashed"),
        "got: {body}"
    );
}

#[tokio::test]
async fn request_after_failure_succeeds_normally() {
    let backend = MockBackend::sequence(
        vec![Err("transient engine fault".to_string())],
        Ok(json!(["# Recovered"])),
    );
    let app = router_with(backend);

    let first = app
        .clone()
        .oneshot(chat_request(&image_payload(None)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let second = app.oneshot(chat_request(&image_payload(None))).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let body = body_json(second).await;
    assert_eq!(body["choices"][0]["message"]["content"], "# Recovered");
}

#[tokio::test]
async fn empty_render_result_returns_fallback_text() {
    let backend = MockBackend::always(json!([]));
    let app = router_with(backend);

    let response = app.oneshot(chat_request(&image_payload(None))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["choices"][0]["message"]["content"],
        EMPTY_RESULT_FALLBACK
    );
}

// ── Health ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let backend = MockBackend::always(json!([]));
    let app = router_with(backend);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "mineru-gateway");
}
