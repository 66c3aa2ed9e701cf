//! Integration tests for the serverless job surface.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::MockBackend;
use mineru_gateway::{job, DropMode, EMPTY_RESULT_FALLBACK};
use serde_json::json;

fn pdf_event() -> serde_json::Value {
    json!({ "input": { "pdf_base64": STANDARD.encode(b"%PDF-1.7\nbody") } })
}

#[tokio::test]
async fn success_envelope_carries_markdown_and_type() {
    let backend = MockBackend::always(json!([
        { "md_content": "# Page one" },
        { "text_content": "Page two" }
    ]));
    let out = job::handle(&pdf_event(), backend.as_ref(), DropMode::None).await;

    assert_eq!(out["status"], "success");
    assert_eq!(out["markdown"], "# Page one\n\nPage two");
    assert_eq!(out["content"], out["markdown"]);
    assert_eq!(out["file_type"], "pdf");
    assert!(out["message"].is_string());
}

#[tokio::test]
async fn missing_document_echoes_example_requests() {
    let backend = MockBackend::always(json!([]));
    let out = job::handle(&json!({ "input": {} }), backend.as_ref(), DropMode::None).await;

    assert!(out["error"].as_str().unwrap().contains("pdf_base64"));
    let examples = out["example"].as_array().unwrap();
    assert_eq!(examples.len(), 2);
    assert!(examples[0]["input"]["pdf_base64"].is_string());
    assert!(examples[1]["input"]["image_base64"].is_string());
}

#[tokio::test]
async fn undetectable_file_is_a_status_error() {
    let backend = MockBackend::always(json!([]));
    let event = json!({ "input": { "file_base64": STANDARD.encode(b"no signature here") } });
    let out = job::handle(&event, backend.as_ref(), DropMode::None).await;

    assert_eq!(out["status"], "error");
    assert!(out["error"].as_str().unwrap().contains("type"));
}

#[tokio::test]
async fn engine_failure_is_a_status_error_with_its_message() {
    let backend = MockBackend::failing("model weights missing");
    let out = job::handle(&pdf_event(), backend.as_ref(), DropMode::None).await;

    assert_eq!(out["status"], "error");
    assert!(out["error"].as_str().unwrap().contains("model weights missing"));
}

#[tokio::test]
async fn engine_failure_then_recovery_across_jobs() {
    let backend = MockBackend::sequence(
        vec![Err("GPU unavailable".to_string())],
        Ok(json!(["# Fine now"])),
    );

    let first = job::handle(&pdf_event(), backend.as_ref(), DropMode::None).await;
    assert_eq!(first["status"], "error");
    assert!(first["error"].as_str().unwrap().contains("GPU unavailable"));

    let second = job::handle(&pdf_event(), backend.as_ref(), DropMode::None).await;
    assert_eq!(second["status"], "success");
    assert_eq!(second["markdown"], "# Fine now");
}

#[tokio::test]
async fn empty_render_result_falls_back_to_fixed_message() {
    let backend = MockBackend::always(json!([{ "md_content": "" }]));
    let out = job::handle(&pdf_event(), backend.as_ref(), DropMode::None).await;

    assert_eq!(out["status"], "success");
    assert_eq!(out["markdown"], EMPTY_RESULT_FALLBACK);
}
