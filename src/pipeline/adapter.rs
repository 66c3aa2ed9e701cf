//! Pipeline adapter: workspace lifecycle, the fixed stage sequence, and
//! result-shape coalescing.
//!
//! ## Why a temp workspace per request?
//!
//! The engine writes extracted images to a filesystem sink while it works.
//! Giving each request its own `TempDir` (with a nested `output/` sink)
//! means the sink is released on every exit path — success, stage error,
//! or panic — via RAII drop, so sustained load cannot exhaust the disk.
//!
//! ## Why coalesce the render result?
//!
//! The engine's per-page render shape is not stable across its own
//! versions: pages have arrived as objects carrying `md_content`, objects
//! carrying `text_content`, and bare strings. [`extract_text`] accepts all
//! of them (and anything else, degraded to empty) so an engine upgrade
//! never turns into a 500 for callers.

use crate::error::{PipelineError, Stage};
use crate::pipeline::backend::{DropMode, PipelineBackend};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, error, info};

/// Returned in place of an empty render result so callers never receive
/// an empty string as a "successful" conversion.
pub const EMPTY_RESULT_FALLBACK: &str = "No text content could be extracted from this document.";

/// Separator between per-page fragments in the assembled markdown.
const PAGE_SEPARATOR: &str = "\n\n";

/// Run the full pipeline over one document and return its markdown.
///
/// Stages run strictly in order — classify, analyze, parse, render — with
/// no retries and no timeout; the hosting surface owns any deadline. Every
/// failure is logged here before being returned, and the engine's original
/// message is preserved inside the error.
pub async fn run(
    document: &[u8],
    backend: &dyn PipelineBackend,
    drop_mode: DropMode,
) -> Result<String, PipelineError> {
    let result = run_inner(document, backend, drop_mode).await;
    if let Err(ref e) = result {
        error!(error = %e, "document pipeline failed");
    }
    result
}

async fn run_inner(
    document: &[u8],
    backend: &dyn PipelineBackend,
    drop_mode: DropMode,
) -> Result<String, PipelineError> {
    info!(bytes = document.len(), "document decoded, running pipeline");

    // Workspace lives until this function returns; Drop removes it on
    // every exit path.
    let workspace = TempDir::new().map_err(|source| PipelineError::Workspace { source })?;
    let output_dir = workspace.path().join("output");
    std::fs::create_dir_all(&output_dir).map_err(|source| PipelineError::Workspace { source })?;

    let mut pipeline = backend
        .open(document, "", &output_dir)
        .await
        .map_err(|e| e.at_stage(Stage::Classify))?;

    debug!("running classification");
    pipeline
        .classify()
        .await
        .map_err(|e| e.at_stage(Stage::Classify))?;

    debug!("running analysis");
    pipeline
        .analyze()
        .await
        .map_err(|e| e.at_stage(Stage::Analyze))?;

    debug!("parsing document");
    pipeline
        .parse()
        .await
        .map_err(|e| e.at_stage(Stage::Parse))?;

    debug!("rendering markdown");
    let rendered = pipeline
        .render_markdown(&output_dir, drop_mode)
        .await
        .map_err(|e| e.at_stage(Stage::Render))?;

    let markdown = finalize(extract_text(&rendered));
    info!(chars = markdown.len(), "pipeline complete");
    Ok(markdown)
}

/// Coalesce the engine's render result into plain markdown text.
///
/// A sequence is flattened page by page: objects contribute `md_content`,
/// falling back to `text_content`, falling back to empty; strings are used
/// as-is; anything else contributes nothing. Fragments join with a blank
/// line. A non-sequence result is used directly — as-is for a string,
/// otherwise via its JSON text form.
pub fn extract_text(rendered: &Value) -> String {
    match rendered {
        Value::Array(pages) => pages
            .iter()
            .map(page_text)
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn page_text(page: &Value) -> &str {
    match page {
        Value::Object(fields) => fields
            .get("md_content")
            .and_then(Value::as_str)
            .or_else(|| fields.get("text_content").and_then(Value::as_str))
            .unwrap_or(""),
        Value::String(s) => s,
        _ => "",
    }
}

/// Trim the assembled text, substituting the fixed fallback when nothing
/// usable came out of the render stage.
fn finalize(text: String) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_RESULT_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}
