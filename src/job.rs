//! Serverless job surface.
//!
//! The hosting scheduler delivers one job per invocation as
//! `{"input": {...}}` and expects a JSON result back in every case —
//! a handler that errors out of band strands the job. [`handle`] therefore
//! always returns a value: success, missing-input guidance, or a
//! status-tagged error, never `Err`.

use crate::envelope;
use crate::error::InputError;
use crate::normalize;
use crate::pipeline::adapter;
use crate::pipeline::backend::{DropMode, PipelineBackend};
use serde_json::Value;
use tracing::{info, warn};

/// Handle one serverless job event.
///
/// The event's `input` object is normalised, run through the pipeline, and
/// wrapped in the job envelope. Missing input yields the guidance envelope
/// with example requests; any other failure yields
/// `{"status":"error","error":...}`.
pub async fn handle(event: &Value, backend: &dyn PipelineBackend, drop_mode: DropMode) -> Value {
    info!("received document processing job");

    let input = match event.get("input") {
        Some(input) => input,
        None => {
            warn!("job event has no 'input' object");
            return envelope::job_missing_input(&InputError::MissingInput);
        }
    };

    let normalized = match normalize::normalize(input) {
        Ok(n) => n,
        Err(e @ InputError::MissingInput) => {
            warn!(error = %e, "job rejected: no document in input");
            return envelope::job_missing_input(&e);
        }
        Err(e) => {
            warn!(error = %e, "job rejected: invalid document payload");
            return envelope::job_error(e);
        }
    };

    info!(file_type = %normalized.hint, bytes = normalized.document.len(), "job input normalised");

    match adapter::run(&normalized.document, backend, drop_mode).await {
        Ok(markdown) => envelope::job_success(&markdown, normalized.hint),
        // adapter::run already logged the failure with context.
        Err(e) => envelope::job_error(e),
    }
}
