//! Error types for the mineru-gateway library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`InputError`] — the request never reached the engine: a recognised
//!   field was missing, the document type could not be established, or the
//!   base64 payload did not decode. Always recovered into a structured
//!   error response by the calling surface.
//!
//! * [`PipelineError`] — the engine was invoked and failed, or the
//!   per-request workspace could not be set up. Caught at the adapter
//!   boundary, logged, and surfaced as a structured error response.
//!
//! Neither type is ever allowed to take the process down: a failed request
//! produces an error envelope and the next request is unaffected.

use thiserror::Error;

/// A request was rejected before the document pipeline ran.
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// None of the accepted request shapes matched.
    #[error("no document found in request: expected 'pdf_base64', 'image_base64', 'file_base64', or a chat message with an image part")]
    MissingInput,

    /// The document type was neither supplied nor detectable.
    #[error("unsupported or undetectable document type: {detail}")]
    UnsupportedType { detail: String },

    /// The base64 payload did not decode.
    #[error("invalid base64 payload: {reason}")]
    DecodeFailure { reason: String },
}

impl InputError {
    /// Shorthand for [`InputError::UnsupportedType`].
    pub fn unsupported(detail: impl Into<String>) -> Self {
        InputError::UnsupportedType {
            detail: detail.into(),
        }
    }
}

/// The engine stage at which a pipeline failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classify,
    Analyze,
    Parse,
    Render,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Classify => "classify",
            Stage::Analyze => "analyze",
            Stage::Parse => "parse",
            Stage::Render => "render",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document pipeline was invoked and failed.
///
/// The `message` field carries the engine's own error text verbatim so the
/// caller sees the same diagnostics the engine produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One of the four fixed stage calls failed.
    #[error("document pipeline failed during {stage}: {message}")]
    Stage { stage: Stage, message: String },

    /// The engine itself reported an error outside any specific stage
    /// (failed to start, failed to accept the document).
    #[error("document engine error: {0}")]
    Engine(String),

    /// The per-request temporary workspace could not be created or used.
    #[error("failed to set up request workspace: {source}")]
    Workspace {
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Attach stage context to an engine error, preserving its message.
    pub(crate) fn at_stage(self, stage: Stage) -> Self {
        match self {
            PipelineError::Engine(message) => PipelineError::Stage { stage, message },
            other => other,
        }
    }
}
