//! The engine seam: the external document pipeline's stage contract as
//! object-safe traits.
//!
//! The engine's documented interface is four sequential stage calls over
//! an in-memory byte buffer plus a filesystem-backed image sink. What it
//! does inside those calls — OCR, layout analysis, markdown rendering —
//! is entirely its own business, so the traits promise nothing about it.
//!
//! `render_markdown` returns a raw [`serde_json::Value`] on purpose: the
//! engine's per-page result shape has changed across its own minor
//! versions (objects with `md_content`, objects with `text_content`,
//! bare strings). Pinning a schema here would break on the next engine
//! release; the coalescing shim in [`crate::pipeline::adapter`] absorbs
//! the variation instead.

use crate::error::PipelineError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Page-drop policy forwarded to the render stage.
///
/// The gateway always keeps every page — partial documents are worse than
/// noisy ones for downstream consumers — but the knob is part of the
/// engine's render contract, so it is passed explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropMode {
    /// Keep every page, including ones the engine flags as unparseable.
    #[default]
    None,
}

impl DropMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DropMode::None => "none",
        }
    }
}

/// One opened document moving through the engine's fixed stage sequence.
///
/// Stages must be called in order: `classify`, `analyze`, `parse`,
/// `render_markdown`. The engine owns whatever state accumulates between
/// them; implementations are free to front-load or defer the actual work
/// as long as errors surface from the stage that failed.
#[async_trait]
pub trait DocumentPipeline: Send {
    async fn classify(&mut self) -> Result<(), PipelineError>;

    async fn analyze(&mut self) -> Result<(), PipelineError>;

    async fn parse(&mut self) -> Result<(), PipelineError>;

    /// Render the parsed document to markdown.
    ///
    /// `img_parent` is the directory extracted images were written to and
    /// is used by the engine to resolve image links in the markdown.
    /// Returns the engine's page-indexed result verbatim.
    async fn render_markdown(
        &mut self,
        img_parent: &Path,
        drop_mode: DropMode,
    ) -> Result<Value, PipelineError>;
}

/// Factory for [`DocumentPipeline`] instances.
///
/// One backend serves the whole process; each request opens its own
/// pipeline with its own image sink.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// Open a pipeline over `document`.
    ///
    /// `subtype_hint` matches the engine's document-subtype parameter and
    /// is passed empty by the adapter — the engine classifies for itself.
    /// `image_sink` is a request-scoped directory the engine writes
    /// extracted images into; it exists for the lifetime of the call and
    /// is removed when the request completes.
    async fn open(
        &self,
        document: &[u8],
        subtype_hint: &str,
        image_sink: &Path,
    ) -> Result<Box<dyn DocumentPipeline>, PipelineError>;
}
