//! Subprocess-backed engine driver.
//!
//! The vendor engine is not linkable from Rust, so the shipped backend
//! drives its command-line front end: the document is written to a
//! managed temp file and each stage becomes one invocation of the
//! configured command:
//!
//! ```text
//! <engine> classify --input <doc> --images <sink>
//! <engine> analyze  --input <doc> --images <sink>
//! <engine> parse    --input <doc> --images <sink>
//! <engine> render   --input <doc> --images <sink> --img-parent <sink> --drop-mode none
//! ```
//!
//! The render stage's stdout is parsed as JSON; engines that emit plain
//! markdown instead are handled by falling back to a bare string value,
//! which the adapter's coalescing shim accepts like any other shape.
//! A nonzero exit surfaces as a stage error carrying the engine's stderr.

use crate::error::PipelineError;
use crate::pipeline::backend::{DocumentPipeline, DropMode, PipelineBackend};
use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// Environment variable naming the engine command when none is configured.
pub const ENGINE_CMD_ENV: &str = "MINERU_ENGINE_CMD";

/// A [`PipelineBackend`] that shells out to a vendor engine command.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: String,
}

impl ProcessBackend {
    /// Create a backend around an explicit engine command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Resolve the engine command from [`ENGINE_CMD_ENV`].
    pub fn from_env() -> Option<Self> {
        match std::env::var(ENGINE_CMD_ENV) {
            Ok(cmd) if !cmd.trim().is_empty() => Some(Self::new(cmd)),
            _ => None,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl PipelineBackend for ProcessBackend {
    async fn open(
        &self,
        document: &[u8],
        subtype_hint: &str,
        image_sink: &Path,
    ) -> Result<Box<dyn DocumentPipeline>, PipelineError> {
        // The engine reads from a path, not a pipe; the NamedTempFile is
        // held by the pipeline so the file outlives every stage call.
        let mut input = NamedTempFile::new().map_err(|source| PipelineError::Workspace { source })?;
        input
            .write_all(document)
            .map_err(|source| PipelineError::Workspace { source })?;
        input
            .flush()
            .map_err(|source| PipelineError::Workspace { source })?;

        debug!(
            command = %self.command,
            bytes = document.len(),
            "opened engine pipeline"
        );

        Ok(Box::new(ProcessPipeline {
            command: self.command.clone(),
            subtype_hint: subtype_hint.to_string(),
            image_sink: image_sink.to_path_buf(),
            input,
        }))
    }
}

struct ProcessPipeline {
    command: String,
    subtype_hint: String,
    image_sink: PathBuf,
    /// Keeps the on-disk copy of the document alive across stages.
    input: NamedTempFile,
}

impl ProcessPipeline {
    async fn run_stage(&self, stage: &str, extra: &[&str]) -> Result<Vec<u8>, PipelineError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(stage)
            .arg("--input")
            .arg(self.input.path())
            .arg("--images")
            .arg(&self.image_sink);
        if !self.subtype_hint.is_empty() {
            cmd.arg("--subtype").arg(&self.subtype_hint);
        }
        cmd.args(extra);

        debug!(stage, command = %self.command, "invoking engine stage");

        let output = cmd
            .output()
            .await
            .map_err(|e| PipelineError::Engine(format!("failed to launch '{}': {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(PipelineError::Engine(if detail.is_empty() {
                format!("engine exited with {}", output.status)
            } else {
                detail.to_string()
            }));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl DocumentPipeline for ProcessPipeline {
    async fn classify(&mut self) -> Result<(), PipelineError> {
        self.run_stage("classify", &[]).await.map(drop)
    }

    async fn analyze(&mut self) -> Result<(), PipelineError> {
        self.run_stage("analyze", &[]).await.map(drop)
    }

    async fn parse(&mut self) -> Result<(), PipelineError> {
        self.run_stage("parse", &[]).await.map(drop)
    }

    async fn render_markdown(
        &mut self,
        img_parent: &Path,
        drop_mode: DropMode,
    ) -> Result<Value, PipelineError> {
        let img_parent = img_parent.to_string_lossy().into_owned();
        let stdout = self
            .run_stage(
                "render",
                &["--img-parent", &img_parent, "--drop-mode", drop_mode.as_str()],
            )
            .await?;

        let text = String::from_utf8_lossy(&stdout).into_owned();
        // Plain-markdown engines are valid too: hand the text through as a
        // bare string value and let the coalescing shim deal with it.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
