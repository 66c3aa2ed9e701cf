//! Shared test backend: a scripted stand-in for the document engine.

use async_trait::async_trait;
use mineru_gateway::{DocumentPipeline, DropMode, PipelineBackend, PipelineError};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Outcome of one scripted pipeline run: a render result or an engine
/// failure message.
pub type Outcome = Result<Value, String>;

/// A [`PipelineBackend`] that replays scripted outcomes, one per opened
/// pipeline, then repeats the last default outcome forever.
pub struct MockBackend {
    script: Mutex<VecDeque<Outcome>>,
    default: Outcome,
}

impl MockBackend {
    /// Every request renders the same value.
    pub fn always(render: Value) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            default: Ok(render),
        })
    }

    /// Every request fails with the same engine message.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            default: Err(message.to_string()),
        })
    }

    /// Replay `script` in order, then fall back to `default`.
    pub fn sequence(script: Vec<Outcome>, default: Outcome) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            default,
        })
    }
}

#[async_trait]
impl PipelineBackend for MockBackend {
    async fn open(
        &self,
        _document: &[u8],
        _subtype_hint: &str,
        _image_sink: &Path,
    ) -> Result<Box<dyn DocumentPipeline>, PipelineError> {
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        Ok(Box::new(MockPipeline { outcome }))
    }
}

struct MockPipeline {
    outcome: Outcome,
}

#[async_trait]
impl DocumentPipeline for MockPipeline {
    async fn classify(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn analyze(&mut self) -> Result<(), PipelineError> {
        // Engine failures surface from the first stage that does real work.
        match &self.outcome {
            Err(message) => Err(PipelineError::Engine(message.clone())),
            Ok(_) => Ok(()),
        }
    }

    async fn parse(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn render_markdown(
        &mut self,
        _img_parent: &Path,
        _drop_mode: DropMode,
    ) -> Result<Value, PipelineError> {
        self.outcome.clone().map_err(PipelineError::Engine)
    }
}
