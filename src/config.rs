//! Gateway configuration.
//!
//! Every knob for both serving surfaces lives in [`GatewayConfig`], built
//! via its builder. Keeping the configuration in one struct makes it
//! trivial to share across handlers and to diff two deployments when their
//! behaviour differs.

use crate::pipeline::backend::{DropMode, PipelineBackend};
use crate::pipeline::process::{ProcessBackend, ENGINE_CMD_ENV};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Configuration validation failure.
#[derive(Debug, Clone, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(pub String);

/// Configuration for the gateway's serving surfaces.
///
/// # Example
/// ```rust
/// use mineru_gateway::GatewayConfig;
///
/// let config = GatewayConfig::builder()
///     .port(8200)
///     .engine_cmd("mineru-engine")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// Bind host for the HTTP surface. Default: `0.0.0.0`.
    pub host: String,

    /// Bind port for the HTTP surface. Default: 8000.
    pub port: u16,

    /// Engine command for the shipped subprocess backend. When unset, the
    /// `MINERU_ENGINE_CMD` environment variable is consulted at backend
    /// resolution time.
    pub engine_cmd: Option<String>,

    /// Model name advertised (and defaulted) on the chat surface.
    /// Default: `mineru`.
    pub model_name: String,

    /// Page-drop policy forwarded to the engine's render stage.
    pub drop_mode: DropMode,

    /// Pre-built pipeline backend. Takes precedence over `engine_cmd`.
    /// This is how tests and embedders substitute the engine.
    pub backend: Option<Arc<dyn PipelineBackend>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            engine_cmd: None,
            model_name: "mineru".to_string(),
            drop_mode: DropMode::None,
            backend: None,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("engine_cmd", &self.engine_cmd)
            .field("model_name", &self.model_name)
            .field("drop_mode", &self.drop_mode)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn PipelineBackend>"))
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new builder for `GatewayConfig`.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the pipeline backend, from most-specific to least-specific:
    ///
    /// 1. A pre-built backend (`self.backend`) — used as-is.
    /// 2. A configured engine command (`self.engine_cmd`).
    /// 3. The `MINERU_ENGINE_CMD` environment variable.
    pub fn resolve_backend(&self) -> Result<Arc<dyn PipelineBackend>, ConfigError> {
        if let Some(ref backend) = self.backend {
            return Ok(Arc::clone(backend));
        }

        if let Some(ref cmd) = self.engine_cmd {
            return Ok(Arc::new(ProcessBackend::new(cmd.clone())));
        }

        if let Some(backend) = ProcessBackend::from_env() {
            return Ok(Arc::new(backend));
        }

        Err(ConfigError(format!(
            "no document engine configured: set engine_cmd or the {ENGINE_CMD_ENV} environment variable"
        )))
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn engine_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.engine_cmd = Some(cmd.into());
        self
    }

    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.config.model_name = name.into();
        self
    }

    pub fn drop_mode(mut self, mode: DropMode) -> Self {
        self.config.drop_mode = mode;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn PipelineBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let c = &self.config;
        if c.host.trim().is_empty() {
            return Err(ConfigError("bind host must not be empty".into()));
        }
        if c.model_name.trim().is_empty() {
            return Err(ConfigError("model name must not be empty".into()));
        }
        if let Some(ref cmd) = c.engine_cmd {
            if cmd.trim().is_empty() {
                return Err(ConfigError("engine command must not be empty".into()));
            }
        }
        Ok(self.config)
    }
}
