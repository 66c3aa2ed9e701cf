//! HTTP surface: an OpenAI-compatible chat-completion endpoint over the
//! document pipeline.
//!
//! Clients that already speak the chat-completion protocol can point at
//! this server unchanged: the document travels as an `image_url` data URI
//! inside the last message, and the extracted markdown comes back as the
//! assistant turn.
//!
//! # Endpoints
//!
//! - `POST /v1/chat/completions` — convert the embedded document
//! - `GET  /health` — liveness probe
//!
//! The router is exposed separately from [`serve`] so embedders can nest
//! it under their own application and tests can drive it in-process.

use crate::config::{ConfigError, GatewayConfig};
use crate::envelope::{self, ChatCompletion};
use crate::error::{InputError, PipelineError};
use crate::normalize;
use crate::pipeline::adapter;
use crate::pipeline::backend::{DropMode, PipelineBackend};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the HTTP handlers.
pub struct GatewayState {
    backend: Arc<dyn PipelineBackend>,
    drop_mode: DropMode,
    model_name: String,
}

/// Request body for `POST /v1/chat/completions`.
///
/// `content` entries stay untyped: the protocol allows both a bare string
/// and an array of parts, and the normaliser owns that distinction.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<Value>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Error responses for the HTTP surface.
///
/// Input problems are the caller's fault (400); a pipeline failure is ours
/// (500). Either way the body is `{"detail": ...}` with the underlying
/// message, matching what this service's clients already parse.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(d) => (StatusCode::BAD_REQUEST, d),
            ApiError::Internal(d) => (StatusCode::INTERNAL_SERVER_ERROR, d),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Build the gateway router over a resolved configuration.
pub fn create_router(config: GatewayConfig) -> Result<Router, ConfigError> {
    let backend = config.resolve_backend()?;
    let state = Arc::new(GatewayState {
        backend,
        drop_mode: config.drop_mode,
        model_name: config.model_name,
    });

    Ok(Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state))
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

async fn chat_completions(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Json<ChatCompletion>, ApiError> {
    let normalized = normalize::from_chat_messages(&request.messages).map_err(|e| {
        warn!(error = %e, "chat request rejected");
        ApiError::from(e)
    })?;

    info!(bytes = normalized.document.len(), "chat request normalised");

    let markdown =
        adapter::run(&normalized.document, state.backend.as_ref(), state.drop_mode).await?;

    let model = request
        .model
        .unwrap_or_else(|| state.model_name.clone());
    Ok(Json(envelope::chat_completion(markdown, model)))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mineru-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
