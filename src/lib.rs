//! # mineru-gateway
//!
//! Serve the MinerU document-understanding pipeline over two surfaces: a
//! serverless job handler and an HTTP API that mimics the OpenAI
//! chat-completion protocol.
//!
//! ## Why this crate?
//!
//! The engine does all the hard work — OCR, layout analysis, markdown
//! rendering — but it speaks "bytes in, pages out". Production callers
//! speak base64 job envelopes and chat-completion requests in several
//! historical dialects. This crate is the translation layer: one input
//! normaliser, one pipeline adapter, one envelope builder, shared by both
//! surfaces instead of a handler fork per request shape.
//!
//! ## Request Flow
//!
//! ```text
//! request
//!  │
//!  ├─ 1. Normalise  pdf_base64 / image_base64 / file_base64 / chat data-URI
//!  ├─ 2. Sniff      magic bytes when the caller did not name a type
//!  ├─ 3. Pipeline   classify → analyze → parse → render (external engine)
//!  ├─ 4. Coalesce   tolerate every render shape the engine has ever produced
//!  └─ 5. Envelope   job JSON or chat-completion body
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mineru_gateway::{server, GatewayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Engine command may also come from MINERU_ENGINE_CMD.
//!     let config = GatewayConfig::builder()
//!         .port(8000)
//!         .engine_cmd("mineru-engine")
//!         .build()?;
//!     server::serve(config).await
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mineru-gateway` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding only the library:
//! ```toml
//! mineru-gateway = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod envelope;
pub mod error;
pub mod job;
pub mod normalize;
pub mod pipeline;
pub mod server;
pub mod sniff;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConfigError, GatewayConfig, GatewayConfigBuilder};
pub use error::{InputError, PipelineError, Stage};
pub use normalize::{normalize, NormalizedInput};
pub use pipeline::adapter::{run, EMPTY_RESULT_FALLBACK};
pub use pipeline::backend::{DocumentPipeline, DropMode, PipelineBackend};
pub use pipeline::process::{ProcessBackend, ENGINE_CMD_ENV};
pub use sniff::{detect, TypeHint};
