//! Response envelopes for the two serving surfaces.
//!
//! The same `Result<markdown, error>` is wrapped differently depending on
//! who is calling: the serverless scheduler expects flat status-tagged
//! JSON objects, the HTTP surface expects an OpenAI chat-completion body.
//! Both wire shapes live here so the handlers contain no JSON assembly.

use crate::error::InputError;
use crate::sniff::TypeHint;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

// ── Serverless job surface ───────────────────────────────────────────────

/// Success envelope for the job surface.
///
/// `content` duplicates `markdown`: earlier callers of this service read
/// the text from `content`, and both names are kept so neither generation
/// of caller breaks.
pub fn job_success(markdown: &str, hint: TypeHint) -> Value {
    json!({
        "status": "success",
        "markdown": markdown,
        "content": markdown,
        "file_type": hint.as_str(),
        "message": "Document processed successfully",
    })
}

/// Missing-input envelope for the job surface.
///
/// Echoes literal examples of the two simplest accepted job shapes so the
/// caller can fix their request without reading documentation.
pub fn job_missing_input(error: &InputError) -> Value {
    json!({
        "error": error.to_string(),
        "example": [
            { "input": { "pdf_base64": "JVBERi0xLjQK..." } },
            { "input": { "image_base64": "iVBORw0KGgo..." } },
        ],
    })
}

/// Processing-error envelope for the job surface.
pub fn job_error(message: impl std::fmt::Display) -> Value {
    json!({
        "status": "error",
        "error": message.to_string(),
    })
}

// ── HTTP chat-completion surface ─────────────────────────────────────────

/// OpenAI-shaped chat-completion response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Wrap extracted markdown as the assistant turn of a chat completion.
pub fn chat_completion(markdown: impl Into<String>, model: impl Into<String>) -> ChatCompletion {
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    ChatCompletion {
        object: "chat.completion".to_string(),
        created,
        model: model.into(),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage {
                role: "assistant".to_string(),
                content: markdown.into(),
            },
            finish_reason: "stop".to_string(),
        }],
    }
}
