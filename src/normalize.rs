//! Input normalisation: turn any accepted request shape into one
//! canonical `(document bytes, type hint)` pair.
//!
//! Callers reach this service through several generations of request
//! formats — a named `pdf_base64`/`image_base64` field, a generic
//! `file_base64` field with an optional explicit type, or an OpenAI-style
//! chat payload with the document embedded as an `image_url` data URI.
//! All of them funnel through [`normalize`], so both serving surfaces see
//! exactly one input contract.
//!
//! Shapes are checked in priority order; the first match wins. A named
//! field forces its type with no sniffing — a caller who says `pdf_base64`
//! gets the PDF path even if the bytes say otherwise.

use crate::error::InputError;
use crate::sniff::{self, TypeHint};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

/// Marker separating a data-URI prefix from its base64 payload.
const DATA_URI_MARKER: &str = "base64,";

/// A decoded document ready for the pipeline adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// Raw decoded bytes of the uploaded document. Never empty.
    pub document: Vec<u8>,
    /// Forced or sniffed document type. Never [`TypeHint::Unknown`].
    pub hint: TypeHint,
}

/// Normalise a request payload into document bytes plus a type hint.
///
/// Accepted shapes, in priority order:
/// 1. `{"pdf_base64": "..."}` — type forced to `pdf`
/// 2. `{"image_base64": "..."}` — type forced to `image`
/// 3. `{"file_base64": "...", "file_type": "pdf"|"image"}` — `file_type`
///    optional; when absent the type is sniffed from magic bytes
/// 4. `{"messages": [...]}` — chat payload whose last message carries an
///    `image_url` content part (see [`from_chat_messages`])
///
/// # Errors
/// [`InputError::MissingInput`] when no shape matches,
/// [`InputError::UnsupportedType`] when the type is neither supplied nor
/// detectable, [`InputError::DecodeFailure`] when base64 decoding fails.
pub fn normalize(payload: &Value) -> Result<NormalizedInput, InputError> {
    if let Some(b64) = payload.get("pdf_base64").and_then(Value::as_str) {
        return Ok(NormalizedInput {
            document: decode_base64(b64)?,
            hint: TypeHint::Pdf,
        });
    }

    if let Some(b64) = payload.get("image_base64").and_then(Value::as_str) {
        return Ok(NormalizedInput {
            document: decode_base64(b64)?,
            hint: TypeHint::Image,
        });
    }

    if let Some(b64) = payload.get("file_base64").and_then(Value::as_str) {
        let document = decode_base64(b64)?;
        let hint = match payload.get("file_type").and_then(Value::as_str) {
            Some(field) => TypeHint::from_field(field)
                .ok_or_else(|| InputError::unsupported(format!("file_type '{field}'")))?,
            None => match sniff::detect(&document) {
                TypeHint::Unknown => {
                    return Err(InputError::unsupported(
                        "first bytes match no known signature; pass an explicit file_type",
                    ))
                }
                detected => detected,
            },
        };
        return Ok(NormalizedInput { document, hint });
    }

    if let Some(messages) = payload.get("messages").and_then(Value::as_array) {
        return from_chat_messages(messages);
    }

    Err(InputError::MissingInput)
}

/// Normalise an OpenAI-style chat payload (shape 4).
///
/// The last message's `content` must be an array of parts; the first part
/// tagged `"type": "image_url"` supplies the document via
/// `image_url.url`. The URL is expected to be a `data:` URI — everything
/// up to and including the last `base64,` marker is stripped; a URL with
/// no marker is treated as bare base64 in its entirety. The part is an
/// explicit image reference, so the type is forced to `image`.
pub fn from_chat_messages(messages: &[Value]) -> Result<NormalizedInput, InputError> {
    let content = messages
        .last()
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
        .ok_or(InputError::MissingInput)?;

    let url = content
        .iter()
        .find(|part| part.get("type").and_then(Value::as_str) == Some("image_url"))
        .and_then(|part| part.get("image_url"))
        .and_then(|iu| iu.get("url"))
        .and_then(Value::as_str)
        .ok_or(InputError::MissingInput)?;

    Ok(NormalizedInput {
        document: decode_base64(strip_data_uri(url))?,
        hint: TypeHint::Image,
    })
}

/// Strip a data-URI prefix, keeping only the base64 payload.
fn strip_data_uri(url: &str) -> &str {
    match url.rfind(DATA_URI_MARKER) {
        Some(idx) => &url[idx + DATA_URI_MARKER.len()..],
        None => url,
    }
}

/// Decode base64, tolerating ASCII whitespace (transport wrappers
/// line-fold long payloads). An empty result is a decode failure — a
/// document has at least one byte.
fn decode_base64(b64: &str) -> Result<Vec<u8>, InputError> {
    let compact: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let document = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| InputError::DecodeFailure {
            reason: e.to_string(),
        })?;
    if document.is_empty() {
        return Err(InputError::DecodeFailure {
            reason: "decoded payload is empty".into(),
        });
    }
    Ok(document)
}
