//! File-type sniffing from magic bytes.
//!
//! The serving surfaces accept opaque base64 blobs, so when the caller does
//! not name the document type we establish it from the first few bytes
//! before handing anything to the engine. The table below covers exactly
//! the formats the engine accepts: PDF plus the common raster formats,
//! which all coarsen to [`TypeHint::Image`] — the engine makes no finer
//! distinction between them.

use serde::{Deserialize, Serialize};

/// Coarse classification of an uploaded document.
///
/// `Unknown` is terminal: a request whose type cannot be established is
/// rejected before the pipeline runs, never guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    Pdf,
    Image,
    Unknown,
}

impl TypeHint {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeHint::Pdf => "pdf",
            TypeHint::Image => "image",
            TypeHint::Unknown => "unknown",
        }
    }

    /// Parse a caller-supplied `file_type` field. Only the two types the
    /// engine accepts are recognised; anything else is `None` so the
    /// caller can produce a typed rejection.
    pub fn from_field(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(TypeHint::Pdf),
            "image" => Some(TypeHint::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered signature table; first match wins.
///
/// JPEG, PNG, BMP, and TIFF (both byte orders) all coarsen to `Image`.
const SIGNATURES: &[(&[u8], TypeHint)] = &[
    (b"%PDF", TypeHint::Pdf),
    (&[0xFF, 0xD8, 0xFF], TypeHint::Image), // JPEG
    (&[0x89, b'P', b'N', b'G'], TypeHint::Image),
    (b"BM", TypeHint::Image),               // BMP
    (&[0x49, 0x49, 0x2A, 0x00], TypeHint::Image), // TIFF, little-endian
    (&[0x4D, 0x4D, 0x00, 0x2A], TypeHint::Image), // TIFF, big-endian
];

/// Detect the document type from its leading bytes.
///
/// Total over all inputs: empty or too-short input, or bytes matching no
/// known signature, yield [`TypeHint::Unknown`]. Never errors.
pub fn detect(bytes: &[u8]) -> TypeHint {
    for (prefix, hint) in SIGNATURES {
        if bytes.starts_with(prefix) {
            return *hint;
        }
    }
    TypeHint::Unknown
}
