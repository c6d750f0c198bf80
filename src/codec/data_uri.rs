//! `data:<mime>;base64,<payload>` encoding and decoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Errors that can occur while decoding a data URI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Raw audio bytes tagged with their MIME type.
///
/// Only lives for the duration of a request. Persisted copies are raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioPayload {
    /// Create a payload from bytes and a MIME type.
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a payload out of a data URI.
    pub fn from_data_uri(data_uri: &str) -> Result<Self, CodecError> {
        decode(data_uri)
    }

    /// Render this payload as a data URI.
    pub fn to_data_uri(&self) -> String {
        encode(&self.bytes, &self.mime_type)
    }

    /// Whether the MIME type names an audio type.
    pub fn is_audio(&self) -> bool {
        is_audio_mime(&self.mime_type)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns true for `audio/<subtype>` MIME strings (parameters allowed).
pub fn is_audio_mime(mime_type: &str) -> bool {
    essence(mime_type)
        .strip_prefix("audio/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Lowercased MIME type with any `;param=value` suffix removed.
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Encode bytes as a `data:<mime>;base64,<payload>` string.
pub fn encode(bytes: &[u8], mime_type: &str) -> String {
    format!(
        "{SCHEME}{mime_type}{BASE64_MARKER}{}",
        BASE64_STANDARD.encode(bytes)
    )
}

/// Decode a `data:<mime>;base64,<payload>` string.
///
/// Every segment must be present: the scheme, a non-empty MIME type, the
/// `;base64,` marker and a valid (possibly empty) base64 payload.
pub fn decode(data_uri: &str) -> Result<AudioPayload, CodecError> {
    let rest = data_uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| CodecError::MalformedPayload("missing 'data:' scheme".to_string()))?;

    let (mime_type, payload) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
        CodecError::MalformedPayload("missing ';base64,' marker".to_string())
    })?;

    if mime_type.trim().is_empty() {
        return Err(CodecError::MalformedPayload("empty MIME type".to_string()));
    }

    let bytes = BASE64_STANDARD
        .decode(payload)
        .map_err(|e| CodecError::MalformedPayload(format!("invalid base64 payload: {e}")))?;

    Ok(AudioPayload {
        bytes,
        mime_type: mime_type.to_string(),
    })
}
