//! Voice identity types.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Voices shipped with the system, in listing order: `(id, display name)`.
pub const BUILT_IN_VOICES: &[(&str, &str)] = &[
    ("default-male", "Default Male"),
    ("default-female", "Default Female"),
];

/// Where a voice identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    BuiltIn,
    Trained,
}

/// A named, addressable synthesis target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceIdentity {
    pub id: String,
    pub display_name: String,
    pub kind: VoiceKind,
    /// Stored reference audio. `None` means the engine's own default voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl VoiceIdentity {
    pub fn built_in(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: VoiceKind::BuiltIn,
            reference: None,
            mime_type: None,
            created_at: None,
        }
    }

    /// A trained identity backed by reference audio at `reference`.
    pub fn trained(
        id: impl Into<String>,
        display_name: impl Into<String>,
        reference: PathBuf,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: VoiceKind::Trained,
            reference: Some(reference),
            mime_type: Some(mime_type.into()),
            created_at: Some(Utc::now().to_rfc3339()),
        }
    }

    pub fn is_built_in(&self) -> bool {
        self.kind == VoiceKind::BuiltIn
    }
}

/// What a voice id resolves to when building an engine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceReference {
    EngineDefault,
    Stored { path: PathBuf, mime_type: String },
}

/// The fixed built-in identities, in listing order.
pub fn built_in_voices() -> Vec<VoiceIdentity> {
    BUILT_IN_VOICES
        .iter()
        .map(|(id, name)| VoiceIdentity::built_in(*id, *name))
        .collect()
}

/// Check that an id is usable both as a registry key and as a file stem.
pub(crate) fn validate_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Id cannot be empty".to_string());
    }

    // Prevent path traversal
    if id.contains('/') || id.contains('\\') || id.contains("..") {
        return Err(format!("Id '{id}' cannot contain path separators"));
    }

    Ok(())
}
