//! Voice registry: built-in voices plus trained voices in creation order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use super::identity::{VoiceIdentity, VoiceReference, built_in_voices, validate_id};

const REGISTRY_FILE: &str = "registry.json";

/// Errors that can occur during registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Voice not found: {0}")]
    UnknownVoice(String),

    #[error("Voice already registered: {0}")]
    DuplicateVoice(String),

    #[error("Reference audio missing for voice '{id}': {}", path.display())]
    ReferenceMissing { id: String, path: PathBuf },

    #[error("Invalid voice id: {0}")]
    InvalidId(String),

    #[error("Registry lock poisoned")]
    Poisoned,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Tracks every known voice identity.
///
/// Built-in voices are fixed at construction and always listed first.
/// Trained voices are appended by [`VoiceRegistry::register`], which is an
/// atomic add-if-absent: concurrent registrations of the same id cannot both
/// succeed. When backed by a directory, trained voices are written to
/// `registry.json` before the insert becomes visible.
#[derive(Debug)]
pub struct VoiceRegistry {
    built_ins: Vec<VoiceIdentity>,
    trained: Mutex<Vec<VoiceIdentity>>,
    registry_path: Option<PathBuf>,
}

impl VoiceRegistry {
    /// Create a registry that only lives in this process.
    pub fn in_memory() -> Self {
        Self {
            built_ins: built_in_voices(),
            trained: Mutex::new(Vec::new()),
            registry_path: None,
        }
    }

    /// Open (or start) a registry persisted under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let registry_path = dir.into().join(REGISTRY_FILE);
        let built_ins = built_in_voices();

        let mut trained: Vec<VoiceIdentity> = Vec::new();
        if registry_path.exists() {
            let json = fs::read_to_string(&registry_path)?;
            let stored: Vec<VoiceIdentity> = serde_json::from_str(&json)?;

            for voice in stored {
                let taken = built_ins.iter().chain(trained.iter()).any(|v| v.id == voice.id);
                if taken || voice.is_built_in() {
                    tracing::warn!(voice_id = %voice.id, "Skipping conflicting registry entry");
                    continue;
                }
                trained.push(voice);
            }
        }

        tracing::debug!(
            path = %registry_path.display(),
            trained = trained.len(),
            "Opened voice registry"
        );

        Ok(Self {
            built_ins,
            trained: Mutex::new(trained),
            registry_path: Some(registry_path),
        })
    }

    /// Path of the backing file, if any.
    pub fn registry_path(&self) -> Option<&Path> {
        self.registry_path.as_deref()
    }

    fn trained(&self) -> Result<MutexGuard<'_, Vec<VoiceIdentity>>, RegistryError> {
        self.trained.lock().map_err(|_| RegistryError::Poisoned)
    }

    /// All voices: built-ins in fixed order, then trained by creation order.
    pub fn list_voices(&self) -> Result<Vec<VoiceIdentity>, RegistryError> {
        let trained = self.trained()?;
        Ok(self.built_ins.iter().chain(trained.iter()).cloned().collect())
    }

    /// Look up a voice by id.
    pub fn get(&self, id: &str) -> Result<VoiceIdentity, RegistryError> {
        if let Some(voice) = self.built_ins.iter().find(|v| v.id == id) {
            return Ok(voice.clone());
        }

        self.trained()?
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownVoice(id.to_string()))
    }

    /// Resolve a voice id to what the engine should be given.
    ///
    /// A trained voice whose reference audio is gone fails here, not at
    /// registration time.
    pub fn resolve(&self, id: &str) -> Result<VoiceReference, RegistryError> {
        let voice = self.get(id)?;
        let built_in = voice.is_built_in();

        match voice.reference {
            None if built_in => Ok(VoiceReference::EngineDefault),
            Some(path) if path.is_file() => Ok(VoiceReference::Stored {
                path,
                mime_type: voice.mime_type.unwrap_or_else(|| "audio/wav".to_string()),
            }),
            Some(path) => Err(RegistryError::ReferenceMissing {
                id: voice.id,
                path,
            }),
            None => Err(RegistryError::ReferenceMissing {
                id: voice.id,
                path: PathBuf::new(),
            }),
        }
    }

    /// Add a trained voice if its id is not taken.
    pub fn register(&self, identity: VoiceIdentity) -> Result<(), RegistryError> {
        validate_id(&identity.id).map_err(RegistryError::InvalidId)?;

        if identity.is_built_in() {
            return Err(RegistryError::InvalidId(format!(
                "built-in voice '{}' cannot be registered",
                identity.id
            )));
        }

        if self.built_ins.iter().any(|v| v.id == identity.id) {
            return Err(RegistryError::DuplicateVoice(identity.id));
        }

        let mut trained = self.trained()?;
        if trained.iter().any(|v| v.id == identity.id) {
            return Err(RegistryError::DuplicateVoice(identity.id));
        }

        let id = identity.id.clone();
        trained.push(identity);

        if let Err(e) = self.persist(&trained) {
            trained.pop();
            return Err(e);
        }

        tracing::info!(voice_id = %id, total = trained.len(), "Registered trained voice");
        Ok(())
    }

    fn persist(&self, trained: &[VoiceIdentity]) -> Result<(), RegistryError> {
        let Some(path) = &self.registry_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(trained)?;
        let partial = path.with_extension("json.partial");
        fs::write(&partial, json)?;
        fs::rename(&partial, path)?;

        Ok(())
    }
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}
