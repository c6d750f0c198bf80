//! Filesystem storage for trained reference audio.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::codec::{AudioPayload, essence};

use super::identity::validate_id;

/// Extension used for `audio/*` types we have no mapping for.
pub const DEFAULT_EXTENSION: &str = "wav";

/// Errors that can occur while storing reference audio.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Reference audio already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Stores raw reference audio under `<root>/<voice id>.<ext>`.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    root: PathBuf,
}

impl ReferenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a payload of `mime_type` for voice `id` is stored at.
    pub fn path_for(&self, id: &str, mime_type: &str) -> Result<PathBuf, StorageError> {
        validate_id(id).map_err(StorageError::InvalidKey)?;
        Ok(self
            .root
            .join(format!("{id}.{}", extension_for_mime(mime_type))))
    }

    /// Write the payload's raw bytes and return where they landed.
    ///
    /// Bytes go to a uniquely named temporary sibling first and are linked
    /// into place, so the final path either holds the complete sample or
    /// nothing. An existing file is never replaced.
    pub fn save(&self, id: &str, payload: &AudioPayload) -> Result<PathBuf, StorageError> {
        let path = self.path_for(id, &payload.mime_type)?;
        fs::create_dir_all(&self.root)?;

        let partial = self
            .root
            .join(format!(".{id}.{}.partial", Uuid::new_v4().simple()));
        let linked = fs::write(&partial, &payload.bytes).and_then(|()| fs::hard_link(&partial, &path));
        let _ = fs::remove_file(&partial);

        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(path));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(
            voice_id = id,
            path = %path.display(),
            size = payload.len(),
            "Stored reference audio"
        );

        Ok(path)
    }

    pub fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(path)?)
    }

    /// Delete stored audio. A file that is already gone is not an error.
    pub fn remove(&self, path: &Path) -> Result<(), StorageError> {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed reference audio");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// File extension for an audio MIME type.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match essence(mime_type).as_str() {
        "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => "wav",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/webm" => "webm",
        _ => DEFAULT_EXTENSION,
    }
}
