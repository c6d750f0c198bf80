//! Training gateway: captures a reference sample under a freshly minted voice id.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::backend::{Backend, TrainRequest};
use crate::codec::{AudioPayload, decode, essence, is_audio_mime};
use crate::config::TrainingConfig;
use crate::voice::{ReferenceStore, VoiceIdentity, VoiceRegistry};

use super::error::GatewayError;

/// Id stem used when a model name has no usable characters.
pub const UNNAMED_MODEL: &str = "unnamed_model";

/// Status reported for a locally captured voice.
pub const TRAINING_STATUS_COMPLETED: &str = "completed";

const SUFFIX_LEN: usize = 6;

/// A sample to build a new voice from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRequest {
    pub model_name: String,
    pub audio_sample: AudioPayload,
}

impl TrainingRequest {
    pub fn new(model_name: impl Into<String>, audio_sample: AudioPayload) -> Self {
        Self {
            model_name: model_name.into(),
            audio_sample,
        }
    }

    /// Build a request from an uploaded data URI.
    pub fn from_data_uri(
        model_name: impl Into<String>,
        audio_data_uri: &str,
    ) -> Result<Self, GatewayError> {
        Ok(Self::new(model_name, decode(audio_data_uri)?))
    }
}

/// The outcome of a successful training call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedVoice {
    pub voice: VoiceIdentity,
    pub training_status: String,
    /// Model id reported by the engine, when it trained remotely.
    pub model_id: Option<String>,
}

/// Limits a sample must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPolicy {
    pub max_sample_bytes: usize,
    pub allowed_mime_types: Vec<String>,
    pub remote: bool,
}

impl Default for TrainingPolicy {
    fn default() -> Self {
        Self::from(&TrainingConfig::default())
    }
}

impl From<&TrainingConfig> for TrainingPolicy {
    fn from(config: &TrainingConfig) -> Self {
        Self {
            max_sample_bytes: config.max_sample_bytes,
            allowed_mime_types: config
                .allowed_mime_types
                .iter()
                .map(|m| essence(m))
                .collect(),
            remote: config.remote,
        }
    }
}

/// Registers new voices from reference samples.
///
/// The sample is written to storage first and the identity registered last,
/// so a voice never appears in the registry without its audio. Any failure
/// after the write removes the stored sample again.
pub struct TrainingGateway<B: Backend> {
    backend: Arc<B>,
    registry: Arc<VoiceRegistry>,
    store: Arc<ReferenceStore>,
    policy: TrainingPolicy,
    suffix: fn() -> String,
}

impl<B: Backend> TrainingGateway<B> {
    pub fn new(
        backend: Arc<B>,
        registry: Arc<VoiceRegistry>,
        store: Arc<ReferenceStore>,
        policy: TrainingPolicy,
    ) -> Self {
        Self {
            backend,
            registry,
            store,
            policy,
            suffix: random_suffix,
        }
    }

    /// Replace the id suffix generator.
    pub fn with_suffix_fn(mut self, suffix: fn() -> String) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn policy(&self) -> &TrainingPolicy {
        &self.policy
    }

    /// Capture `request`'s sample as a new trained voice.
    pub fn train_voice(&self, request: TrainingRequest) -> Result<TrainedVoice, GatewayError> {
        let display_name = request.model_name.trim();
        if display_name.is_empty() {
            return Err(GatewayError::InvalidParameter(
                "a model name is required".to_string(),
            ));
        }

        self.validate_sample(&request.audio_sample)?;

        let id = format!("{}_{}", sanitize_model_name(display_name), (self.suffix)());

        let path = self.store.save(&id, &request.audio_sample).map_err(|e| {
            GatewayError::TrainingFailed(format!("could not store reference audio: {e}"))
        })?;

        match self.complete(&id, display_name, &path, &request.audio_sample) {
            Ok(trained) => {
                tracing::info!(
                    voice_id = %trained.voice.id,
                    status = %trained.training_status,
                    model_id = trained.model_id.as_deref(),
                    size = request.audio_sample.len(),
                    "Voice training completed"
                );
                Ok(trained)
            }
            Err(e) => {
                self.discard(&path);
                Err(e)
            }
        }
    }

    fn validate_sample(&self, sample: &AudioPayload) -> Result<(), GatewayError> {
        let mime = essence(&sample.mime_type);

        if !is_audio_mime(&mime) || !self.policy.allowed_mime_types.contains(&mime) {
            return Err(GatewayError::InvalidAudioSample(format!(
                "unsupported audio type '{}' (allowed: {})",
                sample.mime_type,
                self.policy.allowed_mime_types.join(", ")
            )));
        }

        if sample.is_empty() {
            return Err(GatewayError::InvalidAudioSample(
                "audio sample is empty".to_string(),
            ));
        }

        if sample.len() > self.policy.max_sample_bytes {
            return Err(GatewayError::InvalidAudioSample(format!(
                "audio sample is {} bytes, limit is {} bytes",
                sample.len(),
                self.policy.max_sample_bytes
            )));
        }

        Ok(())
    }

    /// Everything after the sample is on disk. Errors here trigger cleanup.
    fn complete(
        &self,
        id: &str,
        display_name: &str,
        path: &Path,
        sample: &AudioPayload,
    ) -> Result<TrainedVoice, GatewayError> {
        let (training_status, model_id) = if self.policy.remote {
            let (status, model_id) = self.train_remote(id, sample)?;
            (status, Some(model_id))
        } else {
            (TRAINING_STATUS_COMPLETED.to_string(), None)
        };

        let voice = VoiceIdentity::trained(id, display_name, path.to_path_buf(), &sample.mime_type);

        self.registry.register(voice.clone()).map_err(|e| {
            GatewayError::TrainingFailed(format!("could not register voice '{id}': {e}"))
        })?;

        Ok(TrainedVoice {
            voice,
            training_status,
            model_id,
        })
    }

    /// Returns the engine's status and model id.
    fn train_remote(
        &self,
        id: &str,
        sample: &AudioPayload,
    ) -> Result<(String, String), GatewayError> {
        // The engine keys voices by the minted id, the same id synthesis sends as `voiceId`
        let request = TrainRequest {
            model_name: id.to_string(),
            audio_data_uri: sample.to_data_uri(),
        };

        let response = self.backend.train(&request).map_err(|e| {
            tracing::warn!(voice_id = id, error = %e, "Engine training failed");
            GatewayError::from_training(e)
        })?;

        let model_id = match response.model_id {
            Some(model_id) if response.is_success() => model_id,
            _ => {
                return Err(GatewayError::TrainingFailed(format!(
                    "engine reported status '{}'",
                    response.training_status
                )));
            }
        };

        tracing::debug!(voice_id = id, model_id = %model_id, "Engine accepted training sample");
        Ok((response.training_status, model_id))
    }

    fn discard(&self, path: &Path) {
        if let Err(e) = self.store.remove(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to clean up reference audio");
        }
    }
}

/// Reduce a model name to alphanumerics, underscores and hyphens.
///
/// Spaces become underscores. Names with nothing left map to
/// [`UNNAMED_MODEL`].
pub fn sanitize_model_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if sanitized.is_empty() {
        UNNAMED_MODEL.to_string()
    } else {
        sanitized
    }
}

/// Six lowercase hex characters.
pub fn random_suffix() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(SUFFIX_LEN);
    hex
}
