//! Synthesis gateway: validates a request, resolves its voice and calls the engine.

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::backend::{Backend, HealthResponse, SynthesizeRequest};
use crate::codec::{AudioPayload, decode};
use crate::voice::{ReferenceStore, RegistryError, VoiceReference, VoiceRegistry};

use super::error::GatewayError;

pub const SPEED_RANGE: RangeInclusive<f32> = 0.5..=2.0;
pub const VARIABILITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const DEFAULT_VARIABILITY: f32 = 0.5;

/// What a caller asks to have spoken.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub speed: f32,
    pub variability: f32,
}

impl SynthesisRequest {
    /// Create a request with default speed and variability.
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            speed: DEFAULT_SPEED,
            variability: DEFAULT_VARIABILITY,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_variability(mut self, variability: f32) -> Self {
        self.variability = variability;
        self
    }

    /// Check text and parameter domains. Out-of-range values are rejected,
    /// never clamped.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.text.trim().is_empty() {
            return Err(GatewayError::InvalidParameter(
                "text to synthesize is required".to_string(),
            ));
        }

        if self.voice_id.trim().is_empty() {
            return Err(GatewayError::InvalidParameter(
                "a voice must be selected".to_string(),
            ));
        }

        if !SPEED_RANGE.contains(&self.speed) {
            return Err(GatewayError::InvalidParameter(format!(
                "speed {} is outside {}..={}",
                self.speed,
                SPEED_RANGE.start(),
                SPEED_RANGE.end()
            )));
        }

        if !VARIABILITY_RANGE.contains(&self.variability) {
            return Err(GatewayError::InvalidParameter(format!(
                "variability {} is outside {}..={}",
                self.variability,
                VARIABILITY_RANGE.start(),
                VARIABILITY_RANGE.end()
            )));
        }

        Ok(())
    }
}

/// Translates synthesis requests into engine calls.
///
/// Holds no per-request state; any number of threads may call
/// [`SynthesisGateway::synthesize`] at once. A failed engine call is
/// reported once and never retried here.
pub struct SynthesisGateway<B: Backend> {
    backend: Arc<B>,
    registry: Arc<VoiceRegistry>,
    store: Arc<ReferenceStore>,
}

impl<B: Backend> SynthesisGateway<B> {
    pub fn new(backend: Arc<B>, registry: Arc<VoiceRegistry>, store: Arc<ReferenceStore>) -> Self {
        Self {
            backend,
            registry,
            store,
        }
    }

    /// Check engine health status.
    pub fn health_check(&self) -> Result<HealthResponse, GatewayError> {
        self.backend
            .health()
            .map_err(|e| GatewayError::EngineUnavailable(e.to_string()))
    }

    /// Synthesize speech for `request`.
    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioPayload, GatewayError> {
        request.validate()?;

        let reference = self
            .registry
            .resolve(&request.voice_id)
            .map_err(resolve_error)?;

        let mut engine_request = SynthesizeRequest::new(&request.text, &request.voice_id)
            .with_speed(request.speed)
            .with_variability(request.variability);

        if let VoiceReference::Stored { path, mime_type } = &reference {
            let bytes = self.store.read(path).map_err(|e| {
                GatewayError::UnknownVoice(format!(
                    "reference audio for '{}' is unreadable: {e}",
                    request.voice_id
                ))
            })?;
            engine_request =
                engine_request.with_reference_audio(AudioPayload::new(bytes, mime_type).to_data_uri());
        }

        tracing::debug!(
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            speed = request.speed,
            variability = request.variability,
            cloned = matches!(reference, VoiceReference::Stored { .. }),
            "Dispatching synthesis"
        );

        let response = self.backend.synthesize(&engine_request).map_err(|e| {
            tracing::warn!(voice_id = %request.voice_id, error = %e, "Engine synthesis failed");
            GatewayError::from_synthesis(e)
        })?;

        let payload = validate_output(&response.audio_data_uri)?;

        tracing::info!(
            voice_id = %request.voice_id,
            mime_type = %payload.mime_type,
            size = payload.len(),
            "Synthesis completed"
        );

        Ok(payload)
    }
}

fn resolve_error(err: RegistryError) -> GatewayError {
    match err {
        RegistryError::UnknownVoice(id) => {
            GatewayError::UnknownVoice(format!("no voice registered as '{id}'"))
        }
        RegistryError::ReferenceMissing { .. } => GatewayError::UnknownVoice(err.to_string()),
        other => GatewayError::SynthesisFailed(other.to_string()),
    }
}

/// Decode the engine's audio and reject anything that is not usable audio.
fn validate_output(data_uri: &str) -> Result<AudioPayload, GatewayError> {
    let payload = decode(data_uri).map_err(|e| {
        GatewayError::SynthesisFailed(format!("engine returned unreadable audio: {e}"))
    })?;

    if !payload.is_audio() {
        return Err(GatewayError::SynthesisFailed(format!(
            "engine returned non-audio content '{}'",
            payload.mime_type
        )));
    }

    if payload.is_empty() {
        return Err(GatewayError::SynthesisFailed(
            "engine returned empty audio".to_string(),
        ));
    }

    Ok(payload)
}
