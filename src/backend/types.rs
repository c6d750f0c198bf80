//! Engine request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when communicating with the engine.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Engine returned {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// True when the engine could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            BackendError::ConnectionFailed(_) | BackendError::Timeout(_)
        )
    }
}

/// Health check response from the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Body of `POST /synthesize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub text: String,
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Best effort: engines are free to ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variability: Option<f32>,
    /// Reference audio for cloned voices. Absent means the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_audio_data_uri: Option<String>,
}

impl SynthesizeRequest {
    /// Create a new synthesis request.
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            speed: None,
            variability: None,
            reference_audio_data_uri: None,
        }
    }

    /// Set the speech speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_variability(mut self, variability: f32) -> Self {
        self.variability = Some(variability);
        self
    }

    /// Attach reference audio as a data URI.
    pub fn with_reference_audio(mut self, data_uri: impl Into<String>) -> Self {
        self.reference_audio_data_uri = Some(data_uri.into());
        self
    }
}

/// Body returned by `POST /synthesize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    pub audio_data_uri: String,
}

/// Body of `POST /train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub model_name: String,
    pub audio_data_uri: String,
}

/// Body returned by `POST /train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    pub training_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl TrainResponse {
    /// Whether the status reports success. `modelId` is only meaningful then.
    pub fn is_success(&self) -> bool {
        matches!(
            self.training_status.to_ascii_lowercase().as_str(),
            "completed" | "complete" | "success" | "succeeded"
        )
    }
}

/// Error body sent alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
