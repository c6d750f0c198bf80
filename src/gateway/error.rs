//! Errors surfaced by gateway operations.

use thiserror::Error;

use crate::backend::BackendError;
use crate::codec::CodecError;

/// Every failure a caller can observe from the gateways.
///
/// Each variant carries enough detail to tell the user what went wrong and
/// whether retrying makes sense.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    #[error("Duplicate voice: {0}")]
    DuplicateVoice(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid audio sample: {0}")]
    InvalidAudioSample(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Training failed: {0}")]
    TrainingFailed(String),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl GatewayError {
    /// Map an engine failure during synthesis.
    pub(crate) fn from_synthesis(err: BackendError) -> Self {
        if err.is_unavailable() {
            GatewayError::EngineUnavailable(err.to_string())
        } else {
            GatewayError::SynthesisFailed(err.to_string())
        }
    }

    /// Map an engine failure during training.
    pub(crate) fn from_training(err: BackendError) -> Self {
        if err.is_unavailable() {
            GatewayError::EngineUnavailable(err.to_string())
        } else {
            GatewayError::TrainingFailed(err.to_string())
        }
    }

    /// Whether the same request might succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::EngineUnavailable(_) | GatewayError::SynthesisFailed(_)
        )
    }
}

impl From<CodecError> for GatewayError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::MalformedPayload(detail) => GatewayError::MalformedPayload(detail),
        }
    }
}
