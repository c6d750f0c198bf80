//! Communication with the external synthesis engine.
//!
//! Provides the [`Backend`] trait plus an HTTP implementation and a
//! placeholder implementation that fabricates silent audio.

mod client;
mod stub;
mod types;

pub use client::HttpBackend;
pub use stub::StubBackend;
pub use types::{
    BackendError, HealthResponse, SynthesizeRequest, SynthesizeResponse, TrainRequest,
    TrainResponse,
};

use crate::config::EngineConfig;

/// Trait for engine communication.
///
/// This trait abstracts the wire calls to the engine, allowing for mock
/// implementations in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Backend: Send + Sync {
    /// Check engine health status.
    fn health(&self) -> Result<HealthResponse, BackendError>;

    /// Synthesize speech.
    ///
    /// # Returns
    /// The engine's response carrying audio as a data URI. The caller is
    /// responsible for validating it.
    fn synthesize(&self, request: &SynthesizeRequest) -> Result<SynthesizeResponse, BackendError>;

    /// Hand a reference sample to the engine for training.
    fn train(&self, request: &TrainRequest) -> Result<TrainResponse, BackendError>;
}

/// Create an HTTP backend for the configured engine.
pub fn create_backend(config: &EngineConfig) -> Result<HttpBackend, BackendError> {
    HttpBackend::new(config)
}
