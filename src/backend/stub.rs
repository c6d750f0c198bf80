//! Placeholder engine that returns silent audio without doing inference.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::codec::encode;

use super::Backend;
use super::types::{
    BackendError, HealthResponse, SynthesizeRequest, SynthesizeResponse, TrainRequest,
    TrainResponse,
};

/// Engine double: every synthesis yields a short silent WAV clip and every
/// training request reports `completed`.
#[derive(Debug)]
pub struct StubBackend {
    sample_rate: u32,
    duration_ms: u32,
    synthesize_calls: AtomicUsize,
    train_calls: AtomicUsize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            sample_rate: 22_050,
            duration_ms: 250,
            synthesize_calls: AtomicUsize::new(0),
            train_calls: AtomicUsize::new(0),
        }
    }

    /// Length of the generated clip.
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }

    pub fn train_calls(&self) -> usize {
        self.train_calls.load(Ordering::SeqCst)
    }

    fn silent_wav(&self) -> Result<Vec<u8>, hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let samples = u64::from(self.sample_rate) * u64::from(self.duration_ms) / 1000;
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for _ in 0..samples {
            writer.write_sample(0i16)?;
        }
        writer.finalize()?;

        Ok(cursor.into_inner())
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StubBackend {
    fn health(&self) -> Result<HealthResponse, BackendError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            model: Some("stub".to_string()),
        })
    }

    fn synthesize(&self, request: &SynthesizeRequest) -> Result<SynthesizeResponse, BackendError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);

        let audio = self
            .silent_wav()
            .map_err(|e| BackendError::InvalidResponse(format!("stub audio: {e}")))?;

        tracing::debug!(
            voice_id = %request.voice_id,
            cloned = request.reference_audio_data_uri.is_some(),
            size = audio.len(),
            "Stub engine produced placeholder audio"
        );

        Ok(SynthesizeResponse {
            audio_data_uri: encode(&audio, "audio/wav"),
        })
    }

    fn train(&self, request: &TrainRequest) -> Result<TrainResponse, BackendError> {
        self.train_calls.fetch_add(1, Ordering::SeqCst);

        Ok(TrainResponse {
            training_status: "completed".to_string(),
            model_id: Some(request.model_name.clone()),
        })
    }
}
