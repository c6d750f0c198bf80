//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gateway::{DEFAULT_SPEED, DEFAULT_VARIABILITY};

/// Voice registry and synthesis gateway.
#[derive(Parser, Debug)]
#[command(name = "tts-gateway")]
#[command(about = "Synthesize speech and register cloned voices through an external TTS engine")]
#[command(version)]
pub struct Args {
    /// Training sample with model name: "sample.wav;Model Name"
    #[arg(short, long)]
    pub train: Option<String>,

    /// Text to generate speech from
    #[arg(short, long)]
    pub generate: Option<String>,

    /// Voice id to speak with
    #[arg(short, long, default_value = "default-male")]
    pub name: String,

    /// Output audio file
    #[arg(short, long, default_value = "output.wav")]
    pub output: PathBuf,

    /// Speech speed multiplier (0.5 to 2.0)
    #[arg(short, long, default_value_t = DEFAULT_SPEED)]
    pub speed: f32,

    /// Delivery variability (0.0 to 1.0); engines may ignore it
    #[arg(long, default_value_t = DEFAULT_VARIABILITY)]
    pub variability: f32,

    /// List all registered voices
    #[arg(long)]
    pub list_voices: bool,

    /// Check that the engine is reachable
    #[arg(long)]
    pub health: bool,

    /// Use the built-in placeholder engine instead of HTTP
    #[arg(long)]
    pub stub: bool,

    /// Configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Engine base URL, overrides configuration
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Engine request timeout in seconds, overrides configuration
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parsed training sample argument.
#[derive(Debug, Clone)]
pub struct TrainingSample {
    /// Path to the audio file.
    pub audio_path: PathBuf,
    /// Human-readable name for the new voice.
    pub model_name: String,
    /// MIME type inferred from the file extension.
    pub mime_type: &'static str,
}

/// Errors that can occur when parsing a training sample argument.
#[derive(Error, Debug)]
pub enum SampleParseError {
    #[error("Invalid format: {0}. Expected 'sample.wav;Model Name'")]
    InvalidFormat(String),

    #[error("Audio file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Model name cannot be empty")]
    EmptyModelName,

    #[error("Unrecognized audio file extension: {0}")]
    UnknownAudioType(PathBuf),
}

impl TrainingSample {
    /// Parse a sample from "sample.wav;Model Name" format.
    ///
    /// # Examples
    /// ```
    /// use tts_gateway::cli::TrainingSample;
    /// let sample = TrainingSample::parse("sample.wav;My Voice");
    /// ```
    pub fn parse(input: &str) -> Result<Self, SampleParseError> {
        // Split on first semicolon only (names may contain semicolons)
        let Some((path, name)) = input.split_once(';') else {
            return Err(SampleParseError::InvalidFormat(
                "Missing semicolon separator".to_string(),
            ));
        };

        let audio_path = PathBuf::from(path.trim());
        let model_name = name.trim().to_string();

        if !audio_path.exists() {
            return Err(SampleParseError::FileNotFound(audio_path));
        }

        if model_name.is_empty() {
            return Err(SampleParseError::EmptyModelName);
        }

        let mime_type = mime_for_path(&audio_path)
            .ok_or_else(|| SampleParseError::UnknownAudioType(audio_path.clone()))?;

        Ok(Self {
            audio_path,
            model_name,
            mime_type,
        })
    }
}

/// Guess an audio MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "wav" | "wave" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "ogg" | "oga" | "opus" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        "webm" => Some("audio/webm"),
        _ => None,
    }
}
