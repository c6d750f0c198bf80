//! Configuration types and layered loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Config files looked up in the working directory when no path is given.
const CONFIG_FILE_NAMES: &[&str] = &["tts-gateway", "tts-gateway.local"];

/// Prefix for environment overrides, e.g. `TTS_GATEWAY_ENGINE__URL`.
const ENV_PREFIX: &str = "TTS_GATEWAY";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub training: TrainingConfig,
    pub log: LogConfig,
}

/// Connection settings for the external synthesis engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the engine, without a trailing path.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts after a connection-level failure.
    pub max_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9280".to_string(),
            timeout_secs: 60,
            max_retries: 0,
        }
    }
}

impl EngineConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where the registry file and reference audio live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|home| home.join(".tts-gateway"))
            .unwrap_or_else(|| PathBuf::from(".tts-gateway"));

        Self { data_dir }
    }
}

impl StorageConfig {
    /// Directory holding `registry.json`.
    pub fn registry_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Directory holding trained reference audio.
    pub fn references_dir(&self) -> PathBuf {
        self.data_dir.join("references")
    }
}

/// Limits applied to uploaded training samples.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub max_sample_bytes: usize,
    pub allowed_mime_types: Vec<String>,
    /// Forward samples to the engine's train endpoint after capture.
    pub remote: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_sample_bytes: 5 * 1024 * 1024,
            allowed_mime_types: [
                "audio/wav",
                "audio/x-wav",
                "audio/wave",
                "audio/mpeg",
                "audio/mp3",
                "audio/ogg",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            remote: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load configuration from the default file locations and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// Load configuration, merging (lowest to highest priority) built-in
/// defaults, a TOML file and `TTS_GATEWAY_*` environment variables.
///
/// When `config_path` is given the file must exist.
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder
        .build()?
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {e}")))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Reject configurations that cannot work.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.engine.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine URL cannot be empty".to_string(),
        ));
    }

    if config.engine.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Engine timeout cannot be 0".to_string(),
        ));
    }

    if config.training.max_sample_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Training sample cap cannot be 0".to_string(),
        ));
    }

    if config.training.allowed_mime_types.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one training MIME type must be allowed".to_string(),
        ));
    }

    Ok(())
}

/// Log the effective configuration at startup.
pub fn log_config(config: &AppConfig) {
    tracing::debug!(
        engine_url = %config.engine.url,
        timeout_secs = config.engine.timeout_secs,
        max_retries = config.engine.max_retries,
        data_dir = %config.storage.data_dir.display(),
        max_sample_bytes = config.training.max_sample_bytes,
        remote_training = config.training.remote,
        "Configuration loaded"
    );
}
