//! Layered configuration: defaults, then a TOML file, then environment.

mod settings;

pub use settings::{
    AppConfig, ConfigError, EngineConfig, LogConfig, StorageConfig, TrainingConfig, load_config,
    load_config_from_path, log_config, validate_config,
};
