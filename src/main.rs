//! tts-gateway CLI entry point.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tts_gateway::backend::{Backend, StubBackend, create_backend};
use tts_gateway::cli::{Args, TrainingSample};
use tts_gateway::codec::AudioPayload;
use tts_gateway::config::{AppConfig, load_config_from_path, log_config, validate_config};
use tts_gateway::gateway::{
    SynthesisGateway, SynthesisRequest, TrainingGateway, TrainingPolicy, TrainingRequest,
};
use tts_gateway::voice::{ReferenceStore, VoiceKind, VoiceRegistry};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config_from_path(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(endpoint) = &args.endpoint {
        config.engine.url = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        config.engine.timeout_secs = timeout;
    }
    validate_config(&config).context("Invalid configuration")?;

    init_logging(&config, args.verbose);
    log_config(&config);

    if args.stub {
        run(&args, &config, StubBackend::new())
    } else {
        let backend = create_backend(&config.engine).context("Failed to create engine client")?;
        run(&args, &config, backend)
    }
}

fn init_logging(config: &AppConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.log.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<B: Backend>(args: &Args, config: &AppConfig, backend: B) -> Result<()> {
    let backend = Arc::new(backend);
    let registry = Arc::new(
        VoiceRegistry::open(config.storage.registry_dir()).context("Failed to open voice registry")?,
    );
    let store = Arc::new(ReferenceStore::new(config.storage.references_dir()));

    let synthesis = SynthesisGateway::new(
        Arc::clone(&backend),
        Arc::clone(&registry),
        Arc::clone(&store),
    );

    // Handle utility commands first
    if args.health {
        let health = synthesis.health_check().context("Engine health check failed")?;
        println!("Engine status: {}", health.status);
        if let Some(model) = health.model {
            println!("  Model: {model}");
        }
        return Ok(());
    }

    if args.list_voices {
        return list_voices(&registry);
    }

    let mut voice_id = args.name.clone();

    if let Some(sample_arg) = &args.train {
        let sample = TrainingSample::parse(sample_arg)?;
        let bytes = fs::read(&sample.audio_path)
            .with_context(|| format!("Failed to read {}", sample.audio_path.display()))?;

        let training = TrainingGateway::new(
            Arc::clone(&backend),
            Arc::clone(&registry),
            Arc::clone(&store),
            TrainingPolicy::from(&config.training),
        );
        let trained = training
            .train_voice(TrainingRequest::new(
                sample.model_name,
                AudioPayload::new(bytes, sample.mime_type),
            ))
            .context("Failed to train voice")?;

        println!("Voice trained: {}", trained.voice.id);
        println!("  Name: {}", trained.voice.display_name);
        println!("  Status: {}", trained.training_status);

        // If no generate flag, just train and exit
        if args.generate.is_none() {
            return Ok(());
        }
        voice_id = trained.voice.id;
    }

    if let Some(text) = &args.generate {
        return generate_speech(&synthesis, text, &voice_id, args);
    }

    eprintln!("No action specified. Use -t to train a voice or -g to generate speech.");
    eprintln!("Run with --help for usage information.");

    Ok(())
}

fn list_voices(registry: &VoiceRegistry) -> Result<()> {
    let voices = registry.list_voices().context("Failed to list voices")?;

    println!("Available voices:");
    for voice in voices {
        let kind = match voice.kind {
            VoiceKind::BuiltIn => "built-in",
            VoiceKind::Trained => "trained",
        };
        println!("  {} ({kind})", voice.id);
        println!("    Name: {}", voice.display_name);
        if let Some(created_at) = voice.created_at {
            println!("    Created: {created_at}");
        }
    }

    Ok(())
}

fn generate_speech<B: Backend>(
    synthesis: &SynthesisGateway<B>,
    text: &str,
    voice_id: &str,
    args: &Args,
) -> Result<()> {
    println!("Generating speech...");
    println!("  Voice: {voice_id}");
    println!("  Speed: {:.1}x", args.speed);

    let request = SynthesisRequest::new(text, voice_id)
        .with_speed(args.speed)
        .with_variability(args.variability);

    let audio = synthesis
        .synthesize(&request)
        .context("Failed to synthesize speech")?;

    fs::write(&args.output, &audio.bytes)
        .with_context(|| format!("Failed to write audio to: {}", args.output.display()))?;

    println!("Audio saved to: {}", args.output.display());
    println!("  Format: {}", audio.mime_type);
    println!("  Size: {} bytes", audio.len());

    Ok(())
}
