//! End-to-end flows through the public API with the placeholder engine.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use tts_gateway::backend::StubBackend;
use tts_gateway::codec::{AudioPayload, encode};
use tts_gateway::gateway::{
    GatewayError, SynthesisGateway, SynthesisRequest, TRAINING_STATUS_COMPLETED, TrainingGateway,
    TrainingPolicy, TrainingRequest,
};
use tts_gateway::voice::{ReferenceStore, VoiceKind, VoiceRegistry};

struct Setup {
    temp_dir: TempDir,
    backend: Arc<StubBackend>,
    registry: Arc<VoiceRegistry>,
    store: Arc<ReferenceStore>,
}

impl Setup {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let registry = Arc::new(VoiceRegistry::open(temp_dir.path()).unwrap());
        let store = Arc::new(ReferenceStore::new(temp_dir.path().join("references")));
        Self {
            temp_dir,
            backend: Arc::new(StubBackend::new()),
            registry,
            store,
        }
    }

    fn synthesis(&self) -> SynthesisGateway<StubBackend> {
        SynthesisGateway::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
        )
    }

    fn training(&self) -> TrainingGateway<StubBackend> {
        TrainingGateway::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            TrainingPolicy::default(),
        )
    }
}

fn one_kb_wav() -> AudioPayload {
    let mut bytes = b"RIFF\x00\x00\x00\x00WAVE".to_vec();
    bytes.resize(1024, 0);
    AudioPayload::new(bytes, "audio/wav")
}

#[test]
fn train_then_synthesize_with_trained_voice() {
    let setup = Setup::new();

    let upload = one_kb_wav().to_data_uri();
    let trained = setup
        .training()
        .train_voice(TrainingRequest::from_data_uri("My Voice", &upload).unwrap())
        .unwrap();

    let id = &trained.voice.id;
    assert_eq!(trained.training_status, TRAINING_STATUS_COMPLETED);
    let suffix = id.strip_prefix("My_Voice_").unwrap();
    assert_eq!(suffix.len(), 6);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));

    let audio = setup
        .synthesis()
        .synthesize(&SynthesisRequest::new("hello", id))
        .unwrap();

    assert_eq!(audio.mime_type, "audio/wav");
    assert!(!audio.is_empty());
    assert_eq!(setup.backend.synthesize_calls(), 1);
    // Local capture does not call the engine's train endpoint
    assert_eq!(setup.backend.train_calls(), 0);
}

#[test]
fn empty_text_is_rejected_without_engine_call() {
    let setup = Setup::new();

    let result = setup
        .synthesis()
        .synthesize(&SynthesisRequest::new("", "default-male"));

    assert!(matches!(result, Err(GatewayError::InvalidParameter(_))));
    assert_eq!(setup.backend.synthesize_calls(), 0);
}

#[test]
fn unknown_voice_is_rejected_without_engine_call() {
    let setup = Setup::new();

    let result = setup
        .synthesis()
        .synthesize(&SynthesisRequest::new("hello", "does-not-exist"));

    assert!(matches!(result, Err(GatewayError::UnknownVoice(_))));
    assert_eq!(setup.backend.synthesize_calls(), 0);
}

#[test]
fn oversized_sample_persists_nothing() {
    let setup = Setup::new();

    let big = AudioPayload::new(vec![0u8; 6 * 1024 * 1024], "audio/wav");
    let result = setup
        .training()
        .train_voice(TrainingRequest::new("Too Big", big));

    assert!(matches!(result, Err(GatewayError::InvalidAudioSample(_))));
    assert!(!setup.temp_dir.path().join("references").exists());
    assert!(!setup.temp_dir.path().join("registry.json").exists());
}

#[test]
fn concurrent_training_with_same_name_yields_unique_ids() {
    let setup = Setup::new();
    let gateway = Arc::new(setup.training());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gateway = Arc::clone(&gateway);
            thread::spawn(move || gateway.train_voice(TrainingRequest::new("Choir", one_kb_wav())))
        })
        .collect();

    let ids: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap().voice.id)
        .collect();

    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| id.starts_with("Choir_")));

    let trained = setup
        .registry
        .list_voices()
        .unwrap()
        .into_iter()
        .filter(|v| v.kind == VoiceKind::Trained)
        .count();
    assert_eq!(trained, 8);
}

#[test]
fn trained_voices_survive_reopen() {
    let setup = Setup::new();
    let trained = setup
        .training()
        .train_voice(TrainingRequest::new("Keeper", one_kb_wav()))
        .unwrap();

    let reopened = VoiceRegistry::open(setup.temp_dir.path()).unwrap();
    let voices = reopened.list_voices().unwrap();

    assert_eq!(voices[0].id, "default-male");
    assert_eq!(voices[1].id, "default-female");
    assert_eq!(voices[2].id, trained.voice.id);
    assert!(reopened.resolve(&trained.voice.id).is_ok());
}

#[test]
fn malformed_upload_is_rejected() {
    let result = TrainingRequest::from_data_uri("Broken", "data:;base64,AAAA");
    assert!(matches!(result, Err(GatewayError::MalformedPayload(_))));

    let ok = TrainingRequest::from_data_uri("Fine", &encode(b"RIFF", "audio/wav"));
    assert!(ok.is_ok());
}
