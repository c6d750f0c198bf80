//! CLI argument parsing and validation.

mod args;

pub use args::{Args, SampleParseError, TrainingSample, mime_for_path};

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use tempfile::{Builder, NamedTempFile};

    fn wav_file() -> NamedTempFile {
        Builder::new().suffix(".wav").tempfile().unwrap()
    }

    // ===========================================
    // TrainingSample::parse tests
    // ===========================================

    #[test]
    fn test_parse_sample_valid() {
        let temp_file = wav_file();
        let path = temp_file.path().to_str().unwrap();
        let input = format!("{path};My Voice");

        let sample = TrainingSample::parse(&input).unwrap();

        assert_eq!(sample.model_name, "My Voice");
        assert_eq!(sample.audio_path, PathBuf::from(path));
        assert_eq!(sample.mime_type, "audio/wav");
    }

    #[test]
    fn test_parse_sample_missing_semicolon() {
        let result = TrainingSample::parse("sample.wav no semicolon here");
        assert!(matches!(result, Err(SampleParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_sample_empty_name() {
        let temp_file = wav_file();
        let path = temp_file.path().to_str().unwrap();

        let result = TrainingSample::parse(&format!("{path};  "));
        assert!(matches!(result, Err(SampleParseError::EmptyModelName)));
    }

    #[test]
    fn test_parse_sample_file_not_found() {
        let result = TrainingSample::parse("/nonexistent/path/sample.wav;Name");
        assert!(matches!(result, Err(SampleParseError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_sample_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let result = TrainingSample::parse(&format!("{path};Name"));
        assert!(matches!(result, Err(SampleParseError::UnknownAudioType(_))));
    }

    #[test]
    fn test_parse_sample_trims_and_keeps_semicolons() {
        let temp_file = wav_file();
        let path = temp_file.path().to_str().unwrap();

        let sample = TrainingSample::parse(&format!("  {path}  ;  Voice; take two  ")).unwrap();
        assert_eq!(sample.model_name, "Voice; take two");
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.WAV")), Some("audio/wav"));
        assert_eq!(mime_for_path(Path::new("a.mp3")), Some("audio/mpeg"));
        assert_eq!(mime_for_path(Path::new("a.ogg")), Some("audio/ogg"));
        assert_eq!(mime_for_path(Path::new("a")), None);
    }

    // ===========================================
    // Args tests
    // ===========================================

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["tts-gateway"]);
        assert_eq!(args.name, "default-male");
        assert_eq!(args.speed, 1.0);
        assert_eq!(args.variability, 0.5);
        assert_eq!(args.output, PathBuf::from("output.wav"));
        assert!(!args.stub);
    }

    #[test]
    fn test_args_generate_with_overrides() {
        let args = Args::parse_from([
            "tts-gateway",
            "-g",
            "hello",
            "-n",
            "My_Voice_abc123",
            "--speed",
            "1.5",
            "--endpoint",
            "http://gpu:9000",
            "--timeout",
            "10",
        ]);
        assert_eq!(args.generate.as_deref(), Some("hello"));
        assert_eq!(args.name, "My_Voice_abc123");
        assert_eq!(args.speed, 1.5);
        assert_eq!(args.endpoint.as_deref(), Some("http://gpu:9000"));
        assert_eq!(args.timeout, Some(10));
    }
}
