//! Request gateways between callers and the synthesis engine.
//!
//! [`SynthesisGateway`] turns a text/voice request into an engine call and
//! validates the audio that comes back. [`TrainingGateway`] turns an uploaded
//! sample into a new registered voice.

mod error;
mod synthesis;
mod training;

pub use error::GatewayError;
pub use synthesis::{
    DEFAULT_SPEED, DEFAULT_VARIABILITY, SPEED_RANGE, SynthesisGateway, SynthesisRequest,
    VARIABILITY_RANGE,
};
pub use training::{
    TRAINING_STATUS_COMPLETED, TrainedVoice, TrainingGateway, TrainingPolicy, TrainingRequest,
    UNNAMED_MODEL, random_suffix, sanitize_model_name,
};
