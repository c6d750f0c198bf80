//! HTTP client for engine communication.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::EngineConfig;

use super::Backend;
use super::types::{
    BackendError, ErrorBody, HealthResponse, SynthesizeRequest, SynthesizeResponse, TrainRequest,
    TrainResponse,
};

/// HTTP-based engine client.
///
/// Every request is bounded by the configured timeout. Connection-level
/// failures are retried up to `max_retries` times; engine responses,
/// including error statuses, are never retried.
pub struct HttpBackend {
    base_url: String,
    client: Client,
    max_retries: u32,
}

impl HttpBackend {
    /// Create a new HTTP engine client.
    pub fn new(config: &EngineConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
            max_retries: config.max_retries,
        })
    }

    /// Get the base URL for this engine.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Send a request, retrying only when the engine was unreachable.
    fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Response, BackendError> {
        let mut attempt = 0;

        loop {
            match build().send() {
                Ok(response) => return check_status(response),
                Err(e) => {
                    let err = map_send_error(e);
                    if matches!(err, BackendError::ConnectionFailed(_)) && attempt < self.max_retries
                    {
                        attempt += 1;
                        tracing::warn!(attempt, error = %err, "Engine unreachable, retrying");
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

fn map_send_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(err.to_string())
    } else {
        BackendError::ConnectionFailed(err.to_string())
    }
}

/// Turn a non-success status into an error carrying the engine's message.
fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text() {
        Ok(body) => body,
        Err(e) => {
            return Err(BackendError::RequestFailed {
                status: status.as_u16(),
                message: format!("{status} (error body unreadable: {e})"),
            });
        }
    };
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no error detail")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };

    Err(BackendError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response.json().map_err(|e| {
        if e.is_timeout() {
            BackendError::Timeout(e.to_string())
        } else {
            BackendError::InvalidResponse(e.to_string())
        }
    })
}

impl Backend for HttpBackend {
    fn health(&self) -> Result<HealthResponse, BackendError> {
        let url = self.url("health");
        let response = self.send(|| self.client.get(&url))?;
        parse_json(response)
    }

    fn synthesize(&self, request: &SynthesizeRequest) -> Result<SynthesizeResponse, BackendError> {
        let url = self.url("synthesize");

        tracing::debug!(
            url = %url,
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            cloned = request.reference_audio_data_uri.is_some(),
            "Sending synthesize request"
        );

        let response = self.send(|| self.client.post(&url).json(request))?;
        parse_json(response)
    }

    fn train(&self, request: &TrainRequest) -> Result<TrainResponse, BackendError> {
        let url = self.url("train");

        tracing::debug!(url = %url, model_name = %request.model_name, "Sending train request");

        let response = self.send(|| self.client.post(&url).json(request))?;
        parse_json(response)
    }
}
