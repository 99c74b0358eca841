//! HTTP Voice Backend
//!
//! Talks to the voice service over its JSON API:
//! - `POST /process_audio` - run one listen/reply cycle, returns `{ reply, audio_url? }`
//! - `GET /audio_status` - returns `{ playing }`
//!
//! Some service builds answer `/audio_status` with `{ state, has_new, reply }`
//! instead; `state == "talking"` is read as still playing.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{AudioStatus, ProcessAudioReply, VoiceBackend};
use crate::config::BackendConfig;
use crate::error::BackendError;

/// Raw status body accepting both shapes the service emits
#[derive(Debug, Deserialize)]
struct RawAudioStatus {
    playing: Option<bool>,
    state: Option<String>,
}

impl TryFrom<RawAudioStatus> for AudioStatus {
    type Error = BackendError;

    fn try_from(raw: RawAudioStatus) -> Result<Self, Self::Error> {
        match (raw.playing, raw.state) {
            (Some(playing), _) => Ok(Self { playing }),
            (None, Some(state)) => Ok(Self {
                playing: state.eq_ignore_ascii_case("talking"),
            }),
            (None, None) => Err(BackendError::Malformed(
                "audio status has neither `playing` nor `state`".to_string(),
            )),
        }
    }
}

/// HTTP voice backend client
#[derive(Clone, Debug)]
pub struct HttpVoiceBackend {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpVoiceBackend {
    /// Create a client for `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: builder.build()?,
        })
    }

    /// Create from `BackendConfig`
    ///
    /// # Errors
    ///
    /// Same as [`HttpVoiceBackend::new`].
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    /// Base URL in use
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn process_audio_url(&self) -> String {
        format!("{}/process_audio", self.base_url)
    }

    fn audio_status_url(&self) -> String {
        format!("{}/audio_status", self.base_url)
    }

    /// Fail on non-success status, keeping the body for the error
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Read the body and decode it as `T`
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl VoiceBackend for HttpVoiceBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn process_audio(&self) -> Result<ProcessAudioReply, BackendError> {
        let response = self
            .http_client
            .post(self.process_audio_url())
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Self::decode(response).await
    }

    async fn audio_status(&self) -> Result<AudioStatus, BackendError> {
        let response = self.http_client.get(self.audio_status_url()).send().await?;
        let response = Self::check_status(response).await?;
        let raw: RawAudioStatus = Self::decode(response).await?;
        AudioStatus::try_from(raw)
    }
}
