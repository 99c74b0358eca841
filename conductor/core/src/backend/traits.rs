//! Voice Backend Traits
//!
//! The remote voice service records, transcribes, generates a reply and plays
//! it back on its own side. The core only needs two operations from it: start
//! an interaction and ask whether reply audio is still playing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Successful `POST /process_audio` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessAudioReply {
    /// Assistant reply text
    pub reply: String,
    /// Where the backend published the reply audio, if it says
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl ProcessAudioReply {
    /// A reply with no audio URL
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            audio_url: None,
        }
    }
}

/// `GET /audio_status` result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStatus {
    /// Whether reply audio is still playing
    pub playing: bool,
}

impl AudioStatus {
    /// Audio still playing
    pub const PLAYING: Self = Self { playing: true };
    /// Playback finished
    pub const FINISHED: Self = Self { playing: false };
}

/// Voice backend
///
/// Implement this to drive a [`crate::VoiceSession`] from something other
/// than the HTTP service (tests use scripted in-memory backends).
#[async_trait]
pub trait VoiceBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Start one interaction and wait for the reply text
    async fn process_audio(&self) -> Result<ProcessAudioReply, BackendError>;

    /// Ask whether the reply audio is still playing
    async fn audio_status(&self) -> Result<AudioStatus, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_parsing() {
        let reply: ProcessAudioReply =
            serde_json::from_str(r#"{"reply":"Hello there","audio_url":"/audio/1.mp3"}"#)
                .unwrap();
        assert_eq!(reply.reply, "Hello there");
        assert_eq!(reply.audio_url.as_deref(), Some("/audio/1.mp3"));

        let reply: ProcessAudioReply = serde_json::from_str(r#"{"reply":""}"#).unwrap();
        assert_eq!(reply, ProcessAudioReply::new(""));

        assert!(serde_json::from_str::<ProcessAudioReply>(r#"{"message":"Listening started."}"#)
            .is_err());
    }
}
