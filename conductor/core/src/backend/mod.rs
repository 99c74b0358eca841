//! Voice Backend Integration
//!
//! Access to the remote voice service (speech recognition, reply generation
//! and audio playback all happen there) through a common trait interface.
//!
//! # Available Backends
//!
//! - **HTTP**: the JSON API served by the voice service (default)
//!
//! # Usage
//!
//! ```ignore
//! use voiceface_core::backend::{HttpVoiceBackend, VoiceBackend};
//!
//! let backend = HttpVoiceBackend::new("http://localhost:5001", None)?;
//! let reply = backend.process_audio().await?;
//! let status = backend.audio_status().await?;
//! ```

mod http;
mod traits;

pub use http::HttpVoiceBackend;
pub use traits::{AudioStatus, ProcessAudioReply, VoiceBackend};
