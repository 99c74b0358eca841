//! Voiceface Core - Headless Orchestration for an Animated Voice Assistant
//!
//! This crate holds everything behind the assistant's face except drawing
//! it: the expression state machine with its blink timer, the typewriter
//! that reveals dialogue text, and the session that talks to the remote
//! voice service. It can drive the TUI or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//!  ┌───────────────────────── UI Surface ─────────────────────────┐
//!  │   face widget        dialogue box         status line        │
//!  └──────▲────────────────────▲─────────────────────▲────────────┘
//!         │ watch<FaceState>   │ watch<Typewriter>   │ SessionMessage
//!  ┌──────┴────────────────────┴─────────────────────┴────────────┐
//!  │  ExpressionController   TypewriterEngine                     │
//!  │     (blink timer)        (typing timer)                      │
//!  │          ▲                    ▲                               │
//!  │          └──── VoiceSession ──┘  (request task, poll timer)  │
//!  └───────────────────────┬──────────────────────────────────────┘
//!                          │ HTTP
//!                   ┌──────┴──────┐
//!                   │voice service│
//!                   └─────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`VoiceSession`]: Runs interactions and keeps face and text in step
//! - [`ExpressionController`]: Expression to feature-set mapping plus blinking
//! - [`TypewriterEngine`]: Character-by-character text reveal
//! - [`VoiceBackend`]: The two remote operations the session needs
//! - [`SessionMessage`]: Transitions reported to the surface
//!
//! # Quick Start
//!
//! ```ignore
//! use voiceface_core::{FaceConfig, HttpVoiceBackend, VoiceSession};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FaceConfig::from_env();
//!     let backend = HttpVoiceBackend::from_config(&config.backend)?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut session = VoiceSession::new(backend, config, tx);
//!
//!     session.start_interaction().await;
//!     session.run_until_idle().await;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         println!("{msg:?}");
//!     }
//!     println!("{}", session.full_text());
//!     Ok(())
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod expression;
pub mod messages;
pub mod session;
pub mod timer;
pub mod typewriter;

// Re-exports for convenience
pub use backend::{AudioStatus, HttpVoiceBackend, ProcessAudioReply, VoiceBackend};
pub use config::{
    BackendConfig, FaceConfig, MessagesConfig, PollFailurePolicy, TimingConfig,
    DEFAULT_BACKEND_URL, DEFAULT_MAX_POLL_FAILURES,
};
pub use error::{BackendError, ConfigError};
pub use events::{SessionEvent, SessionId};
pub use expression::{
    EyebrowPosture, Expression, ExpressionController, FaceState, FeatureSet, MouthShape,
};
pub use messages::SessionMessage;
pub use session::{SessionState, VoiceSession};
pub use timer::TimerHandle;
pub use typewriter::{TypewriterEngine, TypewriterState};
