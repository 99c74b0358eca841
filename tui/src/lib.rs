//! Voiceface TUI - Terminal face for the voice assistant
//!
//! Full-screen terminal UI drawing the assistant's animated face above a
//! dialogue box, driven by the headless `voiceface-core` session.
//!
//! # Architecture
//!
//! - **App**: Event loop, key handling, frame pacing
//! - **Face**: Pixel-art rendering of the core's feature set
//! - **Widgets**: Dialogue box and status bar
//! - **Theme**: Color palette

pub mod app;
pub mod face;
pub mod theme;
pub mod widgets;

pub use app::App;
