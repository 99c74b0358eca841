//! Widgets
//!
//! Terminal widgets around the face: the dialogue box revealing the
//! assistant's text and the one-line status bar.

pub mod dialogue;
pub mod status;

pub use dialogue::DialogueBox;
pub use status::StatusBar;
