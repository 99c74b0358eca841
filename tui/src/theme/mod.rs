//! Theme and Colors
//!
//! The face is drawn in warm, soft tones on the terminal's own background;
//! expression cues (brows, frown marks, question marks) get accent colors so
//! they read at a glance.

use ratatui::style::Color;

// ============================================================================
// Face Palette
// ============================================================================

/// Eyes - dark, solid blocks
pub const FACE_EYES: Color = Color::Rgb(40, 40, 40);

/// Eyelids when blinking
pub const FACE_LIDS: Color = Color::Rgb(120, 90, 90);

/// Eyebrows
pub const FACE_BROWS: Color = Color::Rgb(110, 80, 60);

/// Mouth line
pub const FACE_MOUTH: Color = Color::Rgb(180, 100, 120);

// ============================================================================
// Expression Cues
// ============================================================================

/// Frown marks - muted red
pub const CUE_FROWN: Color = Color::Rgb(255, 120, 120);

/// Question marks - soft blue
pub const CUE_QUESTION: Color = Color::Rgb(150, 180, 255);

/// Sweat drop
pub const CUE_SWEAT: Color = Color::Rgb(100, 180, 255);

// ============================================================================
// UI Colors
// ============================================================================

/// Assistant text
pub const ASSISTANT_TEXT: Color = Color::Rgb(255, 218, 224);

/// Signature accent (borders, titles)
pub const ACCENT: Color = Color::Magenta;

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Busy yellow (waiting on the backend)
pub const BUSY_YELLOW: Color = Color::Rgb(255, 223, 128);

/// Talking green
pub const TALKING_GREEN: Color = Color::Rgb(120, 230, 120);
