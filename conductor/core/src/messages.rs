//! Session Messages
//!
//! Messages sent from a [`crate::VoiceSession`] to the surface rendering it.
//! They report every transition in order, which is what a status line or a
//! transcript needs; the face and dialogue box themselves read the latest
//! values from the components' `watch` receivers.

use serde::{Deserialize, Serialize};

use crate::events::SessionId;
use crate::expression::Expression;
use crate::session::SessionState;

/// Messages from the session to a surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMessage {
    /// The face switched expression
    ExpressionChanged {
        /// New expression
        expression: Expression,
    },

    /// A new text started revealing
    FullTextChanged {
        /// Complete target text
        text: String,
    },

    /// The session moved between idle, awaiting reply and polling
    StateChanged {
        /// Interaction the change belongs to
        session: SessionId,
        /// New state
        state: SessionState,
    },

    /// An audio-status poll failed (polling may continue)
    PollFailed {
        /// Interaction being polled
        session: SessionId,
        /// Failures in a row
        consecutive: u32,
        /// Error description
        error: String,
    },
}
