//! Session Events
//!
//! Completions reported by the tasks a [`crate::VoiceSession`] spawns. Tasks
//! never touch session state themselves; they send one of these back to the
//! owner, which applies it on its own loop.
//!
//! Every event carries the [`SessionId`] of the interaction that spawned the
//! task, so results from a superseded interaction can be recognised and
//! dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::ProcessAudioReply;
use crate::error::BackendError;

/// Identifier of one voice interaction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    /// The id following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Completion from a session task
#[derive(Debug)]
pub enum SessionEvent {
    /// The process-audio request finished
    ReplyReceived {
        /// Interaction that issued the request
        session: SessionId,
        /// Reply or failure
        result: Result<ProcessAudioReply, BackendError>,
    },

    /// A status poll reported that playback is over
    PlaybackFinished {
        /// Interaction being polled
        session: SessionId,
    },

    /// A status poll failed
    PollFailed {
        /// Interaction being polled
        session: SessionId,
        /// Failures in a row, including this one
        consecutive: u32,
        /// Error description
        error: String,
    },

    /// Polling stopped after too many failures in a row
    PollAbandoned {
        /// Interaction being polled
        session: SessionId,
        /// Failures in a row when polling stopped
        consecutive: u32,
    },
}

impl SessionEvent {
    /// Interaction this event belongs to
    #[must_use]
    pub const fn session(&self) -> SessionId {
        match self {
            Self::ReplyReceived { session, .. }
            | Self::PlaybackFinished { session }
            | Self::PollFailed { session, .. }
            | Self::PollAbandoned { session, .. } => *session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_increase() {
        let first = SessionId::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "session-1");
    }

    #[test]
    fn test_event_session() {
        let id = SessionId(7);
        let event = SessionEvent::PollFailed {
            session: id,
            consecutive: 1,
            error: "timeout".to_string(),
        };
        assert_eq!(event.session(), id);
    }
}
