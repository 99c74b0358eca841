//! Typewriter Engine
//!
//! Reveals a target string one character per tick. The revealed text is
//! always a prefix of the target; assigning a new target resets the reveal
//! and restarts it from the first character.
//!
//! Characters are Unicode scalar values, so multi-byte text is never split
//! inside a code point.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::timer::TimerHandle;

/// Target text and the part of it currently revealed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypewriterState {
    /// Complete text being revealed
    pub full_text: String,
    /// Revealed prefix of `full_text`
    pub display_text: String,
    /// Bumped on every assignment; stale ticks compare against it
    generation: u64,
}

impl TypewriterState {
    /// Whether the whole target is visible
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.display_text.len() == self.full_text.len()
    }

    /// Reveal the next character; returns false once nothing is left
    fn advance(&mut self) -> bool {
        let revealed = self.display_text.len();
        match self.full_text[revealed..].chars().next() {
            Some(ch) => {
                self.display_text.push(ch);
                true
            }
            None => false,
        }
    }
}

/// Owns the typing timer
#[derive(Debug)]
pub struct TypewriterEngine {
    tx: Arc<watch::Sender<TypewriterState>>,
    timer: TimerHandle,
    interval: Duration,
}

impl TypewriterEngine {
    /// Create an engine with nothing to show
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(TypewriterState::default());
        Self {
            tx: Arc::new(tx),
            timer: TimerHandle::idle(),
            interval,
        }
    }

    /// Start revealing `text` from the beginning
    ///
    /// Any reveal in flight is cancelled first, even when `text` equals the
    /// current target. Empty text schedules nothing.
    ///
    /// # Panics
    ///
    /// Non-empty text spawns the typing timer and must be set inside a Tokio
    /// runtime.
    pub fn set_full_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.timer.cancel();

        let empty = text.is_empty();
        let mut generation = 0;
        self.tx.send_modify(|state| {
            generation = state.generation.wrapping_add(1);
            *state = TypewriterState {
                full_text: text,
                display_text: String::new(),
                generation,
            };
        });

        if !empty {
            self.timer
                .restart(typing_loop(Arc::clone(&self.tx), generation, self.interval));
        }
    }

    /// Revealed prefix
    #[must_use]
    pub fn display_text(&self) -> String {
        self.tx.borrow().display_text.clone()
    }

    /// Current target
    #[must_use]
    pub fn full_text(&self) -> String {
        self.tx.borrow().full_text.clone()
    }

    /// Whether the whole target is visible
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.tx.borrow().is_complete()
    }

    /// Whether the typing timer is still running
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.timer.is_active()
    }

    /// Receiver that always holds the latest reveal
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TypewriterState> {
        self.tx.subscribe()
    }

    /// Stop typing, leaving the revealed prefix as it is
    pub fn shutdown(&mut self) {
        self.timer.cancel();
        self.tx.send_modify(|state| {
            state.generation = state.generation.wrapping_add(1);
        });
    }
}

fn typing_loop(
    tx: Arc<watch::Sender<TypewriterState>>,
    generation: u64,
    period: Duration,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let mut more = false;
            tx.send_if_modified(|state| {
                if state.generation != generation || !state.advance() {
                    return false;
                }
                more = !state.is_complete();
                true
            });
            if !more {
                return;
            }
        }
    }
}
