//! Voice Session
//!
//! Drives one voice interaction after another against a [`VoiceBackend`],
//! keeping the face and the dialogue text in step with the remote side.
//!
//! # Protocol
//!
//! ```text
//! start_interaction()
//!     ├─ Thinking + listening placeholder          (AwaitingReply)
//!     ├─ POST /process_audio
//!     │     ├─ ok  → reply text + Talking          (Polling)
//!     │     │        └─ every poll interval: GET /audio_status
//!     │     │              └─ playing == false → Idle
//!     │     └─ err → error text + Idle             (Idle)
//! ```
//!
//! # Event Loop
//!
//! The session owns all state. The request and the poll loop run as spawned
//! tasks that only report back through [`SessionEvent`]s; the owner applies
//! them with [`VoiceSession::handle_event`] (or the `step` and
//! `process_pending` helpers). Each interaction gets a fresh [`SessionId`]
//! and events tagged with an older id are dropped, so a superseded
//! interaction can never move the face.
//!
//! [`SessionMessage`]s go to the surface with `try_send`: a surface that
//! stops reading loses reports, never the session itself.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::backend::VoiceBackend;
use crate::config::{FaceConfig, PollFailurePolicy};
use crate::events::{SessionEvent, SessionId};
use crate::expression::{Expression, ExpressionController, FaceState, FeatureSet};
use crate::messages::SessionMessage;
use crate::timer::TimerHandle;
use crate::typewriter::{TypewriterEngine, TypewriterState};

/// Where the current interaction is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No interaction running
    #[default]
    Idle,
    /// Waiting for the process-audio reply
    AwaitingReply,
    /// Reply audio playing, status being polled
    Polling,
}

impl SessionState {
    /// Short label for status lines
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingReply => "awaiting reply",
            Self::Polling => "playing reply",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Orchestrates expression, dialogue text and the remote voice service
pub struct VoiceSession<B: VoiceBackend + 'static> {
    config: FaceConfig,
    backend: Arc<B>,
    expression: ExpressionController,
    typewriter: TypewriterEngine,
    state: SessionState,
    session: SessionId,
    /// In-flight process-audio request
    request: TimerHandle,
    /// Audio-status poll loop
    poll: TimerHandle,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    tx: mpsc::Sender<SessionMessage>,
}

impl<B: VoiceBackend + 'static> VoiceSession<B> {
    /// Create a session showing the idle face and revealing the greeting
    ///
    /// # Panics
    ///
    /// Starts the typing timer for the greeting, so it must be called inside
    /// a Tokio runtime.
    pub fn new(backend: B, config: FaceConfig, tx: mpsc::Sender<SessionMessage>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let expression = ExpressionController::new(&config.timing);
        let mut typewriter = TypewriterEngine::new(config.timing.typing_interval);
        typewriter.set_full_text(config.messages.greeting.clone());

        tracing::info!(backend = backend.name(), "Voice session created");

        Self {
            config,
            backend: Arc::new(backend),
            expression,
            typewriter,
            state: SessionState::Idle,
            session: SessionId::default(),
            request: TimerHandle::idle(),
            poll: TimerHandle::idle(),
            events_tx,
            events_rx,
            tx,
        }
    }

    /// Id of the current (or last) interaction
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    /// Current session state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    /// Backend in use
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current expression
    #[must_use]
    pub fn expression(&self) -> Expression {
        self.expression.expression()
    }

    /// Current feature set
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.expression.features()
    }

    /// Full face snapshot (expression, features, blink)
    #[must_use]
    pub fn face(&self) -> FaceState {
        self.expression.snapshot()
    }

    /// Text revealed so far
    #[must_use]
    pub fn display_text(&self) -> String {
        self.typewriter.display_text()
    }

    /// Text being revealed
    #[must_use]
    pub fn full_text(&self) -> String {
        self.typewriter.full_text()
    }

    /// Whether the audio-status poll loop is running
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poll.is_active()
    }

    /// Whether a process-audio request is in flight
    #[must_use]
    pub fn is_request_pending(&self) -> bool {
        self.request.is_active()
    }

    /// Whether the blink timer is scheduled
    #[must_use]
    pub fn is_blink_timer_active(&self) -> bool {
        self.expression.is_blink_timer_active()
    }

    /// Whether the typing timer is still revealing text
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typewriter.is_typing()
    }

    /// Receiver holding the latest face
    #[must_use]
    pub fn subscribe_face(&self) -> watch::Receiver<FaceState> {
        self.expression.subscribe()
    }

    /// Receiver holding the latest typewriter state
    #[must_use]
    pub fn subscribe_text(&self) -> watch::Receiver<TypewriterState> {
        self.typewriter.subscribe()
    }

    /// Start a new interaction, superseding any running one
    pub async fn start_interaction(&mut self) {
        self.request.cancel();
        self.poll.cancel();
        self.session = self.session.next();

        tracing::info!(session = %self.session, "Starting voice interaction");

        self.set_expression(Expression::Thinking);
        let listening = self.config.messages.listening.clone();
        self.set_full_text(listening);
        self.set_state(SessionState::AwaitingReply);

        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        let session = self.session;
        self.request.restart(async move {
            let result = backend.process_audio().await;
            // The receiver lives as long as the session
            let _ = events.send(SessionEvent::ReplyReceived { session, result });
        });
    }

    /// Force an expression without touching the session (debug shortcut)
    pub async fn force_expression(&mut self, expression: Expression) {
        tracing::debug!(expression = %expression, "Forcing expression");
        self.set_expression(expression);
    }

    /// Apply one event reported by a session task
    pub async fn handle_event(&mut self, event: SessionEvent) {
        if event.session() != self.session {
            tracing::debug!(
                event_session = %event.session(),
                current = %self.session,
                "Ignoring event from superseded interaction"
            );
            return;
        }

        match event {
            SessionEvent::ReplyReceived { result, .. } => {
                if self.state != SessionState::AwaitingReply {
                    tracing::debug!(state = %self.state, "Ignoring reply outside AwaitingReply");
                    return;
                }
                match result {
                    Ok(reply) => {
                        tracing::info!(
                            session = %self.session,
                            chars = reply.reply.chars().count(),
                            "Reply received"
                        );
                        self.set_full_text(reply.reply);
                        self.set_expression(Expression::Talking);
                        self.set_state(SessionState::Polling);
                        self.start_polling();
                    }
                    Err(e) => {
                        tracing::warn!(
                            session = %self.session,
                            kind = e.kind(),
                            "Process-audio request failed: {}",
                            e
                        );
                        let error = self.config.messages.error.clone();
                        self.set_full_text(error);
                        self.set_expression(Expression::Idle);
                        self.set_state(SessionState::Idle);
                    }
                }
            }

            SessionEvent::PlaybackFinished { .. } => {
                if self.state != SessionState::Polling {
                    return;
                }
                tracing::info!(session = %self.session, "Reply playback finished");
                self.finish_polling();
            }

            SessionEvent::PollFailed {
                session,
                consecutive,
                error,
            } => {
                tracing::warn!(
                    session = %session,
                    consecutive = consecutive,
                    "Audio status poll failed: {}",
                    error
                );
                self.send(SessionMessage::PollFailed {
                    session,
                    consecutive,
                    error,
                });
            }

            SessionEvent::PollAbandoned { consecutive, .. } => {
                if self.state != SessionState::Polling {
                    return;
                }
                tracing::warn!(
                    session = %self.session,
                    consecutive = consecutive,
                    "Giving up on audio status after repeated failures"
                );
                self.finish_polling();
            }
        }
    }

    /// Wait for the next task event
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Wait for the next task event and apply it
    ///
    /// Returns `false` if the event channel closed.
    pub async fn step(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.handle_event(event).await;
                true
            }
            None => false,
        }
    }

    /// Apply every event already queued, without waiting
    ///
    /// Returns how many events were applied.
    pub async fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event).await;
            applied += 1;
        }
        applied
    }

    /// Apply events until the session is back to idle
    pub async fn run_until_idle(&mut self) {
        while self.state != SessionState::Idle {
            if !self.step().await {
                break;
            }
        }
    }

    /// Cancel every task and timer the session owns
    ///
    /// Events already queued belong to the old interaction id and are
    /// ignored afterwards.
    pub fn shutdown(&mut self) {
        self.request.cancel();
        self.poll.cancel();
        self.expression.shutdown();
        self.typewriter.shutdown();
        self.session = self.session.next();
        self.state = SessionState::Idle;
        tracing::debug!("Voice session shut down");
    }

    fn start_polling(&mut self) {
        self.poll.restart(poll_loop(
            Arc::clone(&self.backend),
            self.session,
            self.config.timing.poll_interval,
            self.config.poll_failure,
            self.events_tx.clone(),
        ));
    }

    fn finish_polling(&mut self) {
        self.poll.cancel();
        self.set_expression(Expression::Idle);
        self.set_state(SessionState::Idle);
    }

    fn set_expression(&mut self, expression: Expression) {
        self.expression.set_expression(expression);
        self.send(SessionMessage::ExpressionChanged { expression });
    }

    fn set_full_text(&mut self, text: String) {
        self.typewriter.set_full_text(text.clone());
        self.send(SessionMessage::FullTextChanged { text });
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state == state {
            return;
        }
        tracing::debug!(session = %self.session, from = %self.state, to = %state, "Session state");
        self.state = state;
        self.send(SessionMessage::StateChanged {
            session: self.session,
            state,
        });
    }

    /// Send a message to the surface without waiting on a slow reader
    fn send(&self, msg: SessionMessage) {
        match self.tx.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(msg)) => {
                tracing::warn!(?msg, "Surface channel full, dropping message");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Surface channel closed");
            }
        }
    }
}

impl<B: VoiceBackend + 'static> fmt::Debug for VoiceSession<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceSession")
            .field("backend", &self.backend.name())
            .field("session", &self.session)
            .field("state", &self.state)
            .field("expression", &self.expression.expression())
            .finish_non_exhaustive()
    }
}

/// Poll audio status every `period` until playback ends or the policy gives up
fn poll_loop<B: VoiceBackend + 'static>(
    backend: Arc<B>,
    session: SessionId,
    period: Duration,
    policy: PollFailurePolicy,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failures: u32 = 0;

        loop {
            interval.tick().await;
            match backend.audio_status().await {
                Ok(status) if status.playing => {
                    failures = 0;
                    tracing::trace!(session = %session, "Reply audio still playing");
                }
                Ok(_) => {
                    let _ = events.send(SessionEvent::PlaybackFinished { session });
                    return;
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let _ = events.send(SessionEvent::PollFailed {
                        session,
                        consecutive: failures,
                        error: e.to_string(),
                    });
                    if policy.gives_up_after(failures) {
                        let _ = events.send(SessionEvent::PollAbandoned {
                            session,
                            consecutive: failures,
                        });
                        return;
                    }
                }
            }
        }
    }
}
