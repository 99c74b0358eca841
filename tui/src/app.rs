//! Main Application
//!
//! The App is a thin display client around a [`VoiceSession`]:
//! 1. Converts key presses into session calls
//! 2. Applies completed session tasks once per frame
//! 3. Folds `SessionMessage`s into the status bar
//! 4. Renders the face and dialogue from the session's watch channels

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{Frame, Terminal};
use tokio::sync::{mpsc, watch};
use voiceface_core::{
    Expression, FaceConfig, FaceState, HttpVoiceBackend, SessionMessage, SessionState,
    TypewriterState, VoiceBackend, VoiceSession,
};

use crate::face::{FaceWidget, FACE_HEIGHT};
use crate::widgets::{DialogueBox, StatusBar};

/// Dialogue box height, borders included
const DIALOGUE_HEIGHT: u16 = 6;

/// Widest the dialogue box gets
const DIALOGUE_MAX_WIDTH: u16 = 64;

/// Session message channel capacity
const MESSAGE_CAPACITY: usize = 100;

/// Main application state
pub struct App<B: VoiceBackend + 'static = HttpVoiceBackend> {
    /// Is the app still running?
    running: bool,
    /// The voice session driving face and text
    session: VoiceSession<B>,
    /// Transitions reported by the session
    messages: mpsc::Receiver<SessionMessage>,
    /// Latest face
    face: watch::Receiver<FaceState>,
    /// Latest dialogue reveal
    text: watch::Receiver<TypewriterState>,
    /// Session state as last reported
    state: SessionState,
    /// Latest audio-status poll problem
    poll_warning: Option<String>,
    /// Developer mode (forced expressions)
    dev_mode: bool,
}

impl App<HttpVoiceBackend> {
    /// Create an App talking to the configured HTTP backend
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: FaceConfig) -> anyhow::Result<Self> {
        let backend = HttpVoiceBackend::from_config(&config.backend)?;
        tracing::info!(url = backend.base_url(), "Using voice backend");
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: VoiceBackend + 'static> App<B> {
    /// Create an App around any backend
    pub fn with_backend(backend: B, config: FaceConfig) -> Self {
        let (tx, messages) = mpsc::channel(MESSAGE_CAPACITY);
        let session = VoiceSession::new(backend, config, tx);
        let face = session.subscribe_face();
        let text = session.subscribe_text();

        Self {
            running: true,
            session,
            messages,
            face,
            text,
            state: SessionState::Idle,
            poll_warning: None,
            dev_mode: false,
        }
    }

    /// Main event loop
    ///
    /// # Errors
    ///
    /// Fails if drawing to the terminal fails.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~20 FPS is plenty for a 200 ms typewriter and blink
        let frame_duration = Duration::from_millis(50);

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await;
                    }
                    // Resize and the rest: redraw on this frame
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                    None => self.running = false,
                },

                // Frame tick
                () = tokio::time::sleep(frame_duration) => {}
            }

            self.tick().await;
            self.render(terminal)?;
        }

        self.session.shutdown();
        Ok(())
    }

    /// Apply finished session work and fold in its messages
    pub async fn tick(&mut self) {
        self.session.process_pending().await;
        self.process_session_messages();
    }

    /// Process all pending messages from the session
    fn process_session_messages(&mut self) {
        while let Ok(msg) = self.messages.try_recv() {
            match msg {
                SessionMessage::StateChanged { state, .. } => {
                    self.state = state;
                    if state != SessionState::Polling {
                        self.poll_warning = None;
                    }
                }
                SessionMessage::PollFailed {
                    consecutive, error, ..
                } => {
                    self.poll_warning =
                        Some(format!("status poll failed ({consecutive}): {error}"));
                }
                SessionMessage::ExpressionChanged { expression } => {
                    tracing::trace!(expression = %expression, "Face changed");
                }
                SessionMessage::FullTextChanged { .. } => {}
            }
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Talk
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.poll_warning = None;
                self.session.start_interaction().await;
            }

            // Toggle dev mode
            KeyCode::F(12) => {
                self.dev_mode = !self.dev_mode;
                tracing::debug!(dev_mode = self.dev_mode, "Dev mode toggled");
            }

            // Forced expressions (dev mode only)
            KeyCode::Char(c) if self.dev_mode => {
                if let Some(expression) = Expression::from_key(c) {
                    self.session.force_expression(expression).await;
                }
            }

            _ => {}
        }
    }

    /// Render the UI
    ///
    /// # Errors
    ///
    /// Fails if the terminal backend fails to draw.
    pub fn render<T: Backend>(&self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Draw face, dialogue and status into `frame`
    pub fn draw(&self, frame: &mut Frame<'_>) {
        let [face_area, dialogue_area, status_area] = Layout::vertical([
            Constraint::Min(FACE_HEIGHT),
            Constraint::Length(DIALOGUE_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let face = self.face.borrow().clone();
        frame.render_widget(FaceWidget::new(&face), face_area);

        let text = self.text.borrow();
        let dialogue = DialogueBox::new(&text.display_text).typing(!text.is_complete());
        frame.render_widget(dialogue, centered(dialogue_area, DIALOGUE_MAX_WIDTH));
        drop(text);

        let status = StatusBar::new(self.state)
            .dev_mode(self.dev_mode)
            .warning(self.poll_warning.as_deref());
        frame.render_widget(status, status_area);
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Is developer mode on?
    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Session state as last reported
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session behind the UI
    pub fn session(&self) -> &VoiceSession<B> {
        &self.session
    }
}

/// `area` narrowed to at most `max_width`, horizontally centered
fn centered(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
