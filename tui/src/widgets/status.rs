//! Status Bar
//!
//! One line at the bottom: session state, then either the key hints or the
//! latest poll problem if playback tracking is struggling.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use voiceface_core::SessionState;

use crate::theme::{BUSY_YELLOW, DIM_GRAY, ERROR_RED, TALKING_GREEN};

/// Bottom status line
pub struct StatusBar<'a> {
    state: SessionState,
    dev_mode: bool,
    warning: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Status for `state`
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            dev_mode: false,
            warning: None,
        }
    }

    /// Show the developer-mode hint
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Show a warning instead of the hints
    pub fn warning(mut self, warning: Option<&'a str>) -> Self {
        self.warning = warning;
        self
    }

    fn state_color(&self) -> Color {
        match self.state {
            SessionState::Idle => DIM_GRAY,
            SessionState::AwaitingReply => BUSY_YELLOW,
            SessionState::Polling => TALKING_GREEN,
        }
    }

    fn prefix(&self) -> String {
        format!(" ● {} | ", self.state)
    }

    fn hints(&self) -> String {
        let hints = match self.state {
            SessionState::Idle => "Enter/Space to talk",
            SessionState::AwaitingReply | SessionState::Polling => "Enter/Space to restart",
        };
        let mut hints = format!("{hints} | Esc to quit");
        if self.dev_mode {
            hints.push_str(" [DEV 1/2/3]");
        }
        hints
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let (x, _) = buf.set_stringn(
            area.x,
            area.y,
            self.prefix(),
            area.width as usize,
            Style::default().fg(self.state_color()),
        );
        let remaining = area.width.saturating_sub(x.saturating_sub(area.x)) as usize;

        match self.warning {
            Some(warning) => buf.set_stringn(
                x,
                area.y,
                format!("⚠ {warning}"),
                remaining,
                Style::default().fg(ERROR_RED),
            ),
            None => buf.set_stringn(
                x,
                area.y,
                self.hints(),
                remaining,
                Style::default().fg(self.state_color()),
            ),
        };
    }
}
