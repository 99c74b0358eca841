//! Dialogue Box
//!
//! A rounded box holding the typewriter's revealed text. Long text is
//! wrapped to the box width and the newest lines stay visible.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Widget};
use textwrap::wrap;

use crate::theme::{ACCENT, ASSISTANT_TEXT};

/// Cursor drawn after the text while it is still being revealed
const TYPING_CURSOR: char = '▌';

/// Rounded box showing revealed dialogue text
pub struct DialogueBox<'a> {
    text: &'a str,
    typing: bool,
}

impl<'a> DialogueBox<'a> {
    /// Create a box for `text`
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            typing: false,
        }
    }

    /// Show the typing cursor
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    /// Wrap the text to `width`, cursor included
    fn lines(&self, width: usize) -> Vec<String> {
        let mut content = self.text.to_string();
        if self.typing {
            content.push(TYPING_CURSOR);
        }

        content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, width)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect()
    }
}

impl Widget for DialogueBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let wrapped = self.lines(inner.width as usize);
        let skip = wrapped.len().saturating_sub(inner.height as usize);
        let style = Style::default().fg(ASSISTANT_TEXT);

        for (i, line) in wrapped.iter().skip(skip).enumerate() {
            let y = inner.y + u16::try_from(i).unwrap_or(u16::MAX);
            buf.set_stringn(inner.x, y, line, inner.width as usize, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(widget: DialogueBox<'_>, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_shows_text_inside_border() {
        let rows = render(DialogueBox::new("Hello there"), 20, 3);
        assert_eq!(rows[0], "╭──────────────────╮");
        assert_eq!(rows[1], "│Hello there       │");
        assert_eq!(rows[2], "╰──────────────────╯");
    }

    #[test]
    fn test_typing_cursor() {
        let rows = render(DialogueBox::new("Hel").typing(true), 10, 3);
        assert_eq!(rows[1], "│Hel▌    │");
        assert_eq!(rows[1].chars().count(), 10);
    }

    #[test]
    fn test_keeps_newest_lines() {
        let rows = render(DialogueBox::new("one two three four"), 9, 4);
        // 7 columns wrap into "one two" / "three" / "four"
        assert_eq!(rows[1], "│three  │");
        assert_eq!(rows[2], "│four   │");
    }

    #[test]
    fn test_tiny_area_draws_nothing_inside() {
        let rows = render(DialogueBox::new("Hello"), 2, 2);
        assert_eq!(rows.len(), 2);
    }
}
