//! Face Rendering
//!
//! Turns a [`FaceState`] from the core into terminal pixel art. Every
//! feature in the [`FeatureSet`] maps to one part; parts are stamped onto a
//! fixed canvas so that switching expression never moves the rest of the
//! face.
//!
//! ```text
//!               ? ? ?      question marks
//!     ━━━━ ╲ ╱ ━━━━        brows + frown marks
//!      ██       ██    ◍    eyes (lids when blinking) + sweat
//!      ██       ██
//!
//!         ╭───╮            mouth
//!         ╰───╯
//! ```

pub mod sprites;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use voiceface_core::{EyebrowPosture, FaceState, FeatureSet, MouthShape};

use crate::theme::{
    CUE_FROWN, CUE_QUESTION, CUE_SWEAT, FACE_BROWS, FACE_EYES, FACE_LIDS, FACE_MOUTH,
};
use sprites::{build_sprite, Sprite};

/// Canvas width in terminal cells
pub const FACE_WIDTH: u16 = 21;

/// Canvas height in terminal cells
pub const FACE_HEIGHT: u16 = 8;

const PALETTE: &[(char, char, ratatui::style::Color)] = &[
    ('E', '█', FACE_EYES),
    ('L', '▁', FACE_LIDS),
    ('B', '━', FACE_BROWS),
    ('\\', '╲', CUE_FROWN),
    ('/', '╱', CUE_FROWN),
    ('?', '?', CUE_QUESTION),
    ('S', '◍', CUE_SWEAT),
    ('-', '─', FACE_MOUTH),
    ('(', '╭', FACE_MOUTH),
    (')', '╮', FACE_MOUTH),
    ('[', '╰', FACE_MOUTH),
    (']', '╯', FACE_MOUTH),
    ('<', '╶', FACE_MOUTH),
    ('>', '╴', FACE_MOUTH),
];

/// Part offsets on the canvas
const QUESTION_POS: (u16, u16) = (14, 0);
const LEFT_BROW_POS: (u16, u16) = (4, 2);
const RIGHT_BROW_POS: (u16, u16) = (13, 2);
const FROWN_POS: (u16, u16) = (9, 2);
const LEFT_EYE_POS: (u16, u16) = (5, 3);
const RIGHT_EYE_POS: (u16, u16) = (14, 3);
const SWEAT_POS: (u16, u16) = (19, 3);
const MOUTH_POS: (u16, u16) = (8, 6);

fn part(pattern: &[&str]) -> Sprite {
    build_sprite(pattern, PALETTE)
}

fn eye(blinking: bool) -> Sprite {
    if blinking {
        part(&["  ", "LL"])
    } else {
        part(&["EE", "EE"])
    }
}

fn brow(posture: EyebrowPosture) -> Sprite {
    match posture {
        EyebrowPosture::ThinkingHorizontal => part(&["BBBB"]),
    }
}

fn mouth(shape: MouthShape) -> Sprite {
    match shape {
        MouthShape::Plain => part(&["     ", "-----"]),
        MouthShape::Idle => part(&["[---]"]),
        MouthShape::Thinking => part(&[" <-> "]),
        MouthShape::Talking => part(&["(---)", "[---]"]),
    }
}

fn stamp_at(canvas: &mut Sprite, (x, y): (u16, u16), part: &Sprite) {
    canvas.stamp(x, y, part);
}

/// Draw `face` onto a fresh canvas
pub fn compose(face: &FaceState) -> Sprite {
    let features: FeatureSet = face.features;
    let mut canvas = Sprite::blank(FACE_WIDTH, FACE_HEIGHT);
    if features.question_marks {
        stamp_at(&mut canvas, QUESTION_POS, &part(&["? ? ?"]));
    }
    if let Some(posture) = features.eyebrows {
        let brow = brow(posture);
        stamp_at(&mut canvas, LEFT_BROW_POS, &brow);
        stamp_at(&mut canvas, RIGHT_BROW_POS, &brow);
    }
    if features.frown_marks {
        stamp_at(&mut canvas, FROWN_POS, &part(&["\\ /"]));
    }
    if features.eyes_visible {
        let eye = eye(face.blinking);
        stamp_at(&mut canvas, LEFT_EYE_POS, &eye);
        stamp_at(&mut canvas, RIGHT_EYE_POS, &eye);
    }
    if features.sweat {
        stamp_at(&mut canvas, SWEAT_POS, &part(&["S"]));
    }
    stamp_at(&mut canvas, MOUTH_POS, &mouth(features.mouth));

    canvas
}

/// Widget drawing the face centered in its area
pub struct FaceWidget<'a> {
    face: &'a FaceState,
}

impl<'a> FaceWidget<'a> {
    /// Create a widget for `face`
    pub fn new(face: &'a FaceState) -> Self {
        Self { face }
    }
}

impl Widget for FaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sprite = compose(self.face);
        let origin_x = area.x + area.width.saturating_sub(sprite.width()) / 2;
        let origin_y = area.y + area.height.saturating_sub(sprite.height()) / 2;

        for y in 0..sprite.height().min(area.height) {
            for x in 0..sprite.width().min(area.width) {
                let cell = sprite.get(x, y);
                if cell.is_empty() {
                    continue;
                }
                if let Some(target) = buf.cell_mut((origin_x + x, origin_y + y)) {
                    target.set_char(cell.ch).set_fg(cell.fg);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use voiceface_core::Expression;

    use super::*;

    fn face(expression: Expression, blinking: bool) -> FaceState {
        let mut face = FaceState::showing(expression);
        face.blinking = blinking;
        face
    }

    fn rows(sprite: &Sprite) -> Vec<String> {
        (0..sprite.height()).map(|y| sprite.row_text(y)).collect()
    }

    #[test]
    fn test_idle_face() {
        let sprite = compose(&face(Expression::Idle, false));
        let rows = rows(&sprite);
        assert!(rows[3].contains("██"));
        assert_eq!(rows[6].trim(), "╰───╯");
        assert!(!rows.iter().any(|row| row.contains('?') || row.contains('━')));
    }

    #[test]
    fn test_thinking_face() {
        let sprite = compose(&face(Expression::Thinking, false));
        let rows = rows(&sprite);
        assert_eq!(rows[0].trim(), "? ? ?");
        assert_eq!(rows[2].trim(), "━━━━ ╲ ╱ ━━━━");
        assert!(!rows.iter().any(|row| row.contains('█')));
        assert_eq!(rows[6].trim(), "╶─╴");
    }

    #[test]
    fn test_talking_face_blinks() {
        let open = rows(&compose(&face(Expression::Talking, false)));
        assert!(open[4].contains("██"));
        assert_eq!(open[6].trim(), "╭───╮");
        assert_eq!(open[7].trim(), "╰───╯");

        let closed = rows(&compose(&face(Expression::Talking, true)));
        assert!(!closed[3].contains('█'));
        assert!(closed[4].contains("▁▁"));
        assert_eq!(closed[6], open[6]);
    }

    #[test]
    fn test_sweat_never_drawn_by_expressions() {
        for expression in Expression::ALL {
            let rows = rows(&compose(&face(expression, false)));
            assert!(!rows.iter().any(|row| row.contains('◍')));
        }
    }

    #[test]
    fn test_widget_centers_face() {
        let area = Rect::new(0, 0, FACE_WIDTH + 10, FACE_HEIGHT + 4);
        let mut buf = Buffer::empty(area);
        FaceWidget::new(&face(Expression::Idle, false)).render(area, &mut buf);

        // Canvas origin lands at (5, 2); left eye at (5 + 5, 2 + 3)
        assert_eq!(buf[(10, 5)].symbol(), "█");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_widget_clips_small_area() {
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        FaceWidget::new(&face(Expression::Talking, false)).render(area, &mut buf);
    }
}
