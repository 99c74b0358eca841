//! Sprite Definitions
//!
//! Face parts are small pieces of pixel art built from a text pattern and a
//! palette, then stamped onto a canvas at fixed offsets.

use std::collections::HashMap;

use ratatui::style::Color;

/// A single colored cell in a sprite
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColoredCell {
    /// The character to display
    pub ch: char,
    /// Foreground color
    pub fg: Color,
}

impl ColoredCell {
    /// Create a new colored cell
    pub const fn new(ch: char, fg: Color) -> Self {
        Self { ch, fg }
    }

    /// Empty/transparent cell
    pub const fn empty() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
        }
    }

    /// Check if cell is empty/transparent
    pub fn is_empty(&self) -> bool {
        self.ch == ' '
    }
}

/// A grid of colored cells (row-major)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    cells: Vec<Vec<ColoredCell>>,
    width: u16,
    height: u16,
}

impl Sprite {
    /// A fully transparent canvas
    pub fn blank(width: u16, height: u16) -> Self {
        Self {
            cells: vec![vec![ColoredCell::empty(); width as usize]; height as usize],
            width,
            height,
        }
    }

    /// Create a sprite from rows of cells
    pub fn new(cells: Vec<Vec<ColoredCell>>) -> Self {
        let height = u16::try_from(cells.len()).unwrap_or(u16::MAX);
        let width = cells
            .iter()
            .map(|row| u16::try_from(row.len()).unwrap_or(u16::MAX))
            .max()
            .unwrap_or(0);
        Self {
            cells,
            width,
            height,
        }
    }

    /// Width in terminal cells
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in terminal cells
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (returns empty if out of bounds)
    pub fn get(&self, x: u16, y: u16) -> &ColoredCell {
        static EMPTY: ColoredCell = ColoredCell::empty();
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .unwrap_or(&EMPTY)
    }

    /// Copy the opaque cells of `part` onto this sprite at `(x, y)`
    ///
    /// Cells falling outside the canvas are dropped.
    pub fn stamp(&mut self, x: u16, y: u16, part: &Sprite) {
        for (dy, row) in part.cells.iter().enumerate() {
            let Some(target) = self.cells.get_mut(y as usize + dy) else {
                break;
            };
            for (dx, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                if let Some(slot) = target.get_mut(x as usize + dx) {
                    *slot = *cell;
                }
            }
        }
    }

    /// Characters of row `y`, transparent cells as spaces
    pub fn row_text(&self, y: u16) -> String {
        self.cells
            .get(y as usize)
            .map(|row| row.iter().map(|cell| cell.ch).collect())
            .unwrap_or_default()
    }
}

/// Parse a sprite definition using a color map
///
/// Format: each character in the pattern maps to a (char, Color) in the palette.
/// Special: ' ' (space) is always transparent.
///
/// Example:
/// ```ignore
/// let palette = [('E', '█', FACE_EYES), ('b', '━', FACE_BROWS)];
/// let eye = build_sprite(&["bbb", "EEE", "EEE"], &palette);
/// ```
pub fn build_sprite(pattern: &[&str], palette: &[(char, char, Color)]) -> Sprite {
    let color_map: HashMap<char, (char, Color)> = palette
        .iter()
        .map(|&(key, ch, color)| (key, (ch, color)))
        .collect();

    let cells = pattern
        .iter()
        .map(|line| {
            line.chars()
                .map(|c| {
                    if c == ' ' {
                        ColoredCell::empty()
                    } else if let Some(&(ch, color)) = color_map.get(&c) {
                        ColoredCell::new(ch, color)
                    } else {
                        // Unknown char - show as-is in default color
                        ColoredCell::new(c, Color::Reset)
                    }
                })
                .collect()
        })
        .collect();

    Sprite::new(cells)
}
