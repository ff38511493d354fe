//! Character grid: the pure, I/O-free half of the Grid Surface.

use crate::types::{Alignment, HAlign, Point, VAlign, TRANSPARENT};

/// Anything a multi-line text block can be blitted onto.
pub trait Canvas {
    fn draw_pattern(&mut self, pattern: &str, at: Point, align: Alignment);
}

/// Fixed-size 2D buffer of single-cell characters.
///
/// Writes never fail: any part of a write that falls outside
/// `[0, cols) x [0, rows)` is clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    cols: u16,
    rows: u16,
    cells: Vec<char>,
}

impl CharGrid {
    pub fn new(cols: u16, rows: u16) -> Self {
        let len = (cols as usize) * (rows as usize);
        Self {
            cols,
            rows,
            cells: vec![' '; len],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
            return None;
        }
        Some((y as usize) * (self.cols as usize) + (x as usize))
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: i32, y: i32, ch: char) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = ch;
        }
    }

    /// Row `y` as a string of exactly `cols` characters.
    pub fn row_text(&self, y: u16) -> Option<String> {
        if y >= self.rows {
            return None;
        }
        let start = (y as usize) * (self.cols as usize);
        Some(self.cells[start..start + self.cols as usize].iter().collect())
    }

    /// All rows, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        (0..self.rows).filter_map(|y| self.row_text(y)).collect()
    }

    /// Reset every cell to a space.
    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Write `text` along row `at.y`, anchored at column `at.x`.
    ///
    /// `Center` shifts the start left by `len / 2`, `Right` by `len`. NUL
    /// characters are transparent and leave the destination cell untouched.
    pub fn write_horizontal(&mut self, text: &str, at: Point, align: HAlign) {
        if at.y < 0 || at.y >= self.rows as i32 {
            return;
        }
        let len = text.chars().count() as i32;
        let start = at.x.saturating_sub(align.shift(len));
        for (i, ch) in text.chars().enumerate() {
            if ch == TRANSPARENT {
                continue;
            }
            self.set(start.saturating_add(i as i32), at.y, ch);
        }
    }

    /// Write `text` down column `at.x`, anchored at row `at.y`.
    pub fn write_vertical(&mut self, text: &str, at: Point, align: VAlign) {
        if at.x < 0 || at.x >= self.cols as i32 {
            return;
        }
        let len = text.chars().count() as i32;
        let start = at.y.saturating_sub(align.shift(len));
        for (i, ch) in text.chars().enumerate() {
            if ch == TRANSPARENT {
                continue;
            }
            self.set(at.x, start.saturating_add(i as i32), ch);
        }
    }

    /// Blit a multi-line block.
    ///
    /// The alignment is applied once, to the block's bounding box (longest
    /// line by line count); each line is then written left-aligned.
    pub fn draw_pattern(&mut self, pattern: &str, at: Point, align: Alignment) {
        let width = pattern
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as i32;
        let height = pattern.split('\n').count() as i32;

        let origin = at.offset(
            -align.horizontal.shift(width),
            -align.vertical.shift(height),
        );
        for (dy, line) in pattern.split('\n').enumerate() {
            self.write_horizontal(line, origin.offset(0, dy as i32), HAlign::Left);
        }
    }

    /// Frame the grid: `-` along the top and bottom, `|` down the sides, `+` corners.
    pub fn draw_border(&mut self) {
        if self.cols == 0 || self.rows == 0 {
            return;
        }
        let right = self.cols as i32 - 1;
        let bottom = self.rows as i32 - 1;
        let horizontal = "-".repeat(self.cols as usize);
        let vertical = "|".repeat(self.rows as usize);

        self.write_horizontal(&horizontal, Point::new(0, 0), HAlign::Left);
        self.write_horizontal(&horizontal, Point::new(0, bottom), HAlign::Left);
        self.write_vertical(&vertical, Point::new(0, 0), VAlign::Top);
        self.write_vertical(&vertical, Point::new(right, 0), VAlign::Top);
        for (x, y) in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
            self.set(x, y, '+');
        }
    }
}

impl Canvas for CharGrid {
    fn draw_pattern(&mut self, pattern: &str, at: Point, align: Alignment) {
        CharGrid::draw_pattern(self, pattern, at, align);
    }
}
