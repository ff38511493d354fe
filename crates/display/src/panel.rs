//! Panels: positioned, wrapped, prioritised text regions.
//!
//! A [`Textbox`] is plain data. A [`Panel`] is a cloneable handle to one
//! `Textbox` behind a mutex, so the code that owns a panel can keep mutating
//! it from any thread while the compositor renders it in the background.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::term::Canvas;
use crate::types::{Alignment, Point, Size};

/// Initial state for a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextboxConfig {
    pub text: String,
    pub location: Point,
    pub size: Size,
    pub hidden: bool,
    pub alignment: Alignment,
    pub priority: i32,
}

impl Default for TextboxConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            location: Point::new(0, 0),
            size: Size::new(1, 1),
            hidden: false,
            alignment: Alignment::TOP_LEFT,
            priority: 0,
        }
    }
}

impl TextboxConfig {
    pub fn new(location: Point, size: Size) -> Self {
        Self {
            location,
            size,
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// A text region and everything needed to place it on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Textbox {
    text: String,
    location: Point,
    size: Size,
    hidden: bool,
    alignment: Alignment,
    priority: i32,
}

impl Textbox {
    pub fn new(config: TextboxConfig) -> Self {
        Self {
            text: config.text,
            location: config.location,
            size: config.size,
            hidden: config.hidden,
            alignment: config.alignment,
            priority: config.priority,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn replace_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    /// Drop the last `n` `\n`-separated lines, along with the separator before them.
    pub fn delete_last_lines(&mut self, n: usize) {
        let mut end = self.text.len();
        for _ in 0..n {
            match self.text[..end].rfind('\n') {
                Some(i) => end = i,
                None => {
                    end = 0;
                    break;
                }
            }
        }
        self.text.truncate(end);
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.location = self.location.offset(dx, dy);
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn realign(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn reprioritize(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// The wrapped lines currently in view: the last `height` of them.
    pub fn visible_lines(&self) -> Vec<String> {
        wrap_tail(
            &self.text,
            self.size.width as usize,
            self.size.height as usize,
        )
    }

    /// The block handed to the canvas, or `None` when nothing is drawn.
    pub fn pattern(&self) -> Option<String> {
        if self.hidden {
            return None;
        }
        let lines = self.visible_lines();
        if lines.is_empty() {
            return None;
        }
        Some(lines.join("\n"))
    }
}

/// Wrap `text` to `width` columns and keep only the last `height` lines.
///
/// Each `\n`-separated line is cut greedily into segments of `width`
/// characters; a line break always starts a new segment. Segments that end
/// at a line break are padded with spaces to `width` so they cover what lies
/// underneath. The final segment is left as is: the block handed to
/// `draw_pattern` must keep its natural width for centre and right alignment.
pub fn wrap_tail(text: &str, width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // Walk backwards so a long history costs only as much as the tail.
    let mut tail: Vec<String> = Vec::with_capacity(height);
    for (n, raw) in text.rsplit('\n').enumerate() {
        let chars: Vec<char> = raw.chars().collect();
        let mut segments: Vec<String> = chars
            .chunks(width)
            .map(|chunk| chunk.iter().collect())
            .collect();
        if segments.is_empty() {
            segments.push(String::new());
        }
        // Only the last raw line (first seen here) has no break after it.
        if n > 0 {
            if let Some(last) = segments.last_mut() {
                pad(last, width);
            }
        }

        for segment in segments.into_iter().rev() {
            if tail.len() == height {
                break;
            }
            tail.push(segment);
        }
        if tail.len() == height {
            break;
        }
    }

    tail.reverse();
    tail
}

fn pad(line: &mut String, width: usize) {
    let len = line.chars().count();
    line.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
}

/// Shared handle to a [`Textbox`].
///
/// Clones refer to the same panel. Every method locks the panel for its
/// duration only.
#[derive(Debug, Clone)]
pub struct Panel {
    inner: Arc<Mutex<Textbox>>,
}

impl Panel {
    pub fn new(config: TextboxConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Textbox::new(config))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Textbox> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the panel under its lock.
    pub fn with<R>(&self, f: impl FnOnce(&Textbox) -> R) -> R {
        f(&*self.lock())
    }

    /// Mutate the panel under its lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Textbox) -> R) -> R {
        f(&mut *self.lock())
    }

    /// Whether both handles point at the same panel.
    pub fn same_panel(&self, other: &Panel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn text(&self) -> String {
        self.lock().text().to_string()
    }

    pub fn location(&self) -> Point {
        self.lock().location()
    }

    pub fn size(&self) -> Size {
        self.lock().size()
    }

    pub fn is_hidden(&self) -> bool {
        self.lock().is_hidden()
    }

    pub fn alignment(&self) -> Alignment {
        self.lock().alignment()
    }

    pub fn priority(&self) -> i32 {
        self.lock().priority()
    }

    pub fn visible_lines(&self) -> Vec<String> {
        self.lock().visible_lines()
    }

    pub fn append_text(&self, text: &str) {
        self.lock().append_text(text);
    }

    pub fn replace_text(&self, text: &str) {
        self.lock().replace_text(text);
    }

    pub fn delete_last_lines(&self, n: usize) {
        self.lock().delete_last_lines(n);
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.lock().set_hidden(hidden);
    }

    pub fn set_visible(&self, visible: bool) {
        self.lock().set_hidden(!visible);
    }

    pub fn set_location(&self, location: Point) {
        self.lock().set_location(location);
    }

    pub fn move_by(&self, dx: i32, dy: i32) {
        self.lock().move_by(dx, dy);
    }

    pub fn resize(&self, size: Size) {
        self.lock().resize(size);
    }

    pub fn realign(&self, alignment: Alignment) {
        self.lock().realign(alignment);
    }

    pub fn reprioritize(&self, priority: i32) {
        self.lock().reprioritize(priority);
    }

    /// Draw the panel onto `canvas`. Hidden panels draw nothing.
    ///
    /// The text is formatted under the panel lock and drawn after it is
    /// released, so a concurrent append is either fully in or fully out.
    pub fn render_onto<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let placed = self.with(|tb| {
            tb.pattern()
                .map(|pattern| (pattern, tb.location(), tb.alignment()))
        });
        if let Some((pattern, location, alignment)) = placed {
            canvas.draw_pattern(&pattern, location, alignment);
        }
    }
}
