//! Terminal backends: where flushed frames go and where input lines come from.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use crate::grid::CharGrid;
use crate::sync::lock;
use crate::types::{Point, Size};

/// The physical side of a Grid Surface.
pub trait TerminalBackend: Send {
    /// Current terminal size in cells.
    fn size(&mut self) -> Result<Size>;

    /// Prepare the terminal for full-screen drawing.
    fn enter(&mut self) -> Result<()>;

    /// Restore the terminal to its normal state.
    fn exit(&mut self) -> Result<()>;

    /// Paint a whole frame.
    fn draw(&mut self, grid: &CharGrid) -> Result<()>;

    /// Print `prompt` at `at` and block for one line of input.
    fn read_line(&mut self, at: Point, prompt: &str) -> Result<String>;

    /// Drain pending key events without blocking. `true` if one of them
    /// was an interrupt key.
    fn poll_interrupt(&mut self) -> Result<bool>;
}

#[derive(Debug, Default)]
struct HeadlessState {
    sizes: VecDeque<Size>,
    inputs: VecDeque<String>,
    frames: Vec<Vec<String>>,
    reads: Vec<(Point, String)>,
    interrupts: usize,
    entered: bool,
    exits: usize,
}

/// In-memory backend for running the display without a terminal.
///
/// Cloning yields another handle onto the same state, so a caller can keep
/// one handle to inspect frames after giving the other to a surface.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessBackend {
    /// A terminal that always reports `size`.
    pub fn new(size: Size) -> Self {
        Self::with_sizes([size])
    }

    /// A terminal whose size queries walk through `sizes`, repeating the last one.
    pub fn with_sizes(sizes: impl IntoIterator<Item = Size>) -> Self {
        let state = HeadlessState {
            sizes: sizes.into_iter().collect(),
            ..HeadlessState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Queue a line to be returned by a future `read_line`.
    pub fn push_input(&self, line: impl Into<String>) {
        lock(&self.state).inputs.push_back(line.into());
    }

    /// Queue an interrupt key press for the next `poll_interrupt`.
    pub fn push_interrupt(&self) {
        lock(&self.state).interrupts += 1;
    }

    pub fn frame_count(&self) -> usize {
        lock(&self.state).frames.len()
    }

    pub fn last_frame(&self) -> Option<Vec<String>> {
        lock(&self.state).frames.last().cloned()
    }

    pub fn frames(&self) -> Vec<Vec<String>> {
        lock(&self.state).frames.clone()
    }

    /// Every `(location, prompt)` passed to `read_line`, in order.
    pub fn reads(&self) -> Vec<(Point, String)> {
        lock(&self.state).reads.clone()
    }

    pub fn is_entered(&self) -> bool {
        lock(&self.state).entered
    }

    pub fn exit_count(&self) -> usize {
        lock(&self.state).exits
    }
}

impl TerminalBackend for HeadlessBackend {
    fn size(&mut self) -> Result<Size> {
        let mut state = lock(&self.state);
        let size = if state.sizes.len() > 1 {
            state.sizes.pop_front()
        } else {
            state.sizes.front().copied()
        };
        size.ok_or_else(|| anyhow!("headless backend has no size"))
    }

    fn enter(&mut self) -> Result<()> {
        lock(&self.state).entered = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.entered = false;
        state.exits += 1;
        Ok(())
    }

    fn draw(&mut self, grid: &CharGrid) -> Result<()> {
        lock(&self.state).frames.push(grid.lines());
        Ok(())
    }

    fn read_line(&mut self, at: Point, prompt: &str) -> Result<String> {
        let mut state = lock(&self.state);
        state.reads.push((at, prompt.to_string()));
        state
            .inputs
            .pop_front()
            .ok_or_else(|| anyhow!("no input available"))
    }

    fn poll_interrupt(&mut self) -> Result<bool> {
        let mut state = lock(&self.state);
        if state.interrupts == 0 {
            return Ok(false);
        }
        state.interrupts -= 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_repeat_last_entry() {
        let mut backend = HeadlessBackend::with_sizes([Size::new(1, 1), Size::new(2, 2)]);
        assert_eq!(backend.size().unwrap(), Size::new(1, 1));
        assert_eq!(backend.size().unwrap(), Size::new(2, 2));
        assert_eq!(backend.size().unwrap(), Size::new(2, 2));
    }

    #[test]
    fn clones_share_recorded_frames() {
        let observer = HeadlessBackend::new(Size::new(3, 1));
        let mut backend = observer.clone();
        let mut grid = CharGrid::new(3, 1);
        grid.set(1, 0, 'x');
        backend.draw(&grid).unwrap();
        assert_eq!(observer.frame_count(), 1);
        assert_eq!(observer.last_frame().unwrap(), vec![" x "]);
    }

    #[test]
    fn read_line_serves_scripted_input() {
        let mut backend = HeadlessBackend::new(Size::new(3, 1));
        backend.push_input("yes");
        assert_eq!(backend.read_line(Point::new(2, 0), "> ").unwrap(), "yes");
        assert!(backend.read_line(Point::new(2, 0), "").is_err());
        assert_eq!(backend.reads().len(), 2);
    }

    #[test]
    fn interrupts_are_consumed_once() {
        let observer = HeadlessBackend::new(Size::new(3, 1));
        let mut backend = observer.clone();
        assert!(!backend.poll_interrupt().unwrap());
        observer.push_interrupt();
        assert!(backend.poll_interrupt().unwrap());
        assert!(!backend.poll_interrupt().unwrap());
    }
}
