//! CrosstermBackend: flushes a character grid to a real terminal.
//!
//! The first frame (and any frame after the screen was disturbed by line
//! input) is a full redraw; later frames only repaint runs of changed cells.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;

use crossterm::{
    cursor,
    event::{self, Event},
    style::Print,
    terminal, QueueableCommand,
};

use crate::backend::TerminalBackend;
use crate::grid::CharGrid;
use crate::input::{map_key_event, read_line_at, LineEdit};
use crate::types::{Point, Size};

pub struct CrosstermBackend {
    stdout: io::Stdout,
    last: Option<CharGrid>,
    buf: Vec<u8>,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Force the next draw to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl TerminalBackend for CrosstermBackend {
    fn size(&mut self) -> Result<Size> {
        let (cols, rows) = terminal::size()?;
        Ok(Size::new(cols, rows))
    }

    fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.invalidate();
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn draw(&mut self, grid: &CharGrid) -> Result<()> {
        self.buf.clear();
        match &self.last {
            Some(prev) if prev.cols() == grid.cols() && prev.rows() == grid.rows() => {
                encode_diff_into(prev, grid, &mut self.buf)?;
            }
            _ => encode_full_into(grid, &mut self.buf)?,
        }
        self.flush_buf()?;

        match &mut self.last {
            Some(prev) => prev.clone_from(grid),
            None => self.last = Some(grid.clone()),
        }
        Ok(())
    }

    fn read_line(&mut self, at: Point, prompt: &str) -> Result<String> {
        // Echoed input lands on screen outside the grid's knowledge.
        self.invalidate();
        read_line_at(&mut self.stdout, at, prompt)
    }

    fn poll_interrupt(&mut self) -> Result<bool> {
        let mut interrupted = false;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                interrupted |= map_key_event(key) == Some(LineEdit::Interrupt);
            }
        }
        Ok(interrupted)
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(grid: &CharGrid, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    for y in 0..grid.rows() {
        if let Some(row) = grid.row_text(y) {
            out.queue(Print(row))?;
        }
        if y + 1 < grid.rows() {
            out.queue(Print("\r\n"))?;
        }
    }
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
pub fn encode_diff_into(prev: &CharGrid, next: &CharGrid, out: &mut Vec<u8>) -> Result<()> {
    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        let run: String = (0..len)
            .map(|dx| next.get((x + dx) as i32, y as i32).unwrap_or(' '))
            .collect();
        out.queue(Print(run))?;
        Ok(())
    })
}

fn for_each_changed_run(
    prev: &CharGrid,
    next: &CharGrid,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.cols() != next.cols() || prev.rows() != next.rows() {
        for y in 0..next.rows() {
            f(0, y, next.cols())?;
        }
        return Ok(());
    }

    let w = next.cols();
    for y in 0..next.rows() {
        let mut x = 0;
        while x < w {
            if prev.get(x as i32, y as i32) == next.get(x as i32, y as i32) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w && prev.get(x as i32, y as i32) != next.get(x as i32, y as i32) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
