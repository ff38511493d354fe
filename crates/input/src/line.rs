//! Blocking line reader with in-place echo.
//!
//! The terminal runs in raw mode while the display is active, so the
//! terminal itself neither echoes nor line-buffers keystrokes. The reader
//! below does both, at whatever screen position the caller asks for.

use std::io::Write;

use anyhow::{bail, Result};
use crossterm::{
    cursor,
    event::{self, Event},
    style::Print,
    QueueableCommand,
};

use crate::map::{map_key_event, LineEdit};
use crate::types::Point;

/// Result of applying one edit to a [`LineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Inserted(char),
    Erased,
    /// Backspace on an empty line.
    Unchanged,
    Submitted(String),
    Interrupted,
}

/// Accumulates a line of text from edits.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    text: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn apply(&mut self, edit: LineEdit) -> LineOutcome {
        match edit {
            LineEdit::Insert(ch) => {
                self.text.push(ch);
                LineOutcome::Inserted(ch)
            }
            LineEdit::Backspace => match self.text.pop() {
                Some(_) => LineOutcome::Erased,
                None => LineOutcome::Unchanged,
            },
            LineEdit::Submit => LineOutcome::Submitted(std::mem::take(&mut self.text)),
            LineEdit::Interrupt => LineOutcome::Interrupted,
        }
    }
}

/// Move the cursor to `at`, print `prompt`, and block until a line is submitted.
///
/// Key events are read from the controlling terminal. The returned line never
/// contains the terminating newline. An interrupt key fails the read.
pub fn read_line_at<W: Write>(out: &mut W, at: Point, prompt: &str) -> Result<String> {
    out.queue(cursor::MoveTo(clamp_coord(at.x), clamp_coord(at.y)))?;
    out.queue(cursor::Show)?;
    out.queue(Print(prompt))?;
    out.flush()?;

    let mut line = LineBuffer::new();
    let result = loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(edit) = map_key_event(key) else {
            continue;
        };
        match line.apply(edit) {
            LineOutcome::Inserted(ch) => {
                out.queue(Print(ch))?;
            }
            LineOutcome::Erased => {
                out.queue(Print("\u{8} \u{8}"))?;
            }
            LineOutcome::Unchanged => {}
            LineOutcome::Submitted(text) => break Ok(text),
            LineOutcome::Interrupted => break Err(()),
        }
        out.flush()?;
    };

    out.queue(cursor::Hide)?;
    out.flush()?;

    match result {
        Ok(text) => {
            log::debug!("read {} chars at {}", text.len(), at);
            Ok(text)
        }
        Err(()) => bail!("input interrupted"),
    }
}

fn clamp_coord(v: i32) -> u16 {
    v.clamp(0, u16::MAX as i32) as u16
}
