//! Terminal line input.
//!
//! The display core only ever asks the user for a whole line of text at a
//! given screen position. This crate maps `crossterm` key events into line
//! edits and runs the blocking, echoing read loop used while the grid's
//! flush thread is paused.

pub mod line;
pub mod map;

pub use kitten_tui_types as types;

pub use line::{read_line_at, LineBuffer, LineOutcome};
pub use map::{map_key_event, LineEdit};
