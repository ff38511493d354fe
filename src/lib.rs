//! Kitten TUI (workspace facade crate).
//!
//! Re-exports the display core under one roof; the implementation lives in
//! dedicated crates under `crates/`.

pub use kitten_tui_display as display;
pub use kitten_tui_input as input;
pub use kitten_tui_term as term;
pub use kitten_tui_types as types;

pub use kitten_tui_display::{Panel, TextDisplay, TextboxConfig};
