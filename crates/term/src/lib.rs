//! Terminal "grid surface" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids
//! widget/layout toolkits and instead writes into a fixed character grid that a
//! background thread flushes to the terminal at a steady frame rate.
//!
//! - [`grid`]: the pure character buffer with clipped, aligned writes
//! - [`surface`]: the shared grid, its flush thread and blocking line input
//! - [`backend`] / [`renderer`]: headless and crossterm terminal backends
//! - [`sync`]: the pause/idle gate and stop signal used by background loops

pub mod backend;
pub mod config;
pub mod grid;
pub mod renderer;
pub mod surface;
pub mod sync;

pub use kitten_tui_input as input;
pub use kitten_tui_types as types;

pub use backend::{HeadlessBackend, TerminalBackend};
pub use config::DisplayConfig;
pub use grid::{Canvas, CharGrid};
pub use renderer::{encode_diff_into, encode_full_into, CrosstermBackend};
pub use surface::GridSurface;
pub use sync::{FlushGate, StopSignal};
