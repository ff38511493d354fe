//! Panel compositor for the kitten terminal display.
//!
//! Game code talks to the screen only through this crate: it registers named
//! [`Panel`]s with a [`TextDisplay`], mutates their text and visibility from
//! whatever thread it likes, and asks for input lines with
//! [`TextDisplay::read_input`].
//!
//! # Example
//!
//! ```
//! use kitten_tui_display::{TextDisplay, TextboxConfig};
//! use kitten_tui_display::term::{DisplayConfig, HeadlessBackend};
//! use kitten_tui_display::types::{Point, Size};
//!
//! let backend = HeadlessBackend::new(Size::new(20, 4));
//! let display = TextDisplay::new(DisplayConfig::new(20, 4, 10.0), backend.clone());
//!
//! let log = display
//!     .add_panel_config("log", TextboxConfig::new(Point::new(0, 0), Size::new(20, 2)))
//!     .unwrap();
//! log.append_text("Alice drew a card.\nBob exploded.");
//!
//! display.force_update().unwrap();
//! let frame = backend.last_frame().unwrap();
//! assert_eq!(frame[1].trim_end(), "Bob exploded.");
//!
//! backend.push_input("2");
//! assert_eq!(display.read_input(Point::new(0, 3), "Pick: ").unwrap(), "2");
//! ```

pub mod panel;
pub mod textdisplay;

pub use kitten_tui_term as term;
pub use kitten_tui_types as types;

pub use panel::{wrap_tail, Panel, Textbox, TextboxConfig};
pub use textdisplay::TextDisplay;
