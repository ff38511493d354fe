//! Shared types for the kitten terminal display.
//!
//! Everything here is plain data with no external dependencies, so it can be
//! used by the grid, the input reader and the panel compositor alike.
//!
//! # Coordinates
//!
//! Grid coordinates are `(column, row)` with the origin in the top-left corner.
//! Positions are signed: a panel may be anchored partly (or entirely) off-grid,
//! and anything outside `[0, cols) x [0, rows)` is clipped when drawn.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_COLS` | 80 | Grid width in columns |
//! | `DEFAULT_ROWS` | 24 | Grid height in rows |
//! | `DEFAULT_FPS` | 10.0 | Terminal flushes per second |
//! | `DEFAULT_COMPOSITE_FPS` | 20.0 | Panel composites per second |
//!
//! # Examples
//!
//! ```
//! use kitten_tui_types::{Alignment, HAlign, VAlign, Point};
//!
//! let align = Alignment::parse("mc").unwrap();
//! assert_eq!(align, Alignment::new(VAlign::Middle, HAlign::Center));
//!
//! assert!(Alignment::parse("xx").is_err());
//!
//! let p = Point::new(3, 4).offset(-1, 2);
//! assert_eq!(p, Point::new(2, 6));
//! ```

use std::fmt;

/// Default grid width in columns.
pub const DEFAULT_COLS: u16 = 80;

/// Default grid height in rows.
pub const DEFAULT_ROWS: u16 = 24;

/// Default terminal flush rate.
pub const DEFAULT_FPS: f64 = 10.0;

/// Default panel composite rate.
pub const DEFAULT_COMPOSITE_FPS: f64 = 20.0;

/// Blit sentinel: a NUL in written text leaves the destination cell untouched.
pub const TRANSPARENT: char = '\0';

/// A position on (or off) the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A width/height pair in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u16, u16)> for Size {
    fn from((width, height): (u16, u16)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Horizontal alignment of a string relative to its anchor column.
///
/// - **Left**: text starts at the anchor
/// - **Center**: text is shifted left by half its length (integer division)
/// - **Right**: text is shifted left by its full length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    /// Parse a horizontal alignment token: `"l"`, `"c"` or `"r"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitten_tui_types::HAlign;
    ///
    /// assert_eq!(HAlign::parse("c").unwrap(), HAlign::Center);
    /// assert!(HAlign::parse("t").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DisplayError> {
        match s {
            "l" => Ok(HAlign::Left),
            "c" => Ok(HAlign::Center),
            "r" => Ok(HAlign::Right),
            _ => Err(DisplayError::InvalidAlignment(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HAlign::Left => "l",
            HAlign::Center => "c",
            HAlign::Right => "r",
        }
    }

    /// How far an item of length `len` moves left of its anchor.
    pub fn shift(&self, len: i32) -> i32 {
        match self {
            HAlign::Left => 0,
            HAlign::Center => len / 2,
            HAlign::Right => len,
        }
    }
}

/// Vertical alignment of a string relative to its anchor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    /// Parse a vertical alignment token: `"t"`, `"m"` or `"b"`.
    pub fn parse(s: &str) -> Result<Self, DisplayError> {
        match s {
            "t" => Ok(VAlign::Top),
            "m" => Ok(VAlign::Middle),
            "b" => Ok(VAlign::Bottom),
            _ => Err(DisplayError::InvalidAlignment(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VAlign::Top => "t",
            VAlign::Middle => "m",
            VAlign::Bottom => "b",
        }
    }

    /// How far an item of length `len` moves up from its anchor.
    pub fn shift(&self, len: i32) -> i32 {
        match self {
            VAlign::Top => 0,
            VAlign::Middle => len / 2,
            VAlign::Bottom => len,
        }
    }
}

/// Two-axis alignment used when blitting a multi-line block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub vertical: VAlign,
    pub horizontal: HAlign,
}

impl Alignment {
    pub const TOP_LEFT: Alignment = Alignment::new(VAlign::Top, HAlign::Left);
    pub const TOP_CENTER: Alignment = Alignment::new(VAlign::Top, HAlign::Center);
    pub const TOP_RIGHT: Alignment = Alignment::new(VAlign::Top, HAlign::Right);
    pub const MIDDLE_LEFT: Alignment = Alignment::new(VAlign::Middle, HAlign::Left);
    pub const CENTER: Alignment = Alignment::new(VAlign::Middle, HAlign::Center);
    pub const MIDDLE_RIGHT: Alignment = Alignment::new(VAlign::Middle, HAlign::Right);
    pub const BOTTOM_LEFT: Alignment = Alignment::new(VAlign::Bottom, HAlign::Left);
    pub const BOTTOM_CENTER: Alignment = Alignment::new(VAlign::Bottom, HAlign::Center);
    pub const BOTTOM_RIGHT: Alignment = Alignment::new(VAlign::Bottom, HAlign::Right);

    pub const fn new(vertical: VAlign, horizontal: HAlign) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Parse a two-letter token: vertical (`t`/`m`/`b`) then horizontal (`l`/`c`/`r`).
    ///
    /// # Examples
    ///
    /// ```
    /// use kitten_tui_types::Alignment;
    ///
    /// assert_eq!(Alignment::parse("tl").unwrap(), Alignment::TOP_LEFT);
    /// assert_eq!(Alignment::parse("br").unwrap(), Alignment::BOTTOM_RIGHT);
    /// assert!(Alignment::parse("lt").is_err());
    /// assert!(Alignment::parse("tlx").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DisplayError> {
        let invalid = || DisplayError::InvalidAlignment(s.to_string());
        if s.len() != 2 || !s.is_ascii() {
            return Err(invalid());
        }
        let (v, h) = s.split_at(1);
        let vertical = VAlign::parse(v).map_err(|_| invalid())?;
        let horizontal = HAlign::parse(h).map_err(|_| invalid())?;
        Ok(Self::new(vertical, horizontal))
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.vertical.as_str(), self.horizontal.as_str())
    }
}

/// Errors raised by the display core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// A panel with this name is already registered.
    NameConflict(String),
    /// No panel is registered under this name.
    NotFound(String),
    /// An alignment token was not recognised. Indicates a caller bug.
    InvalidAlignment(String),
    /// The terminal does not have the configured size.
    TerminalSizeMismatch { expected: Size, actual: Size },
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::NameConflict(name) => {
                write!(f, "{:?} already taken as a panel name", name)
            }
            DisplayError::NotFound(name) => write!(f, "{:?} is not a panel name", name),
            DisplayError::InvalidAlignment(token) => {
                write!(f, "alignment not supported: {:?}", token)
            }
            DisplayError::TerminalSizeMismatch { expected, actual } => write!(
                f,
                "Incorrect terminal size: {}, expected: {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for DisplayError {}
