//! Cursor state
//!
//! The cursor tracks its grid position, the style applied to newly written
//! cells, and the deferred-wrap flag. The column always stays inside the
//! grid; a write into the last column raises `pending_wrap` instead of
//! moving past the edge, and the next printed character performs the wrap.

use serde::{Deserialize, Serialize};

use crate::charset::CharsetState;
use crate::style::Style;

/// Cursor state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed, always < width)
    pub col: usize,
    /// Style applied to newly written cells
    pub style: Style,
    /// The next print should wrap to the following line first
    pub pending_wrap: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the home position with default style
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Saved cursor state for DECSC/DECRC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor {
    pub row: usize,
    pub col: usize,
    pub style: Style,
    pub pending_wrap: bool,
    pub origin_mode: bool,
    pub charsets: CharsetState,
}
