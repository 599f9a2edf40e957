//! Color representation for terminal cells
//!
//! A cell color is either the terminal default, one of the 256 palette
//! indices, or a direct 24-bit value. Resolving an index to displayable
//! RGB goes through [`Palette`], which layers OSC 4 overrides on top of
//! the computed xterm rendition.

use serde::{Deserialize, Serialize};

/// Color of a cell's foreground, background, or underline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// The terminal's configured default for this slot
    #[default]
    Default,
    /// Palette index: 0-15 ANSI, 16-231 color cube, 232-255 grayscale
    Indexed(u8),
    /// Direct 24-bit color (SGR 38;2 and friends)
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create a direct 24-bit color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }
}

/// The 16 ANSI entries of xterm's default palette. The remaining 240
/// indices are computed, not stored: a 6x6x6 cube and a grayscale ramp.
const ANSI_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),       // black
    (205, 0, 0),     // red
    (0, 205, 0),     // green
    (205, 205, 0),   // yellow
    (0, 0, 238),     // blue
    (205, 0, 205),   // magenta
    (0, 205, 205),   // cyan
    (229, 229, 229), // white
    (127, 127, 127), // bright black
    (255, 0, 0),     // bright red
    (0, 255, 0),     // bright green
    (255, 255, 0),   // bright yellow
    (92, 92, 255),   // bright blue
    (255, 0, 255),   // bright magenta
    (0, 255, 255),   // bright cyan
    (255, 255, 255), // bright white
];

/// Channel intensities used by the 16..232 color cube
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// The 256-entry color palette with per-entry runtime overrides.
///
/// OSC 4 replaces individual entries; OSC 104 restores them. Entries
/// without an override resolve to the standard xterm rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    overrides: Vec<Option<(u8, u8, u8)>>,
}

impl Palette {
    /// Create a palette with no overrides
    pub fn new() -> Self {
        Self {
            overrides: vec![None; 256],
        }
    }

    /// Override a palette entry
    pub fn set(&mut self, index: u8, rgb: (u8, u8, u8)) {
        self.overrides[index as usize] = Some(rgb);
    }

    /// Restore a single entry to its default
    pub fn reset(&mut self, index: u8) {
        self.overrides[index as usize] = None;
    }

    /// Restore every entry to its default
    pub fn reset_all(&mut self) {
        for entry in &mut self.overrides {
            *entry = None;
        }
    }

    /// Resolve a color to RGB against this palette. `Default` resolves
    /// to white; embedders carrying their own default colors should
    /// test for `Color::Default` before calling.
    pub fn resolve(&self, color: Color) -> (u8, u8, u8) {
        match color {
            Color::Default => (255, 255, 255),
            Color::Indexed(index) => self.index_rgb(index),
            Color::Rgb { r, g, b } => (r, g, b),
        }
    }

    /// RGB rendition of a palette index, honoring overrides
    pub fn index_rgb(&self, index: u8) -> (u8, u8, u8) {
        if let Some(rgb) = self.overrides[index as usize] {
            return rgb;
        }
        Self::base(index)
    }

    /// The built-in rendition: ANSI table, then cube, then grayscale
    fn base(index: u8) -> (u8, u8, u8) {
        if let Some(&rgb) = ANSI_COLORS.get(index as usize) {
            return rgb;
        }
        if index >= 232 {
            // 24 grays from 8 to 238 in steps of 10
            let level = 8 + 10 * (index - 232);
            return (level, level, level);
        }
        let cell = index - 16;
        (
            CUBE_LEVELS[(cell / 36) as usize],
            CUBE_LEVELS[(cell / 6 % 6) as usize],
            CUBE_LEVELS[(cell % 6) as usize],
        )
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
