//! Terminal-level mode state
//!
//! Modes that belong to the terminal rather than to one screen buffer:
//! input encodings (cursor keys, keypad, mouse, bracketed paste), cursor
//! presentation, and the stubs for modes we accept but do not render.
//! The buffer-local modes (origin, auto-wrap, insert) live on
//! `tatami_core::Buffer` and travel with the screen they affect.

use serde::{Deserialize, Serialize};

/// Mouse reporting mode, last DECSET wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    /// No mouse reporting
    #[default]
    Off,
    /// Mode 9: press events only, no modifiers
    X10,
    /// Mode 1000: press and release
    Normal,
    /// Mode 1002: press, release, and motion while a button is held
    ButtonEvent,
    /// Mode 1003: all of the above plus bare motion
    AnyEvent,
}

/// Mouse coordinate encoding, last DECSET wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseEncoding {
    /// Classic 6-byte `CSI M` with +32 offsets, coordinates capped at 223
    #[default]
    X10,
    /// Mode 1005: coordinates above 95 become two UTF-8 bytes
    Utf8,
    /// Mode 1006: `CSI < b ; x ; y M|m`
    Sgr,
    /// Mode 1015: `CSI b ; x ; y M`
    Urxvt,
}

/// DECCKM: how arrow keys encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorKeysMode {
    #[default]
    Normal,
    Application,
}

/// DECKPAM/DECKPNM: how keypad keys encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeypadMode {
    #[default]
    Normal,
    Application,
}

/// DECSCUSR cursor shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Bar,
}

/// Terminal mode flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// LNM: LF implies CR
    pub linefeed: bool,
    /// DECTCEM (25): cursor visible
    pub cursor_visible: bool,
    /// Mode 12: cursor blink
    pub cursor_blink: bool,
    /// DECCOLM (3): 132-column mode; tracked but not resizing anything
    pub column_132: bool,
    /// DECSCNM (5): reverse video; tracked for renderers
    pub reverse_video: bool,
    /// DECCKM (1)
    pub cursor_keys: CursorKeysMode,
    /// DECKPAM / DECKPNM
    pub keypad: KeypadMode,
    /// Modes 9/1000/1002/1003
    pub mouse_mode: MouseMode,
    /// Modes 1005/1006/1015
    pub mouse_encoding: MouseEncoding,
    /// Mode 2004: wrap pastes in begin/end markers
    pub bracketed_paste: bool,
    /// Mode 1004: report focus in/out
    pub focus_reporting: bool,
    /// Whether the alternate screen is active (47/1047/1049)
    pub alternate_screen: bool,
}

impl Modes {
    pub fn new() -> Self {
        Self {
            linefeed: false,
            cursor_visible: true,
            cursor_blink: true,
            column_132: false,
            reverse_video: false,
            cursor_keys: CursorKeysMode::Normal,
            keypad: KeypadMode::Normal,
            mouse_mode: MouseMode::Off,
            mouse_encoding: MouseEncoding::X10,
            bracketed_paste: false,
            focus_reporting: false,
            alternate_screen: false,
        }
    }

    /// Reset all modes to defaults
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether any mouse reporting is active
    pub fn mouse_enabled(&self) -> bool {
        self.mouse_mode != MouseMode::Off
    }
}

impl Default for Modes {
    fn default() -> Self {
        Self::new()
    }
}
