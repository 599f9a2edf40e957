//! Tatami Term - the terminal state machine
//!
//! Glues the parser to the screen model: a [`Terminal`] owns a primary
//! and an alternate [`tatami_core::Buffer`], feeds incoming bytes through
//! [`tatami_parser::Parser`], and applies the semantics of every control
//! function to the active buffer. Device replies (cursor reports, device
//! attributes, color queries) accumulate in an output queue the embedder
//! drains and writes back to the child process.
//!
//! The crate also encodes the reverse direction: abstract key and mouse
//! events become the byte sequences a child process expects, honoring the
//! cursor-keys, keypad, mouse, and bracketed-paste modes.
//!
//! The terminal is single-owner and does no I/O; embedders call
//! [`Terminal::feed`] with PTY output and ship [`Terminal::take_output`]
//! plus any encoded input back to the PTY.

mod input;
mod modes;
mod palette;
mod terminal;

pub use input::{Key, Modifiers, MouseAction, MouseButton, MouseInput};
pub use modes::{CursorKeysMode, CursorShape, KeypadMode, Modes, MouseEncoding, MouseMode};
pub use palette::{parse_color_spec, ColorSpecError};
pub use terminal::Terminal;
