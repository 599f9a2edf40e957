//! Tatami Parser - escape sequence state machine
//!
//! A byte-driven parser shaped after the DEC VT500-series state diagram
//! (https://vt100.net/emu/dec_ansi_parser). Bytes go in via [`Parser::feed`];
//! semantic [`Action`]s come out through a callback. The parser is fully
//! resumable: feeding a byte stream in arbitrary chunks - split mid-UTF-8,
//! mid-CSI, mid-OSC - produces exactly the same actions as feeding it
//! whole.
//!
//! The parser never fails and never panics; malformed input degrades to
//! replacement characters or silently discarded sequences.

mod action;
mod params;
mod parser;
mod utf8;

pub use action::{Action, CsiAction, EscAction, OscAction};
pub use params::Params;
pub use parser::{Parser, State};
pub use utf8::{Utf8Decoder, Utf8Result};
