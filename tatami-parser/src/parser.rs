//! The escape sequence state machine
//!
//! States follow the VT500-series parser diagram. Bytes are classified
//! one at a time; every byte either advances a sequence, executes a
//! control, prints, or is explicitly discarded. All intermediate state
//! (current state, parameter and intermediate buffers, partial UTF-8
//! sequence, string payload) survives between `feed` calls, so input may
//! be chunked anywhere.

use crate::action::{Action, CsiAction, EscAction, OscAction};
use crate::params::Params;
use crate::utf8::{Utf8Decoder, Utf8Result};

/// Cap on OSC/DCS payloads; overflow is discarded but the truncated
/// payload is still dispatched at the terminator
const DEFAULT_MAX_STRING_LEN: usize = 8 * 1024;
/// Cap on intermediate bytes per sequence
const MAX_INTERMEDIATES: usize = 4;
/// Cap on raw parameter bytes per sequence
const MAX_PARAM_BYTES: usize = 256;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Normal text processing
    Ground,
    /// After ESC
    Escape,
    /// Collecting ESC intermediates
    EscapeIntermediate,
    /// After ESC [
    CsiEntry,
    /// Collecting CSI parameters
    CsiParam,
    /// Collecting CSI intermediates
    CsiIntermediate,
    /// Malformed CSI; draining until the final byte
    CsiIgnore,
    /// After ESC P
    DcsEntry,
    /// Collecting DCS parameters
    DcsParam,
    /// Collecting DCS intermediates
    DcsIntermediate,
    /// Collecting the DCS payload
    DcsPassthrough,
    /// Malformed DCS; draining until the string terminator
    DcsIgnore,
    /// After ESC ]
    OscString,
    /// After ESC X / ESC ^ / ESC _; consumed without dispatch
    SosPmApcString,
    /// Mid multi-byte UTF-8 character
    Utf8Continuation,
}

/// The terminal parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    utf8: Utf8Decoder,
    params_buf: Vec<u8>,
    intermediates: Vec<u8>,
    marker: Option<char>,
    string_buf: Vec<u8>,
    dcs_final: u8,
    max_string_len: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_max_string_len(DEFAULT_MAX_STRING_LEN)
    }

    /// Create a parser with a custom OSC/DCS payload cap
    pub fn with_max_string_len(max_string_len: usize) -> Self {
        Self {
            state: State::Ground,
            utf8: Utf8Decoder::new(),
            params_buf: Vec::with_capacity(64),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            marker: None,
            string_buf: Vec::with_capacity(256),
            dcs_final: 0,
            max_string_len,
        }
    }

    /// Current parser state
    pub fn state(&self) -> State {
        self.state
    }

    /// Reset to ground, discarding any sequence in progress
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.utf8.reset();
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = None;
        self.string_buf.clear();
        self.dcs_final = 0;
    }

    /// Feed a chunk of bytes, invoking the callback for each action
    pub fn feed<F>(&mut self, data: &[u8], mut callback: F)
    where
        F: FnMut(Action),
    {
        for &byte in data {
            self.advance(byte, &mut callback);
        }
    }

    /// Feed a chunk and collect the actions into a vector
    pub fn feed_collect(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        self.feed(data, |action| actions.push(action));
        actions
    }

    fn advance<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        // A control byte arriving mid-UTF-8 kills the partial character
        if self.state == State::Utf8Continuation && (byte < 0x20 || byte == 0x7F) {
            self.utf8.reset();
            self.state = State::Ground;
            callback(Action::Print(Utf8Decoder::replacement_char()));
        }

        // String states own their bytes, including most C0 controls
        match self.state {
            State::OscString | State::DcsPassthrough | State::DcsIgnore | State::SosPmApcString => {
                self.handle_string_byte(byte, callback);
                return;
            }
            _ => {}
        }

        match byte {
            0x1B => {
                self.enter_escape();
                return;
            }
            0x18 | 0x1A => {
                // CAN / SUB: abort silently
                self.reset();
                return;
            }
            0x00..=0x1F => {
                // C0 executes without disturbing a sequence in progress
                callback(Action::Execute(byte));
                return;
            }
            0x7F => return, // DEL
            _ => {}
        }

        match self.state {
            State::Ground => self.handle_ground(byte, callback),
            State::Utf8Continuation => self.handle_utf8(byte, callback),
            State::Escape => self.handle_escape(byte, callback),
            State::EscapeIntermediate => self.handle_escape_intermediate(byte, callback),
            State::CsiEntry => self.handle_csi_entry(byte, callback),
            State::CsiParam => self.handle_csi_param(byte, callback),
            State::CsiIntermediate => self.handle_csi_intermediate(byte, callback),
            State::CsiIgnore => self.handle_csi_ignore(byte),
            State::DcsEntry => self.handle_dcs_entry(byte),
            State::DcsParam => self.handle_dcs_param(byte),
            State::DcsIntermediate => self.handle_dcs_intermediate(byte),
            // Handled above
            State::OscString
            | State::DcsPassthrough
            | State::DcsIgnore
            | State::SosPmApcString => {}
        }
    }

    // --- ground / UTF-8 ---

    fn handle_ground<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        if (0x20..=0x7E).contains(&byte) {
            callback(Action::Print(byte as char));
            return;
        }
        match self.utf8.feed(byte) {
            Utf8Result::Char(c) => callback(Action::Print(c)),
            Utf8Result::Pending => self.state = State::Utf8Continuation,
            Utf8Result::Invalid | Utf8Result::InvalidRestart => {
                callback(Action::Print(Utf8Decoder::replacement_char()))
            }
        }
    }

    fn handle_utf8<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.utf8.feed(byte) {
            Utf8Result::Char(c) => {
                self.state = State::Ground;
                callback(Action::Print(c));
            }
            Utf8Result::Pending => {}
            Utf8Result::Invalid => {
                self.state = State::Ground;
                callback(Action::Print(Utf8Decoder::replacement_char()));
            }
            Utf8Result::InvalidRestart => {
                // The byte was not consumed; classify it afresh
                self.state = State::Ground;
                callback(Action::Print(Utf8Decoder::replacement_char()));
                self.advance(byte, callback);
            }
        }
    }

    // --- escape ---

    fn enter_escape(&mut self) {
        self.state = State::Escape;
        self.intermediates.clear();
    }

    fn handle_escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let action = match byte {
            b'[' => {
                self.enter_csi();
                return;
            }
            b']' => {
                self.enter_string(State::OscString);
                return;
            }
            b'P' => {
                self.enter_dcs();
                return;
            }
            b'X' | b'^' | b'_' => {
                self.enter_string(State::SosPmApcString);
                return;
            }
            b'\\' => {
                // ST with no string open
                self.state = State::Ground;
                return;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::EscapeIntermediate;
                return;
            }
            b'7' => EscAction::SaveCursor,
            b'8' => EscAction::RestoreCursor,
            b'D' => EscAction::Index,
            b'M' => EscAction::ReverseIndex,
            b'E' => EscAction::NextLine,
            b'H' => EscAction::TabSet,
            b'c' => EscAction::FullReset,
            b'=' => EscAction::KeypadApplication,
            b'>' => EscAction::KeypadNumeric,
            b'N' => EscAction::SingleShift(2),
            b'O' => EscAction::SingleShift(3),
            b'n' => EscAction::LockShiftGl(2),
            b'o' => EscAction::LockShiftGl(3),
            b'~' => EscAction::LockShiftGr(1),
            b'}' => EscAction::LockShiftGr(2),
            b'|' => EscAction::LockShiftGr(3),
            0x30..=0x7E => EscAction::Unknown(vec![byte]),
            _ => {
                self.state = State::Ground;
                return;
            }
        };
        self.state = State::Ground;
        callback(Action::Esc(action));
    }

    fn handle_escape_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                }
            }
            0x30..=0x7E => {
                self.dispatch_esc(byte, callback);
                self.state = State::Ground;
            }
            _ => self.state = State::Ground,
        }
    }

    fn dispatch_esc<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let action = match (self.intermediates.as_slice(), final_byte) {
            ([b'('], c) => EscAction::DesignateCharset(0, c as char),
            ([b')'], c) => EscAction::DesignateCharset(1, c as char),
            ([b'*'], c) => EscAction::DesignateCharset(2, c as char),
            ([b'+'], c) => EscAction::DesignateCharset(3, c as char),
            ([b'#'], b'8') => EscAction::AlignmentTest,
            _ => {
                let mut data = self.intermediates.clone();
                data.push(final_byte);
                EscAction::Unknown(data)
            }
        };
        callback(Action::Esc(action));
    }

    // --- CSI ---

    fn enter_csi(&mut self) {
        self.state = State::CsiEntry;
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = None;
    }

    fn push_param_byte(&mut self, byte: u8) {
        if self.params_buf.len() < MAX_PARAM_BYTES {
            self.params_buf.push(byte);
        }
    }

    fn handle_csi_entry<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'0'..=b'9' | b';' | b':' => {
                self.push_param_byte(byte);
                self.state = State::CsiParam;
            }
            0x3C..=0x3F => {
                self.marker = Some(byte as char);
                self.state = State::CsiParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::CsiIntermediate;
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, callback);
                self.state = State::Ground;
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    fn handle_csi_param<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'0'..=b'9' | b';' | b':' => self.push_param_byte(byte),
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::CsiIntermediate;
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, callback);
                self.state = State::Ground;
            }
            // Private marker after parameters is malformed
            _ => self.state = State::CsiIgnore,
        }
    }

    fn handle_csi_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                } else {
                    self.state = State::CsiIgnore;
                }
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, callback);
                self.state = State::Ground;
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    fn handle_csi_ignore(&mut self, byte: u8) {
        if (0x40..=0x7E).contains(&byte) {
            self.state = State::Ground;
        }
    }

    fn dispatch_csi<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let action = CsiAction {
            params: Params::parse(&self.params_buf),
            intermediates: self.intermediates.clone(),
            final_byte,
            marker: self.marker,
        };
        callback(Action::Csi(action));
    }

    // --- DCS ---

    fn enter_dcs(&mut self) {
        self.state = State::DcsEntry;
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = None;
        self.string_buf.clear();
        self.dcs_final = 0;
    }

    fn handle_dcs_entry(&mut self, byte: u8) {
        match byte {
            b'0'..=b'9' | b';' | b':' => {
                self.push_param_byte(byte);
                self.state = State::DcsParam;
            }
            0x3C..=0x3F => {
                self.marker = Some(byte as char);
                self.state = State::DcsParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::DcsIntermediate;
            }
            0x40..=0x7E => {
                self.dcs_final = byte;
                self.state = State::DcsPassthrough;
            }
            _ => self.state = State::DcsIgnore,
        }
    }

    fn handle_dcs_param(&mut self, byte: u8) {
        match byte {
            b'0'..=b'9' | b';' | b':' => self.push_param_byte(byte),
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::DcsIntermediate;
            }
            0x40..=0x7E => {
                self.dcs_final = byte;
                self.state = State::DcsPassthrough;
            }
            _ => self.state = State::DcsIgnore,
        }
    }

    fn handle_dcs_intermediate(&mut self, byte: u8) {
        match byte {
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                }
            }
            0x40..=0x7E => {
                self.dcs_final = byte;
                self.state = State::DcsPassthrough;
            }
            _ => self.state = State::DcsIgnore,
        }
    }

    // --- string states ---

    fn enter_string(&mut self, state: State) {
        self.state = state;
        self.string_buf.clear();
    }

    fn handle_string_byte<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x18 | 0x1A => {
                // CAN / SUB discard the string entirely
                self.string_buf.clear();
                self.state = State::Ground;
            }
            0x1B => {
                // ESC terminates the string; it is usually the first half
                // of ST (ESC \), which the Escape state then consumes
                self.finish_string(callback);
                self.enter_escape();
            }
            0x07 if self.state == State::OscString => {
                // BEL terminates OSC (xterm extension)
                self.finish_string(callback);
                self.state = State::Ground;
            }
            _ => match self.state {
                State::OscString => {
                    if byte >= 0x20 {
                        self.collect_string_byte(byte);
                    }
                }
                State::DcsPassthrough => self.collect_string_byte(byte),
                // DcsIgnore and SosPmApcString swallow their payload
                _ => {}
            },
        }
    }

    fn collect_string_byte(&mut self, byte: u8) {
        if self.string_buf.len() < self.max_string_len {
            self.string_buf.push(byte);
        }
    }

    fn finish_string<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.state {
            State::OscString => self.finish_osc(callback),
            State::DcsPassthrough => {
                callback(Action::Dcs {
                    params: Params::parse(&self.params_buf),
                    intermediates: self.intermediates.clone(),
                    final_byte: self.dcs_final,
                    data: std::mem::take(&mut self.string_buf),
                });
            }
            _ => {}
        }
        self.string_buf.clear();
    }

    fn finish_osc<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let data = String::from_utf8_lossy(&self.string_buf).to_string();
        let (cmd_str, payload) = match data.find(';') {
            Some(pos) => (&data[..pos], data[pos + 1..].to_string()),
            None => (data.as_str(), String::new()),
        };

        let Ok(command) = cmd_str.parse::<u16>() else {
            callback(Action::Osc(OscAction::Unknown { command: 0, data }));
            return;
        };

        let action = match command {
            0 => OscAction::SetIconAndTitle(payload),
            1 => OscAction::SetIconName(payload),
            2 => OscAction::SetTitle(payload),
            4 => OscAction::SetPalette(payload),
            10 => OscAction::SetForeground(payload),
            11 => OscAction::SetBackground(payload),
            12 => OscAction::SetCursorColor(payload),
            52 => {
                let (selection, data) = match payload.find(';') {
                    Some(pos) => (payload[..pos].to_string(), payload[pos + 1..].to_string()),
                    None => (String::new(), payload),
                };
                OscAction::Clipboard { selection, data }
            }
            104 => {
                let indices = if payload.is_empty() { None } else { Some(payload) };
                OscAction::ResetPalette(indices)
            }
            110 => OscAction::ResetForeground,
            111 => OscAction::ResetBackground,
            112 => OscAction::ResetCursorColor,
            _ => OscAction::Unknown {
                command,
                data: payload,
            },
        };
        callback(Action::Osc(action));
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
