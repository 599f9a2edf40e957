//! Terminal state machine
//!
//! Owns the primary and alternate screen buffers, drives the parser, and
//! applies the semantics of every control function. Device replies are
//! queued in arrival order for the embedder to drain.

use tatami_core::{Buffer, Color, Dimensions, Palette, Style, UnderlineStyle};
use tatami_parser::{Action, CsiAction, EscAction, OscAction, Params, Parser};

use crate::input::{self, Key, Modifiers, MouseInput};
use crate::modes::{CursorKeysMode, CursorShape, KeypadMode, Modes, MouseEncoding, MouseMode};
use crate::palette::parse_color_spec;

const DEFAULT_FG: (u8, u8, u8) = (212, 212, 212);
const DEFAULT_BG: (u8, u8, u8) = (30, 30, 30);
const DEFAULT_CURSOR: (u8, u8, u8) = (255, 255, 255);

/// The terminal emulator state machine
pub struct Terminal {
    primary: Buffer,
    alternate: Buffer,
    use_alternate: bool,
    parser: Parser,
    modes: Modes,
    cursor_shape: CursorShape,
    title: String,
    icon_name: String,
    palette: Palette,
    fg_color: (u8, u8, u8),
    bg_color: (u8, u8, u8),
    cursor_color: (u8, u8, u8),
    /// Previous printable, replayed by REP
    last_printed: Option<char>,
    /// Replies awaiting the embedder, in trigger order
    output: Vec<u8>,
    title_changed: bool,
    bell: bool,
    resize_request: Option<(usize, usize)>,
}

impl Terminal {
    /// Create a terminal with the given dimensions (clamped to 1x1)
    pub fn new(cols: usize, rows: usize) -> Self {
        let dims = Dimensions::new(cols, rows);
        Self {
            primary: Buffer::new(dims),
            alternate: Buffer::new(dims),
            use_alternate: false,
            parser: Parser::new(),
            modes: Modes::new(),
            cursor_shape: CursorShape::Block,
            title: String::new(),
            icon_name: String::new(),
            palette: Palette::new(),
            fg_color: DEFAULT_FG,
            bg_color: DEFAULT_BG,
            cursor_color: DEFAULT_CURSOR,
            last_printed: None,
            output: Vec::new(),
            title_changed: false,
            bell: false,
            resize_request: None,
        }
    }

    /// The active screen buffer
    pub fn buffer(&self) -> &Buffer {
        if self.use_alternate {
            &self.alternate
        } else {
            &self.primary
        }
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        if self.use_alternate {
            &mut self.alternate
        } else {
            &mut self.primary
        }
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    pub fn cursor_shape(&self) -> CursorShape {
        self.cursor_shape
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Process a chunk of bytes from the child process
    pub fn feed(&mut self, data: &[u8]) {
        let mut actions = Vec::new();
        self.parser.feed(data, |action| actions.push(action));
        for action in actions {
            self.handle_action(action);
        }
    }

    /// Resize both screen buffers
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let dims = Dimensions::new(cols, rows);
        self.primary.resize(dims);
        self.alternate.resize(dims);
    }

    /// Drain queued device replies
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Check and clear the bell flag
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Check and clear the title-changed flag
    pub fn take_title_changed(&mut self) -> bool {
        std::mem::take(&mut self.title_changed)
    }

    /// A `CSI 8 ; rows ; cols t` resize request, if one arrived
    pub fn take_resize_request(&mut self) -> Option<(usize, usize)> {
        self.resize_request.take()
    }

    // --- input encoding ---

    /// Encode a key event under the current keyboard modes
    pub fn input_key(&self, key: Key, modifiers: Modifiers) -> Vec<u8> {
        input::encode_key(key, modifiers, self.modes.cursor_keys, self.modes.keypad)
    }

    /// Encode a mouse event; coordinates are clipped into the grid.
    /// Returns nothing when mouse reporting is off.
    pub fn input_mouse(&self, mut input: MouseInput) -> Vec<u8> {
        let buffer = self.buffer();
        input.col = input.col.clamp(1, buffer.cols() as u16);
        input.row = input.row.clamp(1, buffer.rows() as u16);
        input::encode_mouse(&input, self.modes.mouse_mode, self.modes.mouse_encoding)
    }

    /// Encode a focus change; empty unless focus reporting is on
    pub fn input_focus(&self, focused: bool) -> Vec<u8> {
        if self.modes.focus_reporting {
            input::encode_focus(focused)
        } else {
            Vec::new()
        }
    }

    /// Encode a paste, bracketed when mode 2004 is on
    pub fn paste(&self, data: &str) -> Vec<u8> {
        if self.modes.bracketed_paste {
            let mut bytes = input::paste_start().to_vec();
            bytes.extend_from_slice(data.as_bytes());
            bytes.extend_from_slice(input::paste_end());
            bytes
        } else {
            data.as_bytes().to_vec()
        }
    }

    // --- dispatch ---

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Print(c) => {
                self.buffer_mut().print(c);
                self.last_printed = Some(c);
            }
            Action::Execute(byte) => self.handle_execute(byte),
            Action::Esc(esc) => self.handle_esc(esc),
            Action::Csi(csi) => self.handle_csi(csi),
            Action::Osc(osc) => self.handle_osc(osc),
            Action::Dcs {
                params,
                intermediates,
                final_byte,
                data,
            } => self.handle_dcs(params, &intermediates, final_byte, &data),
        }
    }

    fn handle_execute(&mut self, byte: u8) {
        match byte {
            0x07 => self.bell = true,
            0x08 => self.buffer_mut().backspace(),
            0x09 => self.buffer_mut().tab_forward(1),
            0x0A..=0x0C => {
                let implies_cr = self.modes.linefeed;
                let buffer = self.buffer_mut();
                buffer.linefeed();
                if implies_cr {
                    buffer.carriage_return();
                }
            }
            0x0D => self.buffer_mut().carriage_return(),
            0x0E => self.buffer_mut().charsets.shift_out(),
            0x0F => self.buffer_mut().charsets.shift_in(),
            _ => {}
        }
    }

    fn handle_esc(&mut self, esc: EscAction) {
        match esc {
            EscAction::SaveCursor => self.buffer_mut().save_cursor(),
            EscAction::RestoreCursor => self.buffer_mut().restore_cursor(),
            EscAction::Index => self.buffer_mut().linefeed(),
            EscAction::ReverseIndex => self.buffer_mut().reverse_linefeed(),
            EscAction::NextLine => {
                let buffer = self.buffer_mut();
                buffer.linefeed();
                buffer.carriage_return();
            }
            EscAction::TabSet => self.buffer_mut().set_tab_stop(),
            EscAction::FullReset => self.full_reset(),
            EscAction::KeypadApplication => self.modes.keypad = KeypadMode::Application,
            EscAction::KeypadNumeric => self.modes.keypad = KeypadMode::Normal,
            EscAction::DesignateCharset(slot, c) => {
                self.buffer_mut().charsets.designate(slot, c)
            }
            EscAction::AlignmentTest => self.buffer_mut().alignment_fill(),
            EscAction::SingleShift(slot) => self.buffer_mut().charsets.set_single_shift(slot),
            EscAction::LockShiftGl(slot) => self.buffer_mut().charsets.lock_shift_gl(slot),
            EscAction::LockShiftGr(slot) => self.buffer_mut().charsets.lock_shift_gr(slot),
            EscAction::Unknown(data) => {
                log::debug!("unknown ESC sequence: {:?}", data);
            }
        }
    }

    fn handle_csi(&mut self, csi: CsiAction) {
        match (csi.marker, csi.intermediates.as_slice()) {
            (Some('?'), [b'$']) if csi.final_byte == b'p' => self.reply_decrqm(&csi),
            (Some('?'), []) => self.handle_csi_private(&csi),
            (Some('>'), []) => self.handle_csi_gt(&csi),
            (None, []) => self.handle_csi_plain(&csi),
            (None, _) => self.handle_csi_intermediate(&csi),
            _ => log::debug!(
                "unknown CSI: marker={:?} intermediates={:?} final={}",
                csi.marker,
                csi.intermediates,
                csi.final_byte as char
            ),
        }
    }

    fn handle_csi_plain(&mut self, csi: &CsiAction) {
        let n = csi.param(0, 1) as usize;
        match csi.final_byte {
            b'@' => self.buffer_mut().insert_chars(n),
            b'A' => self.buffer_mut().move_cursor_up(n),
            b'B' => self.buffer_mut().move_cursor_down(n),
            b'C' => self.buffer_mut().move_cursor_right(n),
            b'D' => self.buffer_mut().move_cursor_left(n),
            b'E' => {
                let buffer = self.buffer_mut();
                buffer.move_cursor_down(n);
                buffer.carriage_return();
            }
            b'F' => {
                let buffer = self.buffer_mut();
                buffer.move_cursor_up(n);
                buffer.carriage_return();
            }
            b'G' | b'`' => self.buffer_mut().set_cursor_col(n),
            b'H' | b'f' => {
                let row = csi.param(0, 1) as usize;
                let col = csi.param(1, 1) as usize;
                self.buffer_mut().move_cursor_to(row, col);
            }
            b'I' => self.buffer_mut().tab_forward(n),
            b'Z' => self.buffer_mut().tab_backward(n),
            b'J' => self.buffer_mut().erase_in_display(csi.param(0, 0)),
            b'K' => self.buffer_mut().erase_in_line(csi.param(0, 0)),
            b'L' => self.buffer_mut().insert_lines(n),
            b'M' => self.buffer_mut().delete_lines(n),
            b'P' => self.buffer_mut().delete_chars(n),
            b'S' => self.buffer_mut().scroll_up(n),
            b'T' => self.buffer_mut().scroll_down(n),
            b'X' => self.buffer_mut().erase_chars(n),
            b'b' => {
                if let Some(c) = self.last_printed {
                    for _ in 0..n {
                        self.buffer_mut().print(c);
                    }
                }
            }
            b'd' => self.buffer_mut().set_cursor_row(n),
            b'g' => self.buffer_mut().clear_tab_stop(csi.param(0, 0)),
            b'h' => {
                for param in csi.params.iter() {
                    self.set_ansi_mode(param, true);
                }
            }
            b'l' => {
                for param in csi.params.iter() {
                    self.set_ansi_mode(param, false);
                }
            }
            b'm' => self.handle_sgr(csi),
            b'n' => self.reply_dsr(csi.param(0, 0), false),
            b'c' => self.queue_reply(b"\x1b[?62;22c"),
            b'r' => {
                let rows = self.buffer().rows() as u16;
                let top = csi.param(0, 1) as usize;
                let bottom = csi.param(1, rows) as usize;
                self.buffer_mut().set_scroll_region(top, bottom);
            }
            b's' => self.buffer_mut().save_cursor(),
            b'u' => self.buffer_mut().restore_cursor(),
            b't' => self.handle_window_op(csi),
            _ => log::debug!(
                "unknown CSI sequence: {:?} {}",
                csi.params,
                csi.final_byte as char
            ),
        }
    }

    fn handle_csi_private(&mut self, csi: &CsiAction) {
        match csi.final_byte {
            b'h' => {
                for param in csi.params.iter() {
                    self.set_dec_mode(param, true);
                }
            }
            b'l' => {
                for param in csi.params.iter() {
                    self.set_dec_mode(param, false);
                }
            }
            b'n' => self.reply_dsr(csi.param(0, 0), true),
            _ => log::debug!(
                "unknown private CSI: ?{:?}{}",
                csi.params,
                csi.final_byte as char
            ),
        }
    }

    fn handle_csi_gt(&mut self, csi: &CsiAction) {
        match csi.final_byte {
            // Secondary DA
            b'c' => self.queue_reply(b"\x1b[>0;10;1c"),
            // XTVERSION
            b'q' => {
                let reply = format!("\x1bP>|tatami({})\x1b\\", env!("CARGO_PKG_VERSION"));
                self.queue_reply(reply.as_bytes());
            }
            _ => log::debug!(
                "unknown CSI >: {:?} {}",
                csi.params,
                csi.final_byte as char
            ),
        }
    }

    fn handle_csi_intermediate(&mut self, csi: &CsiAction) {
        match (csi.intermediates.as_slice(), csi.final_byte) {
            ([b'!'], b'p') => self.soft_reset(),
            ([b' '], b'q') => {
                let (shape, blink) = match csi.param(0, 1) {
                    0 | 1 => (CursorShape::Block, true),
                    2 => (CursorShape::Block, false),
                    3 => (CursorShape::Underline, true),
                    4 => (CursorShape::Underline, false),
                    5 => (CursorShape::Bar, true),
                    6 => (CursorShape::Bar, false),
                    _ => return,
                };
                self.cursor_shape = shape;
                self.modes.cursor_blink = blink;
            }
            _ => log::debug!(
                "unknown CSI with intermediates {:?}: {:?} {}",
                csi.intermediates,
                csi.params,
                csi.final_byte as char
            ),
        }
    }

    fn handle_window_op(&mut self, csi: &CsiAction) {
        match csi.param(0, 0) {
            8 => {
                let rows = csi.params.raw(1) as usize;
                let cols = csi.params.raw(2) as usize;
                if rows > 0 && cols > 0 {
                    self.resize_request = Some((cols, rows));
                }
            }
            18 => {
                let reply = format!(
                    "\x1b[8;{};{}t",
                    self.buffer().rows(),
                    self.buffer().cols()
                );
                self.queue_reply(reply.as_bytes());
            }
            22 | 23 => log::debug!("title stack window op ignored"),
            op => log::debug!("unknown window op: {}", op),
        }
    }

    // --- modes ---

    fn set_ansi_mode(&mut self, mode: u16, value: bool) {
        match mode {
            4 => self.buffer_mut().insert_mode = value,
            20 => self.modes.linefeed = value,
            _ => log::debug!("unknown ANSI mode: {}", mode),
        }
    }

    fn set_dec_mode(&mut self, mode: u16, value: bool) {
        match mode {
            1 => {
                self.modes.cursor_keys = if value {
                    CursorKeysMode::Application
                } else {
                    CursorKeysMode::Normal
                };
            }
            3 => {
                // DECCOLM tracked only; no 80/132 column switching
                self.modes.column_132 = value;
            }
            5 => self.modes.reverse_video = value,
            6 => {
                let buffer = self.buffer_mut();
                buffer.origin_mode = value;
                buffer.move_cursor_to(1, 1);
            }
            7 => self.buffer_mut().auto_wrap = value,
            9 => self.set_mouse_mode(MouseMode::X10, value),
            12 => self.modes.cursor_blink = value,
            25 => self.modes.cursor_visible = value,
            47 | 1047 => {
                if value {
                    self.enter_alternate(false);
                } else {
                    self.exit_alternate();
                }
            }
            1048 => {
                if value {
                    self.buffer_mut().save_cursor();
                } else {
                    self.buffer_mut().restore_cursor();
                }
            }
            1049 => {
                if value {
                    self.buffer_mut().save_cursor();
                    self.enter_alternate(true);
                } else {
                    self.exit_alternate();
                    self.buffer_mut().restore_cursor();
                }
            }
            1000 => self.set_mouse_mode(MouseMode::Normal, value),
            1002 => self.set_mouse_mode(MouseMode::ButtonEvent, value),
            1003 => self.set_mouse_mode(MouseMode::AnyEvent, value),
            1004 => self.modes.focus_reporting = value,
            1005 => self.set_mouse_encoding(MouseEncoding::Utf8, value),
            1006 => self.set_mouse_encoding(MouseEncoding::Sgr, value),
            1015 => self.set_mouse_encoding(MouseEncoding::Urxvt, value),
            2004 => self.modes.bracketed_paste = value,
            _ => log::debug!("unknown DEC private mode: {}", mode),
        }
    }

    fn set_mouse_mode(&mut self, mode: MouseMode, value: bool) {
        if value {
            self.modes.mouse_mode = mode;
        } else if self.modes.mouse_mode == mode {
            self.modes.mouse_mode = MouseMode::Off;
        }
    }

    fn set_mouse_encoding(&mut self, encoding: MouseEncoding, value: bool) {
        if value {
            self.modes.mouse_encoding = encoding;
        } else if self.modes.mouse_encoding == encoding {
            self.modes.mouse_encoding = MouseEncoding::X10;
        }
    }

    /// Mode state for DECRQM: Some(set) for known modes, None for unknown
    fn dec_mode_state(&self, mode: u16) -> Option<bool> {
        let buffer = self.buffer();
        match mode {
            1 => Some(self.modes.cursor_keys == CursorKeysMode::Application),
            3 => Some(self.modes.column_132),
            5 => Some(self.modes.reverse_video),
            6 => Some(buffer.origin_mode),
            7 => Some(buffer.auto_wrap),
            9 => Some(self.modes.mouse_mode == MouseMode::X10),
            12 => Some(self.modes.cursor_blink),
            25 => Some(self.modes.cursor_visible),
            47 | 1047 | 1049 => Some(self.modes.alternate_screen),
            1000 => Some(self.modes.mouse_mode == MouseMode::Normal),
            1002 => Some(self.modes.mouse_mode == MouseMode::ButtonEvent),
            1003 => Some(self.modes.mouse_mode == MouseMode::AnyEvent),
            1004 => Some(self.modes.focus_reporting),
            1005 => Some(self.modes.mouse_encoding == MouseEncoding::Utf8),
            1006 => Some(self.modes.mouse_encoding == MouseEncoding::Sgr),
            1015 => Some(self.modes.mouse_encoding == MouseEncoding::Urxvt),
            2004 => Some(self.modes.bracketed_paste),
            _ => None,
        }
    }

    fn reply_decrqm(&mut self, csi: &CsiAction) {
        let mode = csi.params.raw(0);
        let ps = match self.dec_mode_state(mode) {
            Some(true) => 1,
            Some(false) => 2,
            None => 0,
        };
        let reply = format!("\x1b[?{};{}$y", mode, ps);
        self.queue_reply(reply.as_bytes());
    }

    // --- alternate screen ---

    fn enter_alternate(&mut self, clear: bool) {
        self.use_alternate = true;
        self.modes.alternate_screen = true;
        if clear {
            self.alternate.cursor.reset();
            self.alternate.erase_in_display(2);
        }
    }

    fn exit_alternate(&mut self) {
        self.use_alternate = false;
        self.modes.alternate_screen = false;
    }

    // --- device replies ---

    fn queue_reply(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    fn reply_dsr(&mut self, kind: u16, private: bool) {
        match kind {
            5 => self.queue_reply(b"\x1b[0n"),
            6 => {
                let buffer = self.buffer();
                let (top, _) = buffer.scroll_region();
                let row = if buffer.origin_mode {
                    buffer.cursor.row.saturating_sub(top)
                } else {
                    buffer.cursor.row
                } + 1;
                let col = buffer.cursor.col + 1;
                let reply = if private {
                    format!("\x1b[?{};{}R", row, col)
                } else {
                    format!("\x1b[{};{}R", row, col)
                };
                self.queue_reply(reply.as_bytes());
            }
            _ => log::debug!("unknown DSR request: {}", kind),
        }
    }

    // --- SGR ---

    fn handle_sgr(&mut self, csi: &CsiAction) {
        if csi.params.is_empty() {
            self.buffer_mut().cursor.style.reset();
            return;
        }

        let params: Vec<(u16, Vec<u16>)> = csi
            .params
            .iter_with_subparams()
            .map(|(v, subs)| (v, subs.to_vec()))
            .collect();

        let mut style = self.buffer().cursor.style;
        let mut i = 0;
        while i < params.len() {
            let value = params[i].0;
            let subs = &params[i].1;
            match value {
                0 => style.reset(),
                1 => style.bold = true,
                2 => style.dim = true,
                3 => style.italic = true,
                4 => {
                    style.underline = match subs.first().copied() {
                        Some(0) => UnderlineStyle::None,
                        Some(2) => UnderlineStyle::Double,
                        Some(3) => UnderlineStyle::Curly,
                        Some(4) => UnderlineStyle::Dotted,
                        Some(5) => UnderlineStyle::Dashed,
                        _ => UnderlineStyle::Single,
                    };
                }
                5 | 6 => style.blink = true,
                7 => style.inverse = true,
                8 => style.hidden = true,
                9 => style.strike = true,
                21 => style.underline = UnderlineStyle::Double,
                22 => {
                    style.bold = false;
                    style.dim = false;
                }
                23 => style.italic = false,
                24 => style.underline = UnderlineStyle::None,
                25 => style.blink = false,
                27 => style.inverse = false,
                28 => style.hidden = false,
                29 => style.strike = false,
                30..=37 => style.fg = Color::Indexed((value - 30) as u8),
                38 => {
                    if let Some(color) = self.extended_color(&params, &mut i) {
                        style.fg = color;
                    }
                }
                39 => style.fg = Color::Default,
                40..=47 => style.bg = Color::Indexed((value - 40) as u8),
                48 => {
                    if let Some(color) = self.extended_color(&params, &mut i) {
                        style.bg = color;
                    }
                }
                49 => style.bg = Color::Default,
                53 => style.overline = true,
                55 => style.overline = false,
                58 => {
                    if let Some(color) = self.extended_color(&params, &mut i) {
                        style.underline_color = color;
                    }
                }
                59 => style.underline_color = Color::Default,
                90..=97 => style.fg = Color::Indexed((value - 90 + 8) as u8),
                100..=107 => style.bg = Color::Indexed((value - 100 + 8) as u8),
                other => log::debug!("unknown SGR parameter: {}", other),
            }
            i += 1;
        }
        self.buffer_mut().cursor.style = style;
    }

    /// Decode the color that follows SGR 38/48/58 in either the
    /// semicolon form (`38;5;n`, `38;2;r;g;b`, advancing `i`) or the
    /// colon subparameter form (`38:5:n`, `38:2::r:g:b`).
    fn extended_color(&self, params: &[(u16, Vec<u16>)], i: &mut usize) -> Option<Color> {
        let subs = &params[*i].1;
        if !subs.is_empty() {
            return match subs[0] {
                5 => subs.get(1).map(|&n| Color::Indexed(n.min(255) as u8)),
                2 => {
                    // With a colorspace id: 2::r:g:b; without: 2:r:g:b
                    let rgb = if subs.len() >= 5 { &subs[2..5] } else { subs.get(1..4)? };
                    Some(Color::rgb(
                        rgb[0].min(255) as u8,
                        rgb[1].min(255) as u8,
                        rgb[2].min(255) as u8,
                    ))
                }
                _ => None,
            };
        }

        match params.get(*i + 1).map(|p| p.0) {
            Some(5) => {
                let color = params
                    .get(*i + 2)
                    .map(|p| Color::Indexed(p.0.min(255) as u8));
                *i += if color.is_some() { 2 } else { 1 };
                color
            }
            Some(2) => {
                if params.len() > *i + 4 {
                    let color = Color::rgb(
                        params[*i + 2].0.min(255) as u8,
                        params[*i + 3].0.min(255) as u8,
                        params[*i + 4].0.min(255) as u8,
                    );
                    *i += 4;
                    Some(color)
                } else {
                    *i = params.len();
                    None
                }
            }
            _ => None,
        }
    }

    // --- OSC ---

    fn handle_osc(&mut self, osc: OscAction) {
        match osc {
            OscAction::SetIconAndTitle(text) => {
                self.icon_name = text.clone();
                self.set_title(text);
            }
            OscAction::SetTitle(text) => self.set_title(text),
            OscAction::SetIconName(text) => self.icon_name = text,
            OscAction::SetPalette(payload) => self.set_palette_entries(&payload),
            OscAction::SetForeground(spec) => {
                if spec == "?" {
                    self.reply_color_query(10, self.fg_color);
                } else if let Some(rgb) = parse_or_log(&spec) {
                    self.fg_color = rgb;
                }
            }
            OscAction::SetBackground(spec) => {
                if spec == "?" {
                    self.reply_color_query(11, self.bg_color);
                } else if let Some(rgb) = parse_or_log(&spec) {
                    self.bg_color = rgb;
                }
            }
            OscAction::SetCursorColor(spec) => {
                if spec == "?" {
                    self.reply_color_query(12, self.cursor_color);
                } else if let Some(rgb) = parse_or_log(&spec) {
                    self.cursor_color = rgb;
                }
            }
            OscAction::Clipboard { selection, data } => {
                // Clipboard access belongs to the embedder
                log::debug!(
                    "OSC 52 clipboard ignored: selection={:?} {} bytes",
                    selection,
                    data.len()
                );
            }
            OscAction::ResetPalette(None) => self.palette.reset_all(),
            OscAction::ResetPalette(Some(indices)) => {
                for index in indices.split(';') {
                    match index.parse::<u8>() {
                        Ok(i) => self.palette.reset(i),
                        Err(_) => log::debug!("bad palette reset index: {:?}", index),
                    }
                }
            }
            OscAction::ResetForeground => self.fg_color = DEFAULT_FG,
            OscAction::ResetBackground => self.bg_color = DEFAULT_BG,
            OscAction::ResetCursorColor => self.cursor_color = DEFAULT_CURSOR,
            OscAction::Unknown { command, data } => {
                log::debug!("unknown OSC {}: {:?}", command, data);
            }
        }
    }

    fn set_title(&mut self, text: String) {
        // Bound the title to keep hostile output from hoarding memory
        self.title = text.chars().take(4096).collect();
        self.title_changed = true;
    }

    /// OSC 4 payload: one or more `index;colorspec` pairs
    fn set_palette_entries(&mut self, payload: &str) {
        let mut parts = payload.split(';');
        while let (Some(index), Some(spec)) = (parts.next(), parts.next()) {
            let Ok(index) = index.parse::<u8>() else {
                log::debug!("bad palette index: {:?}", index);
                continue;
            };
            match parse_color_spec(spec) {
                Ok(rgb) => self.palette.set(index, rgb),
                Err(err) => log::debug!("bad palette color for {}: {}", index, err),
            }
        }
    }

    fn reply_color_query(&mut self, command: u16, (r, g, b): (u8, u8, u8)) {
        // 16-bit channels, high byte repeated, as xterm replies
        let reply = format!(
            "\x1b]{};rgb:{:04x}/{:04x}/{:04x}\x07",
            command,
            (r as u16) << 8 | r as u16,
            (g as u16) << 8 | g as u16,
            (b as u16) << 8 | b as u16,
        );
        self.queue_reply(reply.as_bytes());
    }

    // --- DCS ---

    fn handle_dcs(&mut self, params: Params, intermediates: &[u8], final_byte: u8, data: &[u8]) {
        // DECRQSS: DCS $ q <setting> ST
        if intermediates == [b'$'] && final_byte == b'q' {
            match data {
                b"m" => self.queue_reply(b"\x1bP1$r0m\x1b\\"),
                b"r" => {
                    let (top, bottom) = self.buffer().scroll_region();
                    let reply = format!("\x1bP1$r{};{}r\x1b\\", top + 1, bottom + 1);
                    self.queue_reply(reply.as_bytes());
                }
                b" q" => {
                    let shape = match (self.cursor_shape, self.modes.cursor_blink) {
                        (CursorShape::Block, true) => 1,
                        (CursorShape::Block, false) => 2,
                        (CursorShape::Underline, true) => 3,
                        (CursorShape::Underline, false) => 4,
                        (CursorShape::Bar, true) => 5,
                        (CursorShape::Bar, false) => 6,
                    };
                    let reply = format!("\x1bP1$r{} q\x1b\\", shape);
                    self.queue_reply(reply.as_bytes());
                }
                _ => {
                    self.queue_reply(b"\x1bP0$r\x1b\\");
                    log::debug!("unknown DECRQSS query: {:?}", data);
                }
            }
            return;
        }
        log::debug!(
            "DCS skipped: params={:?} intermediates={:?} final={}  {} bytes",
            params,
            intermediates,
            final_byte as char,
            data.len()
        );
    }

    // --- resets ---

    /// DECSTR soft reset: keyboard modes, margins, and SGR state return
    /// to defaults; screen content is untouched
    fn soft_reset(&mut self) {
        self.modes.cursor_keys = CursorKeysMode::Normal;
        self.modes.keypad = KeypadMode::Normal;
        self.modes.cursor_visible = true;
        let buffer = self.buffer_mut();
        buffer.origin_mode = false;
        buffer.auto_wrap = true;
        buffer.insert_mode = false;
        buffer.reset_scroll_region();
        buffer.cursor.style = Style::default();
        buffer.cursor.pending_wrap = false;
    }

    /// RIS full reset: soft reset plus cleared buffers, home cursor,
    /// default charsets, modes, palette, and a drained parser
    fn full_reset(&mut self) {
        // Title intentionally survives, as in xterm
        let dims = self.primary.dimensions();
        self.primary = Buffer::new(dims);
        self.alternate = Buffer::new(dims);
        self.use_alternate = false;
        self.modes.reset();
        self.cursor_shape = CursorShape::Block;
        self.palette.reset_all();
        self.fg_color = DEFAULT_FG;
        self.bg_color = DEFAULT_BG;
        self.cursor_color = DEFAULT_CURSOR;
        self.last_printed = None;
        self.output.clear();
        self.parser.reset();
    }
}

fn parse_or_log(spec: &str) -> Option<(u8, u8, u8)> {
    match parse_color_spec(spec) {
        Ok(rgb) => Some(rgb),
        Err(err) => {
            log::debug!("bad color spec: {}", err);
            None
        }
    }
}
