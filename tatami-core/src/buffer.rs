//! Screen buffer: one grid plus the cursor state that drives it
//!
//! A terminal owns two of these (primary and alternate). The buffer
//! carries everything that switches with the screen: cursor, saved
//! cursor, scroll region, tab stops, charset table, and the wrap/origin/
//! insert flags. All coordinates arriving from escape sequences are
//! 1-based per the VT conventions; internal storage is 0-based.

use crate::cell::{display_width, Cell};
use crate::charset::CharsetState;
use crate::cursor::{Cursor, SavedCursor};
use crate::grid::Grid;
use crate::line::Line;
use crate::style::Style;
use crate::tabs::TabStops;
use crate::Dimensions;

/// A single screen buffer
#[derive(Debug, Clone)]
pub struct Buffer {
    grid: Grid,
    /// Cursor position, style, and deferred-wrap flag
    pub cursor: Cursor,
    saved_cursor: Option<SavedCursor>,
    /// Scroll region, 0-indexed inclusive; always a valid sub-range
    scroll_top: usize,
    scroll_bottom: usize,
    tabs: TabStops,
    /// DECOM: cursor addressing relative to the scroll region
    pub origin_mode: bool,
    /// DECAWM: writing past the right margin wraps to the next line
    pub auto_wrap: bool,
    /// IRM: printed characters shift the line right instead of overwriting
    pub insert_mode: bool,
    /// G0-G3 designations and the active shift state
    pub charsets: CharsetState,
}

impl Buffer {
    /// Create a blank buffer with the given dimensions
    pub fn new(dims: Dimensions) -> Self {
        Self {
            grid: Grid::new(dims),
            cursor: Cursor::new(),
            saved_cursor: None,
            scroll_top: 0,
            scroll_bottom: dims.rows - 1,
            tabs: TabStops::new(dims.cols),
            origin_mode: false,
            auto_wrap: true,
            insert_mode: false,
            charsets: CharsetState::new(),
        }
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Get a line of the grid
    pub fn line(&self, row: usize) -> &Line {
        self.grid.line(row)
    }

    /// Iterator over lines, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.grid.iter()
    }

    /// Scroll region bounds (top, bottom), 0-indexed inclusive
    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    // --- printing ---

    /// Write one printable character at the cursor and advance it.
    ///
    /// Handles the deferred wrap, charset translation, insert mode, and
    /// wide-glyph placement. A wide glyph that would straddle the right
    /// edge wraps first (or is dropped when auto-wrap is off).
    pub fn print(&mut self, c: char) {
        let c = self.charsets.translate(c);
        self.charsets.clear_single_shift();

        let width = display_width(c) as usize;
        if width == 0 {
            self.attach_combining(c);
            return;
        }

        let cols = self.cols();
        if self.cursor.pending_wrap && self.auto_wrap {
            self.wrap_to_next_line();
        }
        self.cursor.pending_wrap = false;

        if width == 2 && self.cursor.col + 2 > cols {
            if self.auto_wrap && cols >= 2 {
                self.wrap_to_next_line();
            } else {
                // No room for the glyph: blank the cell and drop it
                let style = self.cursor.style.background_fill();
                let (row, col) = (self.cursor.row, self.cursor.col);
                self.grid.line_mut(row).erase_cells(col, 1, style);
                return;
            }
        }

        let style = self.cursor.style;
        let (row, col) = (self.cursor.row, self.cursor.col);
        let line = self.grid.line_mut(row);
        if self.insert_mode {
            line.insert_cells(col, width, style.background_fill());
        }
        line.split_wide_pair(col);
        if width == 2 {
            line.split_wide_pair(col + 1);
        }
        line.set(col, Cell::with_char(c, style));
        if width == 2 {
            line.set(col + 1, Cell::wide_spacer(style));
        }

        let new_col = col + width;
        if new_col >= cols {
            self.cursor.col = cols - 1;
            if self.auto_wrap {
                self.cursor.pending_wrap = true;
            }
        } else {
            self.cursor.col = new_col;
        }
    }

    /// Append a zero-width combining mark to the most recently written cell
    fn attach_combining(&mut self, c: char) {
        let row = self.cursor.row;
        let target = if self.cursor.pending_wrap {
            Some(self.cursor.col)
        } else {
            self.cursor.col.checked_sub(1)
        };
        let Some(mut col) = target else { return };
        if self.grid.line(row).cell(col).is_wide_spacer() && col > 0 {
            col -= 1;
        }
        if !self.grid.line(row).cell(col).is_wide_spacer() {
            self.grid.line_mut(row).cell_mut(col).push_combining(c);
        }
    }

    fn wrap_to_next_line(&mut self) {
        let row = self.cursor.row;
        self.grid.line_mut(row).wrapped = true;
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
        if row == self.scroll_bottom {
            self.scroll_up(1);
        } else if row + 1 < self.rows() {
            self.cursor.row += 1;
        }
    }

    // --- C0-driven motion ---

    /// Line feed: move down, scrolling when at the region bottom
    pub fn linefeed(&mut self) {
        self.cursor.pending_wrap = false;
        if self.cursor.row == self.scroll_bottom {
            self.scroll_up(1);
        } else if self.cursor.row + 1 < self.rows() {
            self.cursor.row += 1;
        }
    }

    /// Reverse line feed: move up, scrolling when at the region top
    pub fn reverse_linefeed(&mut self) {
        self.cursor.pending_wrap = false;
        if self.cursor.row == self.scroll_top {
            self.scroll_down(1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Move left one column; never wraps to the previous line
    pub fn backspace(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
        self.cursor.pending_wrap = false;
    }

    /// Move to the nth next tab stop (or the right edge)
    pub fn tab_forward(&mut self, n: usize) {
        self.cursor.col = self.tabs.forward(self.cursor.col, n);
        self.cursor.pending_wrap = false;
    }

    /// Move to the nth previous tab stop (or column 0)
    pub fn tab_backward(&mut self, n: usize) {
        self.cursor.col = self.tabs.backward(self.cursor.col, n);
        self.cursor.pending_wrap = false;
    }

    /// Set a tab stop at the cursor column (HTS)
    pub fn set_tab_stop(&mut self) {
        self.tabs.set(self.cursor.col);
    }

    /// Clear tab stops (TBC): mode 0 clears at the cursor, 3 clears all
    pub fn clear_tab_stop(&mut self, mode: u16) {
        match mode {
            0 => self.tabs.clear(self.cursor.col),
            3 => self.tabs.clear_all(),
            _ => {}
        }
    }

    // --- cursor addressing ---

    /// Move to an absolute position (1-based). In origin mode rows are
    /// relative to the scroll region top and clamped inside the region.
    pub fn move_cursor_to(&mut self, row: usize, col: usize) {
        let row = row.saturating_sub(1);
        let col = col.saturating_sub(1);
        self.cursor.col = col.min(self.cols() - 1);
        self.cursor.row = if self.origin_mode {
            (self.scroll_top + row).min(self.scroll_bottom)
        } else {
            row.min(self.rows() - 1)
        };
        self.cursor.pending_wrap = false;
    }

    /// Set the cursor column (1-based, CHA/HPA)
    pub fn set_cursor_col(&mut self, col: usize) {
        self.cursor.col = col.saturating_sub(1).min(self.cols() - 1);
        self.cursor.pending_wrap = false;
    }

    /// Set the cursor row (1-based, VPA), origin-mode aware
    pub fn set_cursor_row(&mut self, row: usize) {
        let row = row.saturating_sub(1);
        self.cursor.row = if self.origin_mode {
            (self.scroll_top + row).min(self.scroll_bottom)
        } else {
            row.min(self.rows() - 1)
        };
        self.cursor.pending_wrap = false;
    }

    /// Move up n rows, stopping at the scroll region top when the cursor
    /// starts inside the region
    pub fn move_cursor_up(&mut self, n: usize) {
        let floor = if self.cursor.row >= self.scroll_top {
            self.scroll_top
        } else {
            0
        };
        self.cursor.row = self.cursor.row.saturating_sub(n).max(floor);
        self.cursor.pending_wrap = false;
    }

    /// Move down n rows, stopping at the scroll region bottom when the
    /// cursor starts inside the region
    pub fn move_cursor_down(&mut self, n: usize) {
        let ceil = if self.cursor.row <= self.scroll_bottom {
            self.scroll_bottom
        } else {
            self.rows() - 1
        };
        self.cursor.row = (self.cursor.row + n).min(ceil);
        self.cursor.pending_wrap = false;
    }

    pub fn move_cursor_left(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_sub(n);
        self.cursor.pending_wrap = false;
    }

    pub fn move_cursor_right(&mut self, n: usize) {
        self.cursor.col = (self.cursor.col + n).min(self.cols() - 1);
        self.cursor.pending_wrap = false;
    }

    // --- scrolling and line edits ---

    /// Scroll the region up by n lines
    pub fn scroll_up(&mut self, n: usize) {
        let fill = self.cursor.style.background_fill();
        self.grid.scroll_up(self.scroll_top, self.scroll_bottom, n, fill);
    }

    /// Scroll the region down by n lines
    pub fn scroll_down(&mut self, n: usize) {
        let fill = self.cursor.style.background_fill();
        self.grid.scroll_down(self.scroll_top, self.scroll_bottom, n, fill);
    }

    /// Insert n blank lines at the cursor (IL); no-op outside the region.
    /// The cursor moves to column 0.
    pub fn insert_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return;
        }
        let fill = self.cursor.style.background_fill();
        self.grid.insert_lines(row, n, self.scroll_bottom, fill);
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Delete n lines at the cursor (DL); no-op outside the region.
    /// The cursor moves to column 0.
    pub fn delete_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return;
        }
        let fill = self.cursor.style.background_fill();
        self.grid.delete_lines(row, n, self.scroll_bottom, fill);
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Insert n blank cells at the cursor (ICH)
    pub fn insert_chars(&mut self, n: usize) {
        let fill = self.cursor.style.background_fill();
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.grid.line_mut(row).insert_cells(col, n, fill);
    }

    /// Delete n cells at the cursor (DCH)
    pub fn delete_chars(&mut self, n: usize) {
        let fill = self.cursor.style.background_fill();
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.grid.line_mut(row).delete_cells(col, n, fill);
    }

    /// Erase n cells at the cursor in place (ECH)
    pub fn erase_chars(&mut self, n: usize) {
        let fill = self.cursor.style.background_fill();
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.grid.line_mut(row).erase_cells(col, n, fill);
    }

    // --- erasure ---

    /// Erase in display (ED). Modes: 0 = cursor to end, 1 = start to
    /// cursor inclusive, 2 = everything. Mode 3 also clears scrollback
    /// where one exists; this buffer keeps none, so it behaves as 2.
    pub fn erase_in_display(&mut self, mode: u16) {
        let fill = self.cursor.style.background_fill();
        let (row, col) = (self.cursor.row, self.cursor.col);
        match mode {
            0 => self.grid.clear_below(row, col, fill),
            1 => self.grid.clear_above(row, col, fill),
            2 | 3 => self.grid.clear(fill),
            _ => log::debug!("unknown ED mode: {}", mode),
        }
    }

    /// Erase in line (EL). Modes as ED, within the cursor line.
    pub fn erase_in_line(&mut self, mode: u16) {
        let fill = self.cursor.style.background_fill();
        let (row, col) = (self.cursor.row, self.cursor.col);
        let line = self.grid.line_mut(row);
        match mode {
            0 => line.clear_from(col, fill),
            1 => line.clear_to(col, fill),
            2 => line.clear(fill),
            _ => log::debug!("unknown EL mode: {}", mode),
        }
    }

    /// Clear a rectangle, bounds inclusive and clamped
    pub fn clear_rect(&mut self, top: usize, left: usize, bottom: usize, right: usize) {
        let fill = self.cursor.style.background_fill();
        self.grid.clear_rect(top, left, bottom, right, fill);
    }

    // --- saved cursor ---

    /// Save cursor position, style, wrap flag, origin mode, and charsets
    /// (DECSC)
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            row: self.cursor.row,
            col: self.cursor.col,
            style: self.cursor.style,
            pending_wrap: self.cursor.pending_wrap,
            origin_mode: self.origin_mode,
            charsets: self.charsets,
        });
    }

    /// Restore the saved cursor (DECRC). Without a prior save this
    /// resets to the home position with defaults, per DEC.
    pub fn restore_cursor(&mut self) {
        match self.saved_cursor.clone() {
            Some(saved) => {
                self.cursor.row = saved.row.min(self.rows() - 1);
                self.cursor.col = saved.col.min(self.cols() - 1);
                self.cursor.style = saved.style;
                self.cursor.pending_wrap = saved.pending_wrap;
                self.origin_mode = saved.origin_mode;
                self.charsets = saved.charsets;
            }
            None => {
                self.cursor.reset();
                self.origin_mode = false;
                self.charsets.reset();
            }
        }
    }

    // --- region, resize, reset ---

    /// Set the scroll region from 1-based inclusive margins (DECSTBM).
    /// Degenerate margins reset to the full screen. The cursor homes,
    /// honoring origin mode.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let rows = self.rows();
        let top = top.max(1) - 1;
        let bottom = bottom.clamp(1, rows) - 1;
        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.scroll_top = 0;
            self.scroll_bottom = rows - 1;
        }
        self.move_cursor_to(1, 1);
    }

    /// Reset the scroll region to the full screen
    pub fn reset_scroll_region(&mut self) {
        self.scroll_top = 0;
        self.scroll_bottom = self.rows() - 1;
    }

    /// Resize the buffer. Lines pad or truncate on the right, the region
    /// resets to full height, and the cursor clamps into bounds.
    pub fn resize(&mut self, dims: Dimensions) {
        self.grid.resize(dims);
        self.tabs.resize(dims.cols);
        self.scroll_top = 0;
        self.scroll_bottom = dims.rows - 1;
        self.cursor.row = self.cursor.row.min(dims.rows - 1);
        self.cursor.col = self.cursor.col.min(dims.cols - 1);
        self.cursor.pending_wrap = false;
    }

    /// Fill the screen with 'E' (DECALN): margins reset, cursor homes
    pub fn alignment_fill(&mut self) {
        let dims = self.dimensions();
        for row in 0..dims.rows {
            let line = self.grid.line_mut(row);
            for col in 0..dims.cols {
                line.set(col, Cell::with_char('E', Style::default()));
            }
            line.wrapped = false;
        }
        self.scroll_top = 0;
        self.scroll_bottom = dims.rows - 1;
        self.cursor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn buf(cols: usize, rows: usize) -> Buffer {
        Buffer::new(Dimensions::new(cols, rows))
    }

    fn print_str(buffer: &mut Buffer, s: &str) {
        for c in s.chars() {
            buffer.print(c);
        }
    }

    #[test]
    fn test_print_advances_cursor() {
        let mut buffer = buf(80, 24);
        print_str(&mut buffer, "Hi");
        assert_eq!(buffer.cursor.col, 2);
        assert_eq!(buffer.line(0).cell(0).display_char(), 'H');
        assert_eq!(buffer.line(0).cell(1).display_char(), 'i');
    }

    #[test]
    fn test_wrap_is_deferred() {
        let mut buffer = buf(5, 3);
        print_str(&mut buffer, "Hello");
        // Cursor sits on the last column with the wrap pending
        assert_eq!(buffer.cursor.col, 4);
        assert_eq!(buffer.cursor.row, 0);
        assert!(buffer.cursor.pending_wrap);

        buffer.print('!');
        assert_eq!(buffer.cursor.row, 1);
        assert_eq!(buffer.cursor.col, 1);
        assert_eq!(buffer.line(1).cell(0).display_char(), '!');
        assert!(buffer.line(0).wrapped);
    }

    #[test]
    fn test_wrap_arithmetic() {
        let mut buffer = buf(5, 10);
        print_str(&mut buffer, &"x".repeat(12));
        // 12 chars on width 5: rows 0,1 full, 2 on row 2
        assert_eq!(buffer.cursor.row, 2);
        assert_eq!(buffer.cursor.col, 2);
    }

    #[test]
    fn test_no_wrap_when_auto_wrap_off() {
        let mut buffer = buf(5, 3);
        buffer.auto_wrap = false;
        print_str(&mut buffer, "Hello World");
        assert_eq!(buffer.cursor.row, 0);
        assert_eq!(buffer.cursor.col, 4);
        // Last column keeps being overwritten
        assert_eq!(buffer.line(0).cell(4).display_char(), 'd');
    }

    #[test]
    fn test_wide_glyph_pair() {
        let mut buffer = buf(80, 24);
        buffer.print('世');
        assert_eq!(buffer.cursor.col, 2);
        assert_eq!(buffer.line(0).cell(0).display_char(), '世');
        assert!(buffer.line(0).cell(0).is_wide());
        assert!(buffer.line(0).cell(1).is_wide_spacer());
    }

    #[test]
    fn test_two_wide_glyphs() {
        let mut buffer = buf(80, 24);
        buffer.print('世');
        buffer.print('世');
        assert_eq!(buffer.cursor.col, 4);
        assert!(buffer.line(0).cell(0).is_wide());
        assert!(buffer.line(0).cell(1).is_wide_spacer());
        assert!(buffer.line(0).cell(2).is_wide());
        assert!(buffer.line(0).cell(3).is_wide_spacer());
    }

    #[test]
    fn test_wide_glyph_wraps_from_last_column() {
        let mut buffer = buf(4, 3);
        print_str(&mut buffer, "abc");
        buffer.print('世');
        // No straddling: the glyph moved to the next line
        assert_eq!(buffer.line(1).cell(0).display_char(), '世');
        assert!(!buffer.line(0).cell(3).is_wide());
        assert_eq!(buffer.cursor.col, 2);
    }

    #[test]
    fn test_narrow_overwrite_clears_wide_pair() {
        let mut buffer = buf(80, 24);
        buffer.print('世');
        buffer.move_cursor_to(1, 2);
        buffer.print('x');
        assert!(buffer.line(0).cell(0).is_blank());
        assert_eq!(buffer.line(0).cell(1).display_char(), 'x');
    }

    #[test]
    fn test_combining_mark_attaches() {
        let mut buffer = buf(80, 24);
        buffer.print('e');
        buffer.print('\u{0301}');
        assert_eq!(buffer.line(0).cell(0).glyph(), "e\u{0301}");
        assert_eq!(buffer.cursor.col, 1);
    }

    #[test]
    fn test_linefeed_scrolls_at_region_bottom() {
        let mut buffer = buf(10, 3);
        print_str(&mut buffer, "1");
        buffer.carriage_return();
        buffer.linefeed();
        print_str(&mut buffer, "2");
        buffer.carriage_return();
        buffer.linefeed();
        print_str(&mut buffer, "3");
        assert_eq!(buffer.cursor.row, 2);

        buffer.carriage_return();
        buffer.linefeed();
        print_str(&mut buffer, "4");
        assert_eq!(buffer.line(0).text(), "2");
        assert_eq!(buffer.line(1).text(), "3");
        assert_eq!(buffer.line(2).text(), "4");
    }

    #[test]
    fn test_scroll_region_contains_linefeed() {
        let mut buffer = buf(10, 5);
        for (row, c) in ['A', 'B', 'C', 'D', 'E'].iter().enumerate() {
            buffer.move_cursor_to(row + 1, 1);
            buffer.print(*c);
        }
        buffer.set_scroll_region(2, 4);
        buffer.move_cursor_to(4, 1);
        buffer.linefeed();

        assert_eq!(buffer.line(0).text(), "A");
        assert_eq!(buffer.line(1).text(), "C");
        assert_eq!(buffer.line(2).text(), "D");
        assert!(buffer.line(3).is_blank());
        assert_eq!(buffer.line(4).text(), "E");
    }

    #[test]
    fn test_reverse_linefeed_scrolls_at_region_top() {
        let mut buffer = buf(10, 3);
        buffer.print('A');
        buffer.move_cursor_to(1, 1);
        buffer.reverse_linefeed();
        assert!(buffer.line(0).is_blank());
        assert_eq!(buffer.line(1).text(), "A");
    }

    #[test]
    fn test_origin_mode_addressing() {
        let mut buffer = buf(80, 24);
        buffer.set_scroll_region(5, 10);
        buffer.origin_mode = true;
        buffer.move_cursor_to(1, 1);
        assert_eq!(buffer.cursor.row, 4);
        assert_eq!(buffer.cursor.col, 0);

        // Clamped to the region bottom
        buffer.move_cursor_to(99, 1);
        assert_eq!(buffer.cursor.row, 9);
    }

    #[test]
    fn test_relative_moves_stop_at_region_edge() {
        let mut buffer = buf(80, 24);
        buffer.set_scroll_region(5, 10);
        buffer.move_cursor_to(6, 1);
        buffer.move_cursor_up(20);
        assert_eq!(buffer.cursor.row, 4);

        buffer.move_cursor_down(100);
        assert_eq!(buffer.cursor.row, 9);
    }

    #[test]
    fn test_relative_moves_outside_region() {
        let mut buffer = buf(80, 24);
        buffer.set_scroll_region(5, 10);
        buffer.cursor.row = 15;
        buffer.move_cursor_down(100);
        assert_eq!(buffer.cursor.row, 23);
    }

    #[test]
    fn test_tab_stops() {
        let mut buffer = buf(80, 24);
        buffer.print('A');
        buffer.tab_forward(1);
        assert_eq!(buffer.cursor.col, 8);
        buffer.tab_forward(2);
        assert_eq!(buffer.cursor.col, 24);
        buffer.tab_backward(1);
        assert_eq!(buffer.cursor.col, 16);
    }

    #[test]
    fn test_erase_in_line() {
        let mut buffer = buf(10, 3);
        print_str(&mut buffer, "ABCDEFGHIJ");
        buffer.move_cursor_to(1, 5);
        buffer.erase_in_line(0);
        assert_eq!(buffer.line(0).text(), "ABCD");

        buffer.erase_in_line(1);
        assert!(buffer.line(0).is_blank());
    }

    #[test]
    fn test_erase_display_from_cursor() {
        let mut buffer = buf(10, 3);
        for row in 0..3 {
            buffer.move_cursor_to(row + 1, 1);
            print_str(&mut buffer, "XXXXXXXXXX");
        }
        buffer.move_cursor_to(2, 5);
        buffer.erase_in_display(0);

        assert_eq!(buffer.line(0).text(), "XXXXXXXXXX");
        assert_eq!(buffer.line(1).text(), "XXXX");
        assert!(buffer.line(2).is_blank());
    }

    #[test]
    fn test_erase_uses_background_fill() {
        let mut buffer = buf(10, 3);
        buffer.cursor.style.bg = Color::Indexed(4);
        buffer.cursor.style.bold = true;
        buffer.erase_in_display(2);
        let cell = buffer.line(0).cell(0);
        assert_eq!(cell.style.bg, Color::Indexed(4));
        assert!(!cell.style.bold);
    }

    #[test]
    fn test_insert_delete_lines() {
        let mut buffer = buf(10, 5);
        for (row, c) in ['A', 'B', 'C', 'D', 'E'].iter().enumerate() {
            buffer.move_cursor_to(row + 1, 1);
            buffer.print(*c);
        }
        buffer.move_cursor_to(2, 1);
        buffer.insert_lines(2);
        assert_eq!(buffer.line(0).text(), "A");
        assert!(buffer.line(1).is_blank());
        assert!(buffer.line(2).is_blank());
        assert_eq!(buffer.line(3).text(), "B");
        assert_eq!(buffer.line(4).text(), "C");

        buffer.move_cursor_to(2, 1);
        buffer.delete_lines(2);
        assert_eq!(buffer.line(0).text(), "A");
        assert_eq!(buffer.line(1).text(), "B");
        assert_eq!(buffer.line(2).text(), "C");
        assert!(buffer.line(3).is_blank());
    }

    #[test]
    fn test_clear_rect() {
        let mut buffer = buf(6, 4);
        for row in 0..4 {
            buffer.move_cursor_to(row + 1, 1);
            print_str(&mut buffer, "zzzzzz");
        }
        buffer.clear_rect(1, 1, 2, 4);
        assert_eq!(buffer.line(0).text(), "zzzzzz");
        assert_eq!(buffer.line(1).text(), "z    z".trim_end());
        assert_eq!(buffer.line(1).cell(5).display_char(), 'z');
        assert!(buffer.line(2).cell(3).is_blank());
        assert_eq!(buffer.line(3).text(), "zzzzzz");
    }

    #[test]
    fn test_insert_lines_outside_region_ignored() {
        let mut buffer = buf(10, 5);
        buffer.set_scroll_region(2, 4);
        buffer.move_cursor_to(1, 1);
        buffer.print('A');
        buffer.cursor.row = 0;
        buffer.cursor.col = 0;
        buffer.insert_lines(1);
        assert_eq!(buffer.line(0).text(), "A");
    }

    #[test]
    fn test_save_restore_cursor_round_trip() {
        let mut buffer = buf(80, 24);
        buffer.move_cursor_to(10, 20);
        buffer.cursor.style.bold = true;
        buffer.origin_mode = true;
        buffer.charsets.designate(0, '0');
        buffer.save_cursor();

        buffer.move_cursor_to(1, 1);
        buffer.cursor.style.reset();
        buffer.origin_mode = false;
        buffer.charsets.reset();

        buffer.restore_cursor();
        assert_eq!(buffer.cursor.row, 9);
        assert_eq!(buffer.cursor.col, 19);
        assert!(buffer.cursor.style.bold);
        assert!(buffer.origin_mode);
        assert_eq!(buffer.charsets.translate('q'), '─');
    }

    #[test]
    fn test_restore_without_save_resets() {
        let mut buffer = buf(80, 24);
        buffer.move_cursor_to(10, 20);
        buffer.cursor.style.bold = true;
        buffer.restore_cursor();
        assert_eq!(buffer.cursor.row, 0);
        assert_eq!(buffer.cursor.col, 0);
        assert!(!buffer.cursor.style.bold);
    }

    #[test]
    fn test_degenerate_scroll_region_resets() {
        let mut buffer = buf(80, 24);
        buffer.set_scroll_region(10, 5);
        assert_eq!(buffer.scroll_region(), (0, 23));
    }

    #[test]
    fn test_resize_clamps_cursor() {
        let mut buffer = buf(80, 24);
        buffer.move_cursor_to(24, 80);
        buffer.resize(Dimensions::new(40, 10));
        assert_eq!(buffer.cursor.row, 9);
        assert_eq!(buffer.cursor.col, 39);
        assert_eq!(buffer.scroll_region(), (0, 9));
    }

    #[test]
    fn test_resize_preserves_content() {
        let mut buffer = buf(10, 3);
        print_str(&mut buffer, "Hello");
        buffer.resize(Dimensions::new(20, 5));
        assert_eq!(buffer.line(0).text(), "Hello");
    }

    #[test]
    fn test_alignment_fill() {
        let mut buffer = buf(4, 2);
        buffer.set_scroll_region(1, 2);
        buffer.alignment_fill();
        assert_eq!(buffer.line(0).text(), "EEEE");
        assert_eq!(buffer.line(1).text(), "EEEE");
        assert_eq!(buffer.cursor.row, 0);
        assert_eq!(buffer.cursor.col, 0);
    }

    #[test]
    fn test_charset_translation_at_print() {
        let mut buffer = buf(10, 2);
        buffer.charsets.designate(0, '0');
        buffer.print('q');
        assert_eq!(buffer.line(0).cell(0).display_char(), '─');
    }

    #[test]
    fn test_insert_mode_shifts() {
        let mut buffer = buf(10, 2);
        print_str(&mut buffer, "ABC");
        buffer.move_cursor_to(1, 1);
        buffer.insert_mode = true;
        buffer.print('X');
        assert_eq!(buffer.line(0).text(), "XABC");
    }
}
