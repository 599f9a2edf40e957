//! Terminal grid - the visible screen area
//!
//! The grid is a 2D array of cells. Scrolling and line insertion/deletion
//! rotate whole lines; the vacated lines are filled with the style the
//! caller passes (background color erase).

use serde::{Deserialize, Serialize};

use crate::line::Line;
use crate::style::Style;
use crate::Dimensions;

/// The terminal grid (visible screen area)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Lines in the grid (row 0 is top)
    lines: Vec<Line>,
    cols: usize,
    rows: usize,
}

impl Grid {
    /// Create a new grid with the specified dimensions
    pub fn new(dims: Dimensions) -> Self {
        let lines = (0..dims.rows).map(|_| Line::new(dims.cols)).collect();
        Self {
            lines,
            cols: dims.cols,
            rows: dims.rows,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            cols: self.cols,
            rows: self.rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get a reference to a line
    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    /// Get a mutable reference to a line
    pub fn line_mut(&mut self, row: usize) -> &mut Line {
        &mut self.lines[row]
    }

    /// Clear the entire grid
    pub fn clear(&mut self, style: Style) {
        for line in &mut self.lines {
            line.clear(style);
        }
    }

    /// Clear from (row, col) to the end of the screen
    pub fn clear_below(&mut self, row: usize, col: usize, style: Style) {
        if row >= self.rows {
            return;
        }
        self.lines[row].clear_from(col, style);
        for line in self.lines.iter_mut().skip(row + 1) {
            line.clear(style);
        }
    }

    /// Clear from the start of the screen to (row, col) inclusive
    pub fn clear_above(&mut self, row: usize, col: usize, style: Style) {
        if row >= self.rows {
            return;
        }
        for line in self.lines.iter_mut().take(row) {
            line.clear(style);
        }
        self.lines[row].clear_to(col, style);
    }

    /// Clear a rectangular region, all bounds inclusive and clamped
    pub fn clear_rect(
        &mut self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        style: Style,
    ) {
        let bottom = bottom.min(self.rows.saturating_sub(1));
        let right = right.min(self.cols.saturating_sub(1));
        if top > bottom || left > right {
            return;
        }
        for row in top..=bottom {
            self.lines[row].erase_cells(left, right - left + 1, style);
        }
    }

    /// Scroll lines up within the inclusive region `top..=bottom`,
    /// filling vacated lines at the bottom with blanks
    pub fn scroll_up(&mut self, top: usize, bottom: usize, n: usize, style: Style) {
        if top >= self.rows || bottom >= self.rows || top > bottom {
            return;
        }
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.lines.remove(top);
            self.lines.insert(bottom, Line::with_style(self.cols, style));
        }
    }

    /// Scroll lines down within the inclusive region `top..=bottom`,
    /// filling vacated lines at the top with blanks
    pub fn scroll_down(&mut self, top: usize, bottom: usize, n: usize, style: Style) {
        if top >= self.rows || bottom >= self.rows || top > bottom {
            return;
        }
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.lines.remove(bottom);
            self.lines.insert(top, Line::with_style(self.cols, style));
        }
    }

    /// Insert n blank lines at `row`, pushing lines down to `bottom`
    pub fn insert_lines(&mut self, row: usize, n: usize, bottom: usize, style: Style) {
        self.scroll_down(row, bottom, n, style);
    }

    /// Delete n lines at `row`, pulling lines up from `bottom`
    pub fn delete_lines(&mut self, row: usize, n: usize, bottom: usize, style: Style) {
        self.scroll_up(row, bottom, n, style);
    }

    /// Resize the grid: lines pad or truncate on the right, rows are
    /// added blank at the bottom or removed from the bottom
    pub fn resize(&mut self, dims: Dimensions) {
        for line in &mut self.lines {
            line.resize(dims.cols);
        }
        if dims.rows > self.rows {
            self.lines.resize_with(dims.rows, || Line::new(dims.cols));
        } else {
            self.lines.truncate(dims.rows);
        }
        self.cols = dims.cols;
        self.rows = dims.rows;
    }

    /// Iterator over lines, top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}
