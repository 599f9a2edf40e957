//! Tab stop tracking
//!
//! Default stops sit every 8 columns. HTS adds a stop at the cursor,
//! TBC removes one or all.

/// The set of tab stop columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStops {
    stops: Vec<bool>,
}

const TAB_INTERVAL: usize = 8;

impl TabStops {
    /// Create tab stops for the given width, with defaults every 8 columns
    pub fn new(cols: usize) -> Self {
        let stops = (0..cols).map(|c| c % TAB_INTERVAL == 0).collect();
        Self { stops }
    }

    /// Set a stop at a column
    pub fn set(&mut self, col: usize) {
        if let Some(stop) = self.stops.get_mut(col) {
            *stop = true;
        }
    }

    /// Clear the stop at a column
    pub fn clear(&mut self, col: usize) {
        if let Some(stop) = self.stops.get_mut(col) {
            *stop = false;
        }
    }

    /// Clear every stop
    pub fn clear_all(&mut self) {
        for stop in &mut self.stops {
            *stop = false;
        }
    }

    /// Column of the nth next stop after `col`, or the last column
    pub fn forward(&self, col: usize, n: usize) -> usize {
        let last = self.stops.len().saturating_sub(1);
        let mut col = col;
        for _ in 0..n.max(1) {
            col = match (col + 1..self.stops.len()).find(|&c| self.stops[c]) {
                Some(c) => c,
                None => return last,
            };
        }
        col
    }

    /// Column of the nth previous stop before `col`, or column 0
    pub fn backward(&self, col: usize, n: usize) -> usize {
        let mut col = col;
        for _ in 0..n.max(1) {
            col = match (0..col.min(self.stops.len())).rev().find(|&c| self.stops[c]) {
                Some(c) => c,
                None => return 0,
            };
        }
        col
    }

    /// Resize, keeping surviving stops and defaulting new columns
    pub fn resize(&mut self, cols: usize) {
        let old = self.stops.len();
        if cols > old {
            self.stops.extend((old..cols).map(|c| c % TAB_INTERVAL == 0));
        } else {
            self.stops.truncate(cols);
        }
    }
}
