//! Cell style: colors and rendition attributes
//!
//! A `Style` is the state SGR sequences mutate; every printed cell copies
//! the style active at the time it was written.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Underline style variants (SGR 4:x subparameters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

/// Attributes that affect how a cell is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Underline color (SGR 58); `Default` means "same as foreground"
    pub underline_color: Color,
    /// Bold text (SGR 1)
    pub bold: bool,
    /// Faint/dim text (SGR 2)
    pub dim: bool,
    /// Italic text (SGR 3)
    pub italic: bool,
    /// Underline and its variant (SGR 4, 4:x, 21)
    pub underline: UnderlineStyle,
    /// Blinking text (SGR 5)
    pub blink: bool,
    /// Inverse/reverse video (SGR 7)
    pub inverse: bool,
    /// Hidden/invisible text (SGR 8)
    pub hidden: bool,
    /// Strikethrough text (SGR 9)
    pub strike: bool,
    /// Overlined text (SGR 53)
    pub overline: bool,
}

impl Style {
    /// Create new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all attributes to default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether any underline variant is active
    pub fn is_underlined(&self) -> bool {
        self.underline != UnderlineStyle::None
    }

    /// Style used to fill cells vacated by scrolling or erasure: keeps
    /// only the background color, per the VT "background color erase" rule.
    pub fn background_fill(&self) -> Style {
        Style {
            bg: self.bg,
            ..Style::default()
        }
    }

    /// Get effective foreground color (accounting for inverse)
    pub fn effective_fg(&self) -> Color {
        if self.inverse {
            self.bg
        } else {
            self.fg
        }
    }

    /// Get effective background color (accounting for inverse)
    pub fn effective_bg(&self) -> Color {
        if self.inverse {
            self.fg
        } else {
            self.bg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = Style::new();
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert!(!style.bold);
        assert!(!style.is_underlined());
    }

    #[test]
    fn test_style_reset() {
        let mut style = Style::new();
        style.bold = true;
        style.italic = true;
        style.fg = Color::Indexed(1);

        style.reset();

        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_style_inverse() {
        let mut style = Style::new();
        style.fg = Color::Indexed(1);
        style.bg = Color::Indexed(0);
        style.inverse = true;

        assert_eq!(style.effective_fg(), Color::Indexed(0));
        assert_eq!(style.effective_bg(), Color::Indexed(1));
    }

    #[test]
    fn test_background_fill() {
        let mut style = Style::new();
        style.bold = true;
        style.fg = Color::Indexed(3);
        style.bg = Color::Indexed(4);

        let fill = style.background_fill();
        assert_eq!(fill.bg, Color::Indexed(4));
        assert_eq!(fill.fg, Color::Default);
        assert!(!fill.bold);
    }
}
