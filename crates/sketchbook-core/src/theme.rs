//! Colour themes.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Foreground colour used by the sketches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Cyan,
    Green,
    White,
    Magenta,
    Yellow,
    Red,
    Blue,
}

impl ColorTheme {
    /// Cycle to the next color theme.
    pub fn next(self) -> Self {
        match self {
            ColorTheme::Cyan => ColorTheme::Green,
            ColorTheme::Green => ColorTheme::Magenta,
            ColorTheme::Magenta => ColorTheme::Yellow,
            ColorTheme::Yellow => ColorTheme::Red,
            ColorTheme::Red => ColorTheme::Blue,
            ColorTheme::Blue => ColorTheme::White,
            ColorTheme::White => ColorTheme::Cyan,
        }
    }

    /// Convert theme to Ratatui Color.
    pub fn color(self) -> Color {
        match self {
            ColorTheme::Cyan => Color::Cyan,
            ColorTheme::Green => Color::Green,
            ColorTheme::White => Color::White,
            ColorTheme::Magenta => Color::Magenta,
            ColorTheme::Yellow => Color::Yellow,
            ColorTheme::Red => Color::Red,
            ColorTheme::Blue => Color::Blue,
        }
    }

    /// Base hue in degrees, for sketches that shade their own colours.
    pub fn hue(self) -> f32 {
        match self {
            ColorTheme::Cyan => 185.0,
            ColorTheme::Green => 120.0,
            ColorTheme::White => 220.0,
            ColorTheme::Magenta => 300.0,
            ColorTheme::Yellow => 55.0,
            ColorTheme::Red => 0.0,
            ColorTheme::Blue => 230.0,
        }
    }

    /// Whether shaded colours should be desaturated.
    pub fn is_neutral(self) -> bool {
        self == ColorTheme::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_theme() {
        let mut theme = ColorTheme::default();
        let mut seen = vec![theme];
        loop {
            theme = theme.next();
            if theme == ColorTheme::default() {
                break;
            }
            seen.push(theme);
        }
        assert_eq!(seen.len(), 7);
    }
}
