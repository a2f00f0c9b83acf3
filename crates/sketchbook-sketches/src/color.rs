//! Color utility functions for the sketches.

use ratatui::style::Color;
use sketchbook_core::ColorTheme;

/// Shade of the theme colour at the given lightness (0.0-1.0).
pub fn theme_shade(theme: ColorTheme, lightness: f32) -> Color {
    let saturation = if theme.is_neutral() { 0.0 } else { 0.7 };
    hsl_to_rgb(theme.hue(), saturation, lightness.clamp(0.0, 1.0))
}

/// Terminal colour for an RGB pixel.
pub fn pixel_color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Convert HSL to RGB color.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let [r, g, b] = hsl_to_rgb8(h, s, l);
    Color::Rgb(r, g, b)
}

/// Convert HSL to raw RGB bytes. Hue is in degrees and wraps.
pub fn hsl_to_rgb8(h: f32, s: f32, l: f32) -> [u8; 3] {
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return [v, v, v];
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsl_to_rgb8(0.0, 1.0, 0.5), [255, 0, 0]);
        assert_eq!(hsl_to_rgb8(120.0, 1.0, 0.5), [0, 255, 0]);
        assert_eq!(hsl_to_rgb8(240.0, 1.0, 0.5), [0, 0, 255]);
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(hsl_to_rgb8(360.0 + 120.0, 1.0, 0.5), hsl_to_rgb8(120.0, 1.0, 0.5));
        assert_eq!(hsl_to_rgb8(-240.0, 1.0, 0.5), hsl_to_rgb8(120.0, 1.0, 0.5));
    }

    #[test]
    fn neutral_theme_is_grey() {
        let Color::Rgb(r, g, b) = theme_shade(ColorTheme::White, 0.6) else {
            panic!("expected rgb");
        };
        assert_eq!((r, g), (g, b));
    }
}
