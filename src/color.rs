use ratatui::style::Color;
use serde::{Deserialize, Serialize};

const LUT_SIZE: usize = 256;

/// Precomputed gradient, indexed by a 0..1 scalar per particle.
pub struct ColorLut {
    entries: Vec<(u8, u8, u8)>,
}

/// Gradient palette applied to the whole particle population
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Full hue wheel; with the Hue color mode this reproduces the
    /// original canvas look
    #[default]
    Rainbow,
    Fire,
    Ocean,
    Aurora,
    Mono,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Rainbow => "Rainbow",
            ColorScheme::Fire => "Fire",
            ColorScheme::Ocean => "Ocean",
            ColorScheme::Aurora => "Aurora",
            ColorScheme::Mono => "Mono",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Rainbow => ColorScheme::Fire,
            ColorScheme::Fire => ColorScheme::Ocean,
            ColorScheme::Ocean => ColorScheme::Aurora,
            ColorScheme::Aurora => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Rainbow,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorScheme::Rainbow => ColorScheme::Mono,
            ColorScheme::Fire => ColorScheme::Rainbow,
            ColorScheme::Ocean => ColorScheme::Fire,
            ColorScheme::Aurora => ColorScheme::Ocean,
            ColorScheme::Mono => ColorScheme::Aurora,
        }
    }

    pub fn build_lut(&self) -> ColorLut {
        let entries = (0..LUT_SIZE)
            .map(|i| {
                let t = i as f32 / (LUT_SIZE - 1) as f32;
                self.sample(t)
            })
            .collect();
        ColorLut { entries }
    }

    fn sample(&self, t: f32) -> (u8, u8, u8) {
        match self {
            ColorScheme::Rainbow => hsv_to_rgb(t * 360.0, 0.8, 1.0),
            ColorScheme::Fire => {
                // Black body ramp: red in, then green, then blue.
                let r = (t * 3.0).min(1.0);
                let g = (t * 3.0 - 1.0).clamp(0.0, 1.0);
                let b = (t * 3.0 - 2.0).clamp(0.0, 1.0);
                to_rgb8(r, g, b)
            }
            ColorScheme::Ocean => to_rgb8(0.1 * t, 0.3 + 0.6 * t, 0.5 + 0.5 * t),
            ColorScheme::Aurora => hsv_to_rgb(100.0 + t * 180.0, 0.7, 0.9),
            ColorScheme::Mono => to_rgb8(0.2 + 0.8 * t, 0.2 + 0.8 * t, 0.2 + 0.8 * t),
        }
    }
}

/// Look up a 0..1 scalar in the gradient; out-of-range values clamp.
pub fn map_from_lut(lut: &ColorLut, t: f32) -> Color {
    let idx = (t.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f32) as usize;
    let (r, g, b) = lut.entries[idx.min(LUT_SIZE - 1)];
    Color::Rgb(r, g, b)
}

/// Raw channel access for the frame exporter.
pub fn rgb_from_lut(lut: &ColorLut, t: f32) -> (u8, u8, u8) {
    let idx = (t.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f32) as usize;
    lut.entries[idx.min(LUT_SIZE - 1)]
}

/// Scale an RGB color toward black; trail segments get dimmer with age.
pub fn fade(color: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * alpha) as u8,
            (g as f32 * alpha) as u8,
            (b as f32 * alpha) as u8,
        ),
        other => other,
    }
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    to_rgb8(r + m, g + m, b + m)
}

fn to_rgb8(r: f32, g: f32, b: f32) -> (u8, u8, u8) {
    (
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_covers_the_full_range() {
        for scheme in [
            ColorScheme::Rainbow,
            ColorScheme::Fire,
            ColorScheme::Ocean,
            ColorScheme::Aurora,
            ColorScheme::Mono,
        ] {
            let lut = scheme.build_lut();
            assert_eq!(lut.entries.len(), LUT_SIZE);
        }
    }

    #[test]
    fn out_of_range_lookups_clamp() {
        let lut = ColorScheme::Mono.build_lut();
        assert_eq!(map_from_lut(&lut, -1.0), map_from_lut(&lut, 0.0));
        assert_eq!(map_from_lut(&lut, 2.0), map_from_lut(&lut, 1.0));
    }

    #[test]
    fn fade_to_zero_is_black() {
        assert_eq!(fade(Color::Rgb(200, 100, 50), 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(fade(Color::Rgb(200, 100, 50), 1.0), Color::Rgb(200, 100, 50));
    }

    #[test]
    fn hue_zero_is_red() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert_eq!((r, g, b), (255, 0, 0));
    }
}
