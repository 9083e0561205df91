use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;

/// Opaque sRGB color with straight components in `[0, 1]`.
///
/// Colors are stored the way a color picker reports them (gamma-encoded).
/// Shaders expect linear values; use [`Color::to_linear`] when uploading.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if digits.len() != 6 {
            return Err(ColorParseError::new("expected six hex digits", s));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::new("non-hex digit", s));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| ColorParseError::new(e.to_string(), s))
        };

        Ok(Self::from_srgb_u8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_srgb_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    #[inline]
    pub fn to_srgb_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Linear-light RGB for GPU upload.
    pub fn to_linear(self) -> [f32; 3] {
        [srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b)]
    }

    /// Returns this color with its hue rotated by `degrees` in HSL space.
    ///
    /// Saturation and lightness are preserved; grays are returned unchanged.
    pub fn rotate_hue(self, degrees: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        if s <= 0.0 {
            return self;
        }
        Self::from_hsl((h + degrees / 360.0).rem_euclid(1.0), s, l)
    }

    /// `(hue, saturation, lightness)`, each in `[0, 1]`.
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) * 0.5;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };

        (h / 6.0, s, l)
    }

    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s <= 0.0 {
            return Self::new(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hex ───────────────────────────────────────────────────────────────

    #[test]
    fn parses_default_material_color() {
        let c = Color::from_hex("#009999").unwrap();
        assert_eq!(c.to_srgb_u8(), [0x00, 0x99, 0x99]);
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(Color::from_hex("ff8000").unwrap(), Color::from_hex("#ff8000").unwrap());
    }

    #[test]
    fn hex_output_is_lowercase() {
        assert_eq!(Color::from_srgb_u8(0xAB, 0xCD, 0xEF).to_hex(), "#abcdef");
    }

    #[test]
    fn rejects_short_input() {
        let err = Color::from_hex("#fff").unwrap_err();
        assert_eq!(err.input, "#fff");
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(Color::from_hex("#00zz99").is_err());
    }

    #[test]
    fn from_str_matches_from_hex() {
        let c: Color = "#123456".parse().unwrap();
        assert_eq!(c.to_hex(), "#123456");
    }

    // ── linear ────────────────────────────────────────────────────────────

    #[test]
    fn linear_endpoints_are_preserved() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let [r, g, b] = Color::WHITE.to_linear();
        assert!((r - 1.0).abs() < 1e-6 && (g - 1.0).abs() < 1e-6 && (b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn linear_mid_gray_is_darker() {
        let [r, _, _] = Color::new(0.5, 0.5, 0.5).to_linear();
        assert!(r < 0.25 && r > 0.2);
    }

    // ── hue ───────────────────────────────────────────────────────────────

    #[test]
    fn hue_rotation_by_full_turn_is_identity() {
        let c = Color::from_hex("#009999").unwrap();
        assert_eq!(c.rotate_hue(360.0).to_hex(), "#009999");
    }

    #[test]
    fn hue_rotation_red_to_green() {
        let red = Color::new(1.0, 0.0, 0.0);
        assert_eq!(red.rotate_hue(120.0).to_hex(), "#00ff00");
        assert_eq!(red.rotate_hue(-120.0).to_hex(), "#0000ff");
    }

    #[test]
    fn hue_rotation_leaves_gray_alone() {
        let gray = Color::new(0.4, 0.4, 0.4);
        assert_eq!(gray.rotate_hue(90.0), gray);
    }

    #[test]
    fn hsl_round_trip() {
        let c = Color::from_hex("#6a4c93").unwrap();
        let (h, s, l) = c.to_hsl();
        assert_eq!(Color::from_hsl(h, s, l).to_hex(), "#6a4c93");
    }
}
