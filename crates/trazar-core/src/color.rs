//! RGBA color representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with components in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

/// Error parsing a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Not 6 or 8 hex digits
    #[error("hex color must have 6 or 8 digits")]
    InvalidLength,
    /// Contains a non-hex character
    #[error("invalid hex digit")]
    InvalidHex,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create a new color, clamping components to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB components.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse a hex color string (e.g., `"#ff0000"` or `"ff0000cc"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid 6- or 8-digit hex
    /// color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError::InvalidHex)
        };
        match hex.len() {
            6 => Ok(Self::rgb(
                f32::from(byte(0..2)?) / 255.0,
                f32::from(byte(2..4)?) / 255.0,
                f32::from(byte(4..6)?) / 255.0,
            )),
            8 => Ok(Self::new(
                f32::from(byte(0..2)?) / 255.0,
                f32::from(byte(2..4)?) / 255.0,
                f32::from(byte(4..6)?) / 255.0,
                f32::from(byte(6..8)?) / 255.0,
            )),
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Same color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Pack into an RGBA byte quad for raster buffers.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let c = Color::new(1.5, -0.5, 0.5, 2.0);
        assert_eq!(c, Color::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_from_hex_rgb() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 0.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_from_hex_rgba() {
        let c = Color::from_hex("00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_hex_errors() {
        assert_eq!(
            Color::from_hex("#fff"),
            Err(ColorParseError::InvalidLength)
        );
        assert_eq!(Color::from_hex("zzzzzz"), Err(ColorParseError::InvalidHex));
    }

    #[test]
    fn test_to_rgba8() {
        assert_eq!(Color::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_with_alpha() {
        let c = Color::rgb(0.2, 0.4, 0.6).with_alpha(0.3);
        assert!((c.a - 0.3).abs() < 1e-6);
        assert!((c.r - 0.2).abs() < 1e-6);
    }
}
