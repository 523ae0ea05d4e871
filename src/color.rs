//! Color values shared by every layer of the globe.
//!
//! Configuration writes colors as `#rrggbb` strings; internally they are
//! kept as 8-bit sRGB triples and converted to straight-alpha `Rgba`
//! once an opacity is known.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Color must have 3 or 6 hex digits: {0}")]
    InvalidLength(String),
    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// Clamps an opacity or intensity into [0, 1]; NaN becomes 0.
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Linear interpolation in sRGB space, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 3];
        for i in 0..3 {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            out[i] = (a + (b - a) * t).round() as u8;
        }
        Rgb(out)
    }

    /// Attaches an opacity, clamped to [0, 1].
    pub fn with_opacity(self, opacity: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: opacity.clamp(0.0, 1.0),
        }
    }

    /// Channels as floats in [0, 1].
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ColorParseError::InvalidDigit(s.to_string()))?;

        match digits.len() {
            3 => Ok(Rgb([digits[0] * 17, digits[1] * 17, digits[2] * 17])),
            6 => Ok(Rgb([
                digits[0] * 16 + digits[1],
                digits[2] * 16 + digits[3],
                digits[4] * 16 + digits[5],
            ])),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// A color with straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        rgb: Rgb::BLACK,
        alpha: 0.0,
    };

    /// Converts to an `image` pixel.
    pub fn to_pixel(self) -> image::Rgba<u8> {
        let [r, g, b] = self.rgb.0;
        image::Rgba([r, g, b, (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
    }
}
