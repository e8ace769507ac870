//! RGB colors and the interpolation used by every cosmetic effect
//!
//! Colors are configured as hex strings (`#rgb` or `#rrggbb`, `#` optional)
//! and rendered back as lowercase `#rrggbb`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color code
    pub fn parse(code: &str) -> SimResult<Self> {
        let digits = code.strip_prefix('#').unwrap_or(code);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SimError::InvalidColor(code.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| SimError::InvalidColor(code.to_string()))
        };

        match digits.len() {
            3 => {
                // CSS shorthand: each digit is doubled
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let nibble = c.to_digit(16).unwrap_or(0) as u8;
                    *slot = nibble << 4 | nibble;
                }
                Ok(Self::new(out[0], out[1], out[2]))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(SimError::InvalidColor(code.to_string())),
        }
    }

    /// Linear interpolation toward `to`, `progress` clamped to [0, 1]
    ///
    /// Each channel moves by `round((to - from) * progress)` with halves
    /// rounded up, so progress 0 yields `self` and progress 1 yields `to`.
    pub fn lerp(self, to: Rgb, progress: f64) -> Rgb {
        let n = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let mix = |from: u8, to: u8| -> u8 {
            let delta = (to as f64 - from as f64) * n;
            let value = (delta + 0.5).floor() + from as f64;
            value.clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }

    /// Normalized RGBA for renderers
    pub fn to_rgba_f32(self, alpha: f64) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha.clamp(0.0, 1.0) as f32,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLUE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// True if `code` is a 3 or 6 digit hex color, with or without `#`
pub fn is_valid_hex(code: &str) -> bool {
    Rgb::parse(code).is_ok()
}

/// Color at `index` inside the frame window `[start, end]`
///
/// Progress is `(index - start) / (end - start)`; an empty window is
/// treated as already complete.
pub fn interpolate(index: u64, from: Rgb, to: Rgb, start: u64, end: u64) -> Rgb {
    if end <= start {
        return to;
    }
    let progress = (index as f64 - start as f64) / (end - start) as f64;
    from.lerp(to, progress)
}
