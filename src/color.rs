//! 8-bit RGB samples and hex encoding.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;

/// A single RGB color sample with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` encoding.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Squared Euclidean distance in RGB space.
    #[inline(always)]
    pub fn distance_squared(&self, other: &Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Channels normalized to [0, 1] for HSV math.
    pub fn to_srgb(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format::<f32>()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Accepts `#rrggbb`, `rrggbb`, `#rgb` and `rgb` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_start_matches('#')
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(ParseColorError::InvalidCharacter(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        match digits[..] {
            [r1, r0, g1, g0, b1, b0] => Ok(Rgb::new(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            [r, g, b] => Ok(Rgb::new(r * 17, g * 17, b * 17)),
            _ => Err(ParseColorError::InvalidLength(digits.len())),
        }
    }
}

/// Parse a hex color string, see [`Rgb::from_str`].
pub fn parse_hex(s: &str) -> Result<Rgb, ParseColorError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(255, 0, 10).hex(), "#ff000a");
        assert_eq!(Rgb::new(0, 0, 0).to_string(), "#000000");
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex("#FF8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(parse_hex("ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(parse_hex("#fff").unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(parse_hex(" #0a0 ").unwrap(), Rgb::new(0, 170, 0));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(parse_hex("#12345"), Err(ParseColorError::InvalidLength(5)));
        assert_eq!(parse_hex("#zzzzzz"), Err(ParseColorError::InvalidCharacter('z')));
        assert_eq!(parse_hex("+fffff"), Err(ParseColorError::InvalidCharacter('+')));
        assert!(matches!(parse_hex(""), Err(ParseColorError::InvalidLength(0))));
        assert_eq!(parse_hex("aéaaa"), Err(ParseColorError::InvalidCharacter('é')));
    }

    #[test]
    fn test_distance_squared() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(3, 4, 0);
        assert_eq!(a.distance_squared(&b), 25);
        assert_eq!(b.distance_squared(&a), 25);
        assert_eq!(Rgb::new(255, 255, 255).distance_squared(&a), 3 * 255 * 255);
    }
}
