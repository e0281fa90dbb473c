//! Semantic color naming.
//!
//! Every palette entry and every search query goes through the same
//! [`ThresholdProfile`], so a material found by "green" is one whose palette
//! was labelled green at extraction time.

use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsv};
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Rgb;

/// The fixed set of human color words a palette entry can carry.
///
/// Serialized lowercase; read back through [`FromStr`], so stored names in
/// any case load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Black,
    Gray,
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Brown,
}

impl ColorName {
    pub const ALL: [ColorName; 11] = [
        ColorName::Black,
        ColorName::Gray,
        ColorName::White,
        ColorName::Red,
        ColorName::Orange,
        ColorName::Yellow,
        ColorName::Green,
        ColorName::Blue,
        ColorName::Purple,
        ColorName::Pink,
        ColorName::Brown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Black => "black",
            ColorName::Gray => "gray",
            ColorName::White => "white",
            ColorName::Red => "red",
            ColorName::Orange => "orange",
            ColorName::Yellow => "yellow",
            ColorName::Green => "green",
            ColorName::Blue => "blue",
            ColorName::Purple => "purple",
            ColorName::Pink => "pink",
            ColorName::Brown => "brown",
        }
    }

    /// Reference swatch shown for every palette entry carrying this name.
    ///
    /// Each swatch classifies back to its own name under [`ThresholdProfile::Hsv`].
    pub const fn swatch(&self) -> Rgb {
        match self {
            ColorName::Black => Rgb::new(0, 0, 0),
            ColorName::Gray => Rgb::new(128, 128, 128),
            ColorName::White => Rgb::new(255, 255, 255),
            ColorName::Red => Rgb::new(255, 0, 0),
            ColorName::Orange => Rgb::new(255, 165, 0),
            ColorName::Yellow => Rgb::new(255, 255, 0),
            ColorName::Green => Rgb::new(0, 128, 0),
            ColorName::Blue => Rgb::new(0, 0, 255),
            ColorName::Purple => Rgb::new(138, 43, 226),
            ColorName::Pink => Rgb::new(255, 105, 180),
            ColorName::Brown => Rgb::new(139, 69, 19),
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a color word outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color name: {0:?}")]
pub struct UnknownColorName(pub String);

impl FromStr for ColorName {
    type Err = UnknownColorName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ColorName::ALL
            .into_iter()
            .find(|name| name.as_str() == lower)
            .ok_or_else(|| UnknownColorName(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ColorName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Threshold rule set used to name a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdProfile {
    /// HSV rules with a brown override for dark, saturated reds and oranges.
    #[default]
    Hsv,
    /// Older lightness-based rules: grayscale by channel spread, no brown.
    Lightness,
}

// HSV profile thresholds (value and saturation on a 0-1 scale)
const BLACK_MAX_VALUE: f32 = 0.18;
const GRAY_MAX_SATURATION: f32 = 0.12;
const WHITE_MIN_VALUE: f32 = 0.9;
const BROWN_MAX_VALUE: f32 = 0.55;
const BROWN_MIN_SATURATION: f32 = 0.25;

// Lightness profile thresholds (0-255 scale)
const GRAYSCALE_MAX_SPREAD: u8 = 30;
const BLACK_MAX_LIGHTNESS: f32 = 50.0;
const GRAY_MAX_LIGHTNESS: f32 = 190.0;

impl ThresholdProfile {
    pub fn classify(&self, rgb: Rgb) -> ColorName {
        match self {
            ThresholdProfile::Hsv => classify_hsv(rgb),
            ThresholdProfile::Lightness => classify_lightness(rgb),
        }
    }
}

/// Name a color with the default [`ThresholdProfile::Hsv`] rules.
pub fn classify(rgb: Rgb) -> ColorName {
    ThresholdProfile::Hsv.classify(rgb)
}

fn classify_hsv(rgb: Rgb) -> ColorName {
    let hsv: Hsv = Hsv::from_color(rgb.to_srgb());
    let (saturation, value) = (hsv.saturation, hsv.value);

    if value < BLACK_MAX_VALUE {
        return ColorName::Black;
    }
    if saturation < GRAY_MAX_SATURATION {
        return if value > WHITE_MIN_VALUE {
            ColorName::White
        } else {
            ColorName::Gray
        };
    }

    let name = match hsv.hue.into_positive_degrees() {
        h if h < 15.0 => ColorName::Red,
        h if h < 45.0 => ColorName::Orange,
        h if h < 65.0 => ColorName::Yellow,
        h if h < 165.0 => ColorName::Green,
        h if h < 255.0 => ColorName::Blue,
        h if h < 300.0 => ColorName::Purple,
        h if h < 345.0 => ColorName::Pink,
        _ => ColorName::Red,
    };

    match name {
        ColorName::Red | ColorName::Orange
            if value < BROWN_MAX_VALUE && saturation > BROWN_MIN_SATURATION =>
        {
            ColorName::Brown
        }
        other => other,
    }
}

fn classify_lightness(rgb: Rgb) -> ColorName {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let lightness = (max as f32 + min as f32) / 2.0;

    if max - min < GRAYSCALE_MAX_SPREAD {
        return if lightness < BLACK_MAX_LIGHTNESS {
            ColorName::Black
        } else if lightness < GRAY_MAX_LIGHTNESS {
            ColorName::Gray
        } else {
            ColorName::White
        };
    }

    let hsv: Hsv = Hsv::from_color(rgb.to_srgb());
    let hue = hsv.hue.into_positive_degrees();
    match hue {
        h if h < 15.0 || h >= 345.0 => ColorName::Red,
        h if h < 45.0 => ColorName::Orange,
        h if h < 75.0 => ColorName::Yellow,
        h if h < 165.0 => ColorName::Green,
        h if h < 255.0 => ColorName::Blue,
        h if h < 300.0 => ColorName::Purple,
        _ => ColorName::Pink,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_colors() {
        assert_eq!(classify(Rgb::new(0, 0, 0)), ColorName::Black);
        assert_eq!(classify(Rgb::new(255, 255, 255)), ColorName::White);
        assert_eq!(classify(Rgb::new(255, 0, 0)), ColorName::Red);
    }

    #[test]
    fn test_hue_buckets() {
        assert_eq!(classify(Rgb::new(255, 128, 0)), ColorName::Orange);
        assert_eq!(classify(Rgb::new(255, 230, 0)), ColorName::Yellow);
        assert_eq!(classify(Rgb::new(40, 200, 60)), ColorName::Green);
        assert_eq!(classify(Rgb::new(30, 90, 220)), ColorName::Blue);
        assert_eq!(classify(Rgb::new(130, 40, 220)), ColorName::Purple);
        assert_eq!(classify(Rgb::new(240, 60, 170)), ColorName::Pink);
        // hue ~350 wraps back to red
        assert_eq!(classify(Rgb::new(250, 20, 50)), ColorName::Red);
    }

    #[test]
    fn test_achromatic_rules() {
        assert_eq!(classify(Rgb::new(30, 30, 30)), ColorName::Black);
        assert_eq!(classify(Rgb::new(128, 128, 128)), ColorName::Gray);
        assert_eq!(classify(Rgb::new(240, 240, 235)), ColorName::White);
        // low saturation but not bright enough for white
        assert_eq!(classify(Rgb::new(200, 195, 190)), ColorName::Gray);
    }

    #[test]
    fn test_brown_override() {
        assert_eq!(classify(Rgb::new(120, 60, 20)), ColorName::Brown);
        assert_eq!(classify(Rgb::new(130, 20, 20)), ColorName::Brown);
        // bright orange stays orange
        assert_eq!(classify(Rgb::new(230, 120, 30)), ColorName::Orange);
        // dark green is never brown
        assert_eq!(classify(Rgb::new(20, 100, 20)), ColorName::Green);
    }

    #[test]
    fn test_swatches_round_trip_to_their_name() {
        for name in ColorName::ALL {
            assert_eq!(classify(name.swatch()), name, "swatch for {name}");
        }
    }

    #[test]
    fn test_lightness_profile() {
        let profile = ThresholdProfile::Lightness;
        assert_eq!(profile.classify(Rgb::new(20, 25, 30)), ColorName::Black);
        assert_eq!(profile.classify(Rgb::new(120, 130, 125)), ColorName::Gray);
        assert_eq!(profile.classify(Rgb::new(200, 210, 205)), ColorName::White);
        // no brown bucket and a wider yellow band
        assert_eq!(profile.classify(Rgb::new(120, 60, 20)), ColorName::Orange);
        assert_eq!(profile.classify(Rgb::new(180, 220, 20)), ColorName::Yellow);
        assert_eq!(classify(Rgb::new(180, 220, 20)), ColorName::Green);
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!("Green".parse::<ColorName>().unwrap(), ColorName::Green);
        assert_eq!(" gray ".parse::<ColorName>().unwrap(), ColorName::Gray);
        assert!("teal".parse::<ColorName>().is_err());
        for name in ColorName::ALL {
            assert_eq!(name.to_string().parse::<ColorName>().unwrap(), name);
        }
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&ColorName::Purple).unwrap();
        assert_eq!(json, "\"purple\"");
        let profile: ThresholdProfile = serde_json::from_str("\"lightness\"").unwrap();
        assert_eq!(profile, ThresholdProfile::Lightness);
    }

    #[test]
    fn test_deserialize_ignores_case() {
        let name: ColorName = serde_json::from_str("\"Green\"").unwrap();
        assert_eq!(name, ColorName::Green);
        let name: ColorName = serde_json::from_str("\" BROWN \"").unwrap();
        assert_eq!(name, ColorName::Brown);
        assert!(serde_json::from_str::<ColorName>("\"teal\"").is_err());
    }
}
