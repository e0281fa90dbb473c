//! Manual corrections to an extracted palette.
//!
//! A rejected edit never leaves an entry half-updated: a bad hex keeps the
//! previous color and a bad percent falls back to zero.

use crate::aggregate::PaletteColor;
use crate::classify::ThresholdProfile;
use crate::color::Rgb;
use crate::error::{PaletteError, Result};

/// Parse a user-entered percentage, clamped to [0, 100] and rounded to one
/// decimal. A trailing `%` is accepted.
pub fn parse_percent(text: &str) -> Result<f64> {
    let trimmed = text.trim().trim_end_matches('%').trim_end();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(((v.clamp(0.0, 100.0)) * 10.0).round() / 10.0),
        _ => Err(PaletteError::InvalidManualEdit {
            field: "percent",
            value: text.to_string(),
        }),
    }
}

/// Parse a user-entered hex color.
pub fn parse_hex_edit(text: &str) -> Result<Rgb> {
    text.parse::<Rgb>().map_err(|e| {
        tracing::debug!(error = %e, "Rejected hex edit");
        PaletteError::InvalidManualEdit {
            field: "hex",
            value: text.to_string(),
        }
    })
}

/// Replace the color of `entry` and rename it to match.
///
/// On a parse failure the entry keeps its previous color and name.
pub fn apply_hex_edit(entry: &mut PaletteColor, text: &str, profile: ThresholdProfile) -> Result<()> {
    match parse_hex_edit(text) {
        Ok(rgb) => {
            entry.set_rgb(rgb);
            entry.name = Some(profile.classify(rgb));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, previous = entry.hex(), "Keeping previous color");
            Err(e)
        }
    }
}

/// Set the percent of `entry`; unparseable input sets it to zero.
pub fn apply_percent_edit(entry: &mut PaletteColor, text: &str) -> Result<()> {
    match parse_percent(text) {
        Ok(percent) => {
            entry.percent = Some(percent);
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Resetting percent to 0");
            entry.percent = Some(0.0);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorName;

    fn entry() -> PaletteColor {
        PaletteColor::new(Rgb::new(0, 128, 0), Some(ColorName::Green), Some(50.0))
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("42.26").unwrap(), 42.3);
        assert_eq!(parse_percent(" 15 % ").unwrap(), 15.0);
        assert_eq!(parse_percent("150").unwrap(), 100.0);
        assert_eq!(parse_percent("-3").unwrap(), 0.0);
        assert!(parse_percent("lots").is_err());
        assert!(parse_percent("NaN").is_err());
        assert!(parse_percent("").is_err());
    }

    #[test]
    fn test_hex_edit_updates_color_and_name() {
        let mut color = entry();
        apply_hex_edit(&mut color, "#1E90FF", ThresholdProfile::Hsv).unwrap();
        assert_eq!(color.hex(), "#1e90ff");
        assert_eq!(color.name, Some(ColorName::Blue));
        assert_eq!(color.percent, Some(50.0));
    }

    #[test]
    fn test_bad_hex_keeps_previous() {
        let mut color = entry();
        let err = apply_hex_edit(&mut color, "#12G", ThresholdProfile::Hsv).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidManualEdit { field: "hex", .. }));
        assert_eq!(color, entry());
    }

    #[test]
    fn test_bad_percent_resets_to_zero() {
        let mut color = entry();
        assert!(apply_percent_edit(&mut color, "abc").is_err());
        assert_eq!(color.percent, Some(0.0));

        apply_percent_edit(&mut color, "12.5").unwrap();
        assert_eq!(color.percent, Some(12.5));
    }
}
