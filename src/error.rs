//! Error types for palette extraction and editing.

use thiserror::Error;

/// Result type alias for palette operations
pub type Result<T, E = PaletteError> = std::result::Result<T, E>;

/// Failures raised while turning an image into a palette.
///
/// Only [`PaletteError::Decode`] crosses the sampler boundary. The clustering,
/// classification and aggregation steps are total functions.
#[derive(Error, Debug)]
pub enum PaletteError {
    /// The sampler could not obtain pixels from the image.
    #[error("Unable to decode image: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The sampler produced no samples.
    #[error("Image produced no color samples")]
    EmptySampleSet,

    /// User-edited hex or percent text could not be parsed.
    #[error("Invalid {field} edit: {value:?}")]
    InvalidManualEdit { field: &'static str, value: String },

    /// Configuration could not be loaded or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PaletteError {
    /// Create a decode error with its underlying cause
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the surrounding save workflow should continue with an empty palette.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PaletteError::Decode { .. }
                | PaletteError::EmptySampleSet
                | PaletteError::InvalidManualEdit { .. }
        )
    }
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string must have 3 or 6 digits after stripping '#'
    #[error("invalid hex color length (expected 3 or 6 characters, got {0})")]
    InvalidLength(usize),

    /// A character other than a hex digit
    #[error("invalid hex character: {0:?}")]
    InvalidCharacter(char),
}
