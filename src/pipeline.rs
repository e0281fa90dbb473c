//! Image to palette: sample, cluster, name, aggregate.

use crate::aggregate::{Palette, aggregate, raw_palette};
use crate::cluster::cluster_with_iterations;
use crate::color::Rgb;
use crate::config::{ExtractionConfig, MAX_CLUSTERS, MAX_COUNT};
use crate::error::{PaletteError, Result};
use crate::sampler::{GridSampler, Sampler};

/// Runs the extraction pipeline with one sampler strategy.
///
/// Holds no state between calls, so one extractor can serve many images
/// concurrently.
#[derive(Debug, Clone)]
pub struct PaletteExtractor<S> {
    sampler: S,
    config: ExtractionConfig,
}

impl PaletteExtractor<Box<dyn Sampler>> {
    /// Build an extractor using the sampler selected in `config`.
    pub fn from_config(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sampler: config.build_sampler(),
            config,
        })
    }
}

impl<S: Sampler> PaletteExtractor<S> {
    pub fn new(sampler: S, config: ExtractionConfig) -> Self {
        Self { sampler, config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract a palette of at most `config.count` colors.
    ///
    /// Only sampler failures are returned as errors. An image that yields no
    /// samples produces an empty palette.
    pub fn extract(&self, image: &[u8]) -> Result<Palette> {
        self.extract_with_count(image, self.config.count)
    }

    pub fn extract_with_count(&self, image: &[u8], count: usize) -> Result<Palette> {
        self.config.check_count(count)?;
        let samples = self.sampler.sample(image, count)?;
        Ok(self.palette_from_samples(&samples, count))
    }

    /// The pipeline after sampling: cluster into `count * multiplier`
    /// centroids, then merge by name down to `count` entries.
    ///
    /// `count` is capped at [`MAX_COUNT`] and the cluster count at
    /// [`MAX_CLUSTERS`].
    pub fn palette_from_samples(&self, samples: &[Rgb], count: usize) -> Palette {
        if samples.is_empty() {
            tracing::debug!(error = %PaletteError::EmptySampleSet, "Returning empty palette");
            return Palette::default();
        }

        let count = count.min(MAX_COUNT);
        let k = count
            .saturating_mul(self.config.cluster_multiplier)
            .min(MAX_CLUSTERS);
        let centroids = cluster_with_iterations(samples, k, self.config.iterations);
        let palette = aggregate(&raw_palette(&centroids), count, self.config.profile);

        tracing::debug!(
            samples = samples.len(),
            clusters = k,
            colors = palette.len(),
            summary = %palette.summary(count),
            "Extracted palette"
        );
        palette
    }

    /// [`extract`](Self::extract), degrading any failure to an empty palette.
    ///
    /// Saving a material must not fail because its photo could not be read.
    pub fn extract_or_empty(&self, image: &[u8]) -> Palette {
        match self.extract(image) {
            Ok(palette) => palette,
            Err(e) => {
                tracing::warn!(error = %e, "Palette extraction failed, continuing without colors");
                Palette::default()
            }
        }
    }
}

/// Extract a `count`-color palette with `sampler` and default settings.
pub fn extract_palette<S: Sampler>(sampler: S, image: &[u8], count: usize) -> Result<Palette> {
    let config = ExtractionConfig {
        count,
        ..ExtractionConfig::default()
    };
    PaletteExtractor::new(sampler, config).extract(image)
}

/// [`extract_palette`] returning an empty palette instead of an error.
pub fn extract_palette_or_empty<S: Sampler>(sampler: S, image: &[u8], count: usize) -> Palette {
    let config = ExtractionConfig {
        count,
        ..ExtractionConfig::default()
    };
    PaletteExtractor::new(sampler, config).extract_or_empty(image)
}

/// Decode `input` and extract a `count`-color palette from its pixels.
pub fn extract_palette_bytes(input: &[u8], count: usize) -> Result<Palette> {
    extract_palette(GridSampler::default(), input, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorName;
    use crate::sampler::ByteSampler;

    struct FixedSampler(Vec<Rgb>);

    impl Sampler for FixedSampler {
        fn sample(&self, _image: &[u8], _target_count: usize) -> Result<Vec<Rgb>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSampler;

    impl Sampler for FailingSampler {
        fn sample(&self, _image: &[u8], _target_count: usize) -> Result<Vec<Rgb>> {
            Err(PaletteError::decode(
                "unreadable",
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
            ))
        }
    }

    #[test]
    fn test_single_color_gives_single_entry() {
        let sampler = FixedSampler(vec![Rgb::new(30, 160, 50); 100]);
        let palette = extract_palette(sampler, b"", 1).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].name, Some(ColorName::Green));
        assert_eq!(palette[0].percent, Some(100.0));
    }

    #[test]
    fn test_empty_samples_give_empty_palette() {
        let palette = extract_palette(FixedSampler(Vec::new()), b"", 5).unwrap();
        assert!(palette.is_empty());
    }

    #[test]
    fn test_decode_failure_propagates() {
        let err = extract_palette(FailingSampler, b"", 5).unwrap_err();
        assert!(matches!(err, PaletteError::Decode { .. }));
        assert!(extract_palette_or_empty(FailingSampler, b"", 5).is_empty());
    }

    #[test]
    fn test_mixed_samples_sorted_by_dominance() {
        let (blue, white, red) = (Rgb::new(20, 40, 200), Rgb::new(250, 250, 250), Rgb::new(240, 20, 20));
        let block = [blue, blue, blue, blue, blue, blue, white, white, white, red];
        let samples: Vec<Rgb> = block.iter().copied().cycle().take(100).collect();
        let palette = extract_palette(FixedSampler(samples), b"", 5).unwrap();
        let names: Vec<_> = palette.names().collect();
        assert_eq!(names, vec![ColorName::Blue, ColorName::White, ColorName::Red]);
        let percents: Vec<_> = palette.iter().map(|c| c.percent.unwrap()).collect();
        assert_eq!(percents, vec![60.0, 30.0, 10.0]);
    }

    #[test]
    fn test_from_config_selects_sampler() {
        let config = ExtractionConfig {
            sampler: crate::config::SamplerKind::Bytes,
            bytes: ByteSampler { samples_per_color: 10, header_skip: 0 },
            ..ExtractionConfig::default()
        };
        let extractor = PaletteExtractor::from_config(config).unwrap();
        // not an image at all, but the byte sampler does not decode
        let palette = extractor.extract(&[240u8; 300]).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].name, Some(ColorName::White));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = ExtractionConfig { count: 0, ..ExtractionConfig::default() };
        assert!(PaletteExtractor::from_config(config).is_err());
    }

    #[test]
    fn test_oversized_count_is_an_error() {
        let sampler = FixedSampler(vec![Rgb::new(30, 160, 50); 4]);
        let config = ExtractionConfig {
            count: usize::MAX / 2,
            ..ExtractionConfig::default()
        };
        let extractor = PaletteExtractor::new(sampler, config);
        assert!(matches!(extractor.extract(b""), Err(PaletteError::Config(_))));
        assert!(extractor.extract_or_empty(b"").is_empty());
        assert!(extract_palette(FixedSampler(vec![Rgb::new(0, 0, 255)]), b"", 1_000_000).is_err());
    }

    #[test]
    fn test_palette_from_samples_caps_clusters() {
        let samples = vec![Rgb::new(240, 20, 20); 10];
        let extractor = PaletteExtractor::new(FixedSampler(Vec::new()), ExtractionConfig::default());
        let palette = extractor.palette_from_samples(&samples, usize::MAX);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].name, Some(ColorName::Red));
    }
}
