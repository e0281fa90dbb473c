//! Extraction settings.
//!
//! Settings can be built in code, or loaded from a JSON file in which every
//! field is optional:
//!
//! ```json
//! { "count": 5, "profile": "hsv", "sampler": "grid", "grid": { "side": 100, "stride": 4 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::ThresholdProfile;
use crate::cluster::ITERATIONS;
use crate::error::{PaletteError, Result};
use crate::sampler::{ByteSampler, GridSampler, Sampler};

/// Number of palette colors returned by default.
pub const DEFAULT_COUNT: usize = 5;

/// Clusters per requested palette color.
pub const DEFAULT_CLUSTER_MULTIPLIER: usize = 2;

/// Longest palette a caller may request.
pub const MAX_COUNT: usize = 64;

/// Upper bound on k-means clusters, whatever the multiplier.
pub const MAX_CLUSTERS: usize = 256;

/// Which [`Sampler`] strategy the host wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    /// Decode and sample real pixels.
    #[default]
    Grid,
    /// Sample encoded bytes; for hosts without an image decoder.
    Bytes,
}

impl std::str::FromStr for SamplerKind {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(SamplerKind::Grid),
            "bytes" => Ok(SamplerKind::Bytes),
            other => Err(PaletteError::Config(format!("unknown sampler: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Palette length requested from the aggregator.
    pub count: usize,
    /// k-means runs with `count * cluster_multiplier` clusters.
    pub cluster_multiplier: usize,
    pub iterations: usize,
    pub profile: ThresholdProfile,
    pub sampler: SamplerKind,
    pub grid: GridSampler,
    pub bytes: ByteSampler,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            cluster_multiplier: DEFAULT_CLUSTER_MULTIPLIER,
            iterations: ITERATIONS,
            profile: ThresholdProfile::default(),
            sampler: SamplerKind::default(),
            grid: GridSampler::default(),
            bytes: ByteSampler::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PaletteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PaletteError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("count", self.count),
            ("cluster_multiplier", self.cluster_multiplier),
            ("iterations", self.iterations),
            ("grid.side", self.grid.side as usize),
            ("grid.stride", self.grid.stride),
            ("bytes.samples_per_color", self.bytes.samples_per_color),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, value)| *value == 0) {
            return Err(PaletteError::Config(format!("{field} must be at least 1")));
        }
        self.check_count(self.count)
    }

    /// Reject a palette length that would cluster into more than
    /// [`MAX_CLUSTERS`] centroids.
    pub fn check_count(&self, count: usize) -> Result<()> {
        if count > MAX_COUNT {
            return Err(PaletteError::Config(format!(
                "count must be at most {MAX_COUNT}, got {count}"
            )));
        }
        match count.checked_mul(self.cluster_multiplier) {
            Some(k) if k <= MAX_CLUSTERS => Ok(()),
            _ => Err(PaletteError::Config(format!(
                "count {count} with cluster_multiplier {} exceeds {MAX_CLUSTERS} clusters",
                self.cluster_multiplier
            ))),
        }
    }

    /// Number of k-means clusters for the configured palette length.
    pub fn cluster_count(&self) -> usize {
        self.count.saturating_mul(self.cluster_multiplier)
    }

    /// The sampler strategy selected by [`ExtractionConfig::sampler`].
    pub fn build_sampler(&self) -> Box<dyn Sampler> {
        match self.sampler {
            SamplerKind::Grid => Box::new(self.grid),
            SamplerKind::Bytes => Box::new(self.bytes),
        }
    }
}
