//! Palette model and the merge/sort/renormalize step that turns clustered
//! centroids into a stored palette.

use std::fmt::Write as _;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::classify::{ColorName, ThresholdProfile};
use crate::cluster::Centroid;
use crate::color::Rgb;

/// Allowed distance of a palette's percent sum from 100 before it is rescaled.
pub const SUM_TOLERANCE: f64 = 0.1;

/// One stored palette entry.
///
/// Serialized as the flat record `{r, g, b, hex, name?, percent?}`. `hex` is
/// always derived from the channels, including when reading a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PaletteColorRecord")]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ColorName>,
    /// Share of the image in percent, one decimal. Palettes written before
    /// percentages existed have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

#[derive(Deserialize)]
struct PaletteColorRecord {
    r: u8,
    g: u8,
    b: u8,
    #[serde(default)]
    name: Option<ColorName>,
    #[serde(default)]
    percent: Option<f64>,
}

impl From<PaletteColorRecord> for PaletteColor {
    fn from(rec: PaletteColorRecord) -> Self {
        PaletteColor::new(Rgb::new(rec.r, rec.g, rec.b), rec.name, rec.percent)
    }
}

impl PaletteColor {
    pub fn new(rgb: Rgb, name: Option<ColorName>, percent: Option<f64>) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            hex: rgb.hex(),
            name,
            percent,
        }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Lowercase `#rrggbb` of the channels.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn set_rgb(&mut self, rgb: Rgb) {
        self.r = rgb.r;
        self.g = rgb.g;
        self.b = rgb.b;
        self.hex = rgb.hex();
    }

    /// Stored name, or the classification of the stored channels.
    pub fn name_or_classify(&self, profile: ThresholdProfile) -> ColorName {
        self.name.unwrap_or_else(|| profile.classify(self.rgb()))
    }
}

/// Ordered palette, most dominant color first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<PaletteColor>);

impl Palette {
    pub fn new(colors: Vec<PaletteColor>) -> Self {
        Self(colors)
    }

    pub fn into_inner(self) -> Vec<PaletteColor> {
        self.0
    }

    pub fn colors_mut(&mut self) -> &mut [PaletteColor] {
        &mut self.0
    }

    /// Sum of all percentages, a missing percent counting as zero.
    pub fn percent_sum(&self) -> f64 {
        self.0.iter().map(|c| c.percent.unwrap_or(0.0)).sum()
    }

    pub fn is_normalized(&self) -> bool {
        self.0.is_empty() || (self.percent_sum() - 100.0).abs() <= SUM_TOLERANCE
    }

    /// Names in palette order; unnamed entries are skipped.
    pub fn names(&self) -> impl Iterator<Item = ColorName> + '_ {
        self.0.iter().filter_map(|c| c.name)
    }

    /// Rescale percentages so they sum to 100.
    ///
    /// Leaves the palette untouched when it is empty, already sums to 100
    /// within [`SUM_TOLERANCE`], or has no percentages at all.
    pub fn normalize(&mut self) {
        let mut values: Vec<f64> = self.0.iter().map(|c| c.percent.unwrap_or(0.0)).collect();
        if !rescale(&mut values) {
            return;
        }
        for (color, value) in self.0.iter_mut().zip(values) {
            color.percent = Some(value);
        }
    }

    /// Short human readable form, e.g. `green 80%, brown 20%`.
    pub fn summary(&self, limit: usize) -> String {
        let mut out = String::new();
        for (i, c) in self.0.iter().take(limit).enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let name = c.name.map(|n| n.as_str()).unwrap_or("unknown");
            match c.percent {
                Some(p) => {
                    let _ = write!(out, "{name} {p}%");
                }
                None => out.push_str(name),
            }
        }
        out
    }
}

impl Deref for Palette {
    type Target = [PaletteColor];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<PaletteColor> for Palette {
    fn from_iter<I: IntoIterator<Item = PaletteColor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Palette {
    type Item = PaletteColor;
    type IntoIter = std::vec::IntoIter<PaletteColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteColor;
    type IntoIter = std::slice::Iter<'a, PaletteColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A centroid color with its raw share of the samples, before naming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawColor {
    pub color: Rgb,
    pub percent: f64,
}

/// Convert clustering output into raw shares of the total member count.
pub fn raw_palette(centroids: &[Centroid]) -> Vec<RawColor> {
    let total: usize = centroids.iter().map(|c| c.member_count).sum();
    centroids
        .iter()
        .map(|c| RawColor {
            color: c.color,
            percent: c.percent(total),
        })
        .collect()
}

/// Merge raw colors by name, keep the `top_n` most dominant names and
/// renormalize their shares to 100.
///
/// Entries carry the canonical swatch of their name, not the centroid color.
/// Names whose combined share is zero are dropped unless every share is zero,
/// in which case the names split the palette evenly.
pub fn aggregate(raw: &[RawColor], top_n: usize, profile: ThresholdProfile) -> Palette {
    if raw.is_empty() || top_n == 0 {
        return Palette::default();
    }

    let mut buckets: Vec<(ColorName, f64)> = Vec::new();
    for entry in raw {
        let name = profile.classify(entry.color);
        let share = entry.percent.max(0.0);
        match buckets.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += share,
            None => buckets.push((name, share)),
        }
    }

    if buckets.iter().all(|(_, share)| *share == 0.0) {
        let even = 100.0 / buckets.len() as f64;
        buckets.iter_mut().for_each(|(_, share)| *share = even);
    } else {
        buckets.retain(|(_, share)| *share > 0.0);
    }

    // stable: equal shares keep first-seen order
    buckets.sort_by(|a, b| b.1.total_cmp(&a.1));
    buckets.truncate(top_n);

    let mut values: Vec<f64> = buckets.iter().map(|(_, share)| *share).collect();
    if !rescale(&mut values) {
        values.iter_mut().for_each(|v| *v = round_tenth(*v));
        settle_residual(&mut values);
    }

    let mut entries: Vec<(ColorName, f64)> = buckets
        .into_iter()
        .zip(values)
        .map(|((name, _), percent)| (name, percent))
        .collect();
    // the residual can push the head below a tied runner-up
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));

    entries
        .into_iter()
        .map(|(name, percent)| PaletteColor::new(name.swatch(), Some(name), Some(percent)))
        .collect()
}

#[inline]
fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Rescale to a sum of 100 with one-decimal values. Returns false (and leaves
/// `values` alone) when there is nothing to rescale.
fn rescale(values: &mut [f64]) -> bool {
    let sum: f64 = values.iter().sum();
    if values.is_empty() || sum <= 0.0 || (sum - 100.0).abs() <= SUM_TOLERANCE {
        return false;
    }
    let factor = 100.0 / sum;
    values.iter_mut().for_each(|v| *v = round_tenth(*v * factor));
    settle_residual(values);
    true
}

/// Fold the rounding residual into the first (largest) value so the sum is
/// exactly 100 at one decimal.
fn settle_residual(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if let Some(first) = values.first_mut() {
        *first = round_tenth(*first + (100.0 - sum)).clamp(0.0, 100.0);
    }
}
