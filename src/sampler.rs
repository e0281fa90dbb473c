//! Pixel sampling strategies.
//!
//! A [`Sampler`] turns encoded image bytes into a bounded, deterministic list
//! of RGB samples. The host picks the strategy when it builds the extractor
//! (see [`crate::config::SamplerKind`]); the clustering code never branches on it.

use image::{GenericImageView, imageops::FilterType};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{PaletteError, Result};

/// Source of raw color samples for one image.
pub trait Sampler: Send + Sync {
    /// Sample `image`. `target_count` is the number of palette colors the
    /// caller wants; strategies may use it to bound their output.
    fn sample(&self, image: &[u8], target_count: usize) -> Result<Vec<Rgb>>;
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn sample(&self, image: &[u8], target_count: usize) -> Result<Vec<Rgb>> {
        (**self).sample(image, target_count)
    }
}

impl<S: Sampler + ?Sized> Sampler for &S {
    fn sample(&self, image: &[u8], target_count: usize) -> Result<Vec<Rgb>> {
        (**self).sample(image, target_count)
    }
}

/// Decodes the image, resizes it to a `side × side` square and keeps every
/// `stride`-th pixel in row-major order. Fully transparent pixels are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSampler {
    pub side: u32,
    pub stride: usize,
}

impl Default for GridSampler {
    fn default() -> Self {
        Self { side: 100, stride: 4 }
    }
}

impl GridSampler {
    /// Upper bound on the number of samples this sampler returns.
    pub fn max_samples(&self) -> usize {
        let pixels = self.side as usize * self.side as usize;
        pixels.div_ceil(self.stride.max(1))
    }

    /// Sample an already decoded image.
    pub fn sample_image(&self, img: &image::DynamicImage) -> Vec<Rgb> {
        let side = self.side.max(1);
        let resized = if img.dimensions() == (side, side) {
            img.to_rgba8()
        } else {
            img.resize_exact(side, side, FilterType::Triangle).to_rgba8()
        };

        resized
            .into_raw()
            .chunks_exact(4)
            .step_by(self.stride.max(1))
            .filter(|px| px[3] != 0)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect()
    }
}

impl Sampler for GridSampler {
    fn sample(&self, image: &[u8], _target_count: usize) -> Result<Vec<Rgb>> {
        let img = image::load_from_memory(image)
            .map_err(|e| PaletteError::decode("image could not be decoded", e))?;
        let (w, h) = img.dimensions();
        let samples = self.sample_image(&img);
        tracing::debug!(width = w, height = h, samples = samples.len(), "Grid sampled image");
        Ok(samples)
    }
}

/// Reads evenly spaced byte triplets of the encoded file as if they were
/// pixels, without decoding.
///
/// This is a coarse stand-in for hosts that cannot decode images. Compressed
/// data makes the colors only loosely related to the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ByteSampler {
    /// Samples taken per requested palette color.
    pub samples_per_color: usize,
    /// Leading bytes skipped to stay clear of the file header.
    pub header_skip: usize,
}

impl Default for ByteSampler {
    fn default() -> Self {
        Self {
            samples_per_color: 100,
            header_skip: 512,
        }
    }
}

impl Sampler for ByteSampler {
    fn sample(&self, image: &[u8], target_count: usize) -> Result<Vec<Rgb>> {
        // files smaller than the header window are read from the start
        let body = match image.get(self.header_skip..) {
            Some(rest) if rest.len() >= 3 => rest,
            _ => image,
        };

        let triplets = body.len() / 3;
        let wanted = target_count.saturating_mul(self.samples_per_color).min(triplets);
        if wanted == 0 {
            return Ok(Vec::new());
        }

        let step = triplets / wanted;
        let samples: Vec<Rgb> = body
            .chunks_exact(3)
            .step_by(step)
            .take(wanted)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        tracing::debug!(bytes = image.len(), samples = samples.len(), "Byte sampled image");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_grid_sampler_uniform_image() {
        let bytes = png_bytes(RgbaImage::from_pixel(40, 30, Rgba([10, 200, 30, 255])));
        let sampler = GridSampler::default();
        let samples = sampler.sample(&bytes, 5).unwrap();
        assert_eq!(samples.len(), sampler.max_samples());
        assert!(samples.iter().all(|s| *s == Rgb::new(10, 200, 30)));
    }

    #[test]
    fn test_grid_sampler_skips_transparent_pixels() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        for x in 0..10 {
            img.put_pixel(x, 0, Rgba([255, 0, 0, 255]));
        }
        let sampler = GridSampler { side: 10, stride: 1 };
        let samples = sampler.sample(&png_bytes(img), 5).unwrap();
        assert_eq!(samples, vec![Rgb::new(255, 0, 0); 10]);
    }

    #[test]
    fn test_grid_sampler_decode_error() {
        let err = GridSampler::default().sample(b"definitely not an image", 5).unwrap_err();
        assert!(matches!(err, PaletteError::Decode { .. }));
    }

    #[test]
    fn test_byte_sampler_is_bounded_and_deterministic() {
        let bytes: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let sampler = ByteSampler::default();
        let a = sampler.sample(&bytes, 5).unwrap();
        let b = sampler.sample(&bytes, 5).unwrap();
        assert_eq!(a.len(), 500);
        assert_eq!(a, b);
    }

    #[test]
    fn test_byte_sampler_small_inputs() {
        let sampler = ByteSampler::default();
        assert!(sampler.sample(&[], 5).unwrap().is_empty());
        assert!(sampler.sample(&[1, 2], 5).unwrap().is_empty());
        // shorter than the header window: read from the start
        let samples = sampler.sample(&[9, 8, 7, 6, 5, 4], 5).unwrap();
        assert_eq!(samples, vec![Rgb::new(9, 8, 7), Rgb::new(6, 5, 4)]);
        assert!(sampler.sample(&[9, 8, 7], 0).unwrap().is_empty());
    }

    #[test]
    fn test_boxed_sampler_delegates() {
        let sampler: Box<dyn Sampler> = Box::new(ByteSampler { samples_per_color: 1, header_skip: 0 });
        let samples = sampler.sample(&[1, 2, 3, 4, 5, 6], 1).unwrap();
        assert_eq!(samples, vec![Rgb::new(1, 2, 3)]);
    }
}
