//! Color palettes for cataloged material samples.
//!
//! Turns a photo of a material into a short, named palette with dominance
//! percentages, and finds materials by color word:
//!
//! 1. A [`Sampler`] pulls RGB samples out of the image.
//! 2. k-means groups them into `2 × count` centroids ([`cluster()`]).
//! 3. Each centroid is named ([`classify()`]), same-named centroids are merged
//!    and the shares renormalized to 100 ([`aggregate()`]).
//!
//! ```rust,no_run
//! use material_palette_wasm::{extract_palette_bytes, match_by_color, Material, ThresholdProfile};
//!
//! let photo = std::fs::read("felt.jpg")?;
//! let palette = extract_palette_bytes(&photo, 5)?;
//! println!("{}", palette.summary(3)); // e.g. "green 72.4%, brown 20.1%, black 7.5%"
//!
//! let catalog: Vec<Material> = Vec::new();
//! let greens = match_by_color(&catalog, "green", ThresholdProfile::Hsv);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The `#[wasm_bindgen]` exports at the bottom of this file expose the same
//! operations to JavaScript.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod aggregate;
pub mod classify;
pub mod cluster;
pub mod color;
pub mod config;
pub mod edit;
pub mod error;
pub mod pipeline;
pub mod sampler;
pub mod search;

pub use aggregate::{Palette, PaletteColor, RawColor, aggregate, raw_palette};
pub use classify::{ColorName, ThresholdProfile, classify};
pub use cluster::{Centroid, cluster};
pub use color::Rgb;
pub use config::{ExtractionConfig, SamplerKind};
pub use error::{PaletteError, ParseColorError, Result};
pub use pipeline::{
    PaletteExtractor, extract_palette, extract_palette_bytes, extract_palette_or_empty,
};
pub use sampler::{ByteSampler, GridSampler, Sampler};
pub use search::{Material, match_by_color, match_by_text, search};

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn palette_to_js(palette: &Palette) -> Result<Array, JsValue> {
    let out = Array::new();
    for c in palette {
        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("r"), &JsValue::from(c.r))?;
        Reflect::set(&obj, &JsValue::from_str("g"), &JsValue::from(c.g))?;
        Reflect::set(&obj, &JsValue::from_str("b"), &JsValue::from(c.b))?;
        Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(c.hex()))?;
        if let Some(name) = c.name {
            Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(name.as_str()))?;
        }
        if let Some(percent) = c.percent {
            Reflect::set(&obj, &JsValue::from_str("percent"), &JsValue::from(percent))?;
        }
        out.push(&obj);
    }
    Ok(out)
}

fn parse_catalog(materials_json: &str) -> Result<Vec<Material>, JsValue> {
    serde_json::from_str(materials_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid materials JSON: {e}")))
}

/// Extract a palette of at most `count` colors from encoded image bytes.
///
/// `sampler` is `"grid"` (decode pixels, the default) or `"bytes"` for hosts
/// where decoding is unavailable. Returns an array of
/// `{r, g, b, hex, name, percent}` objects, most dominant first.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(
    input: Vec<u8>,
    count: Option<usize>,
    sampler: Option<String>,
) -> Result<Array, JsValue> {
    let mut config = ExtractionConfig::default();
    if let Some(count) = count {
        config.count = count;
    }
    if let Some(kind) = sampler {
        config.sampler = kind.parse().map_err(js_error)?;
    }
    let extractor = PaletteExtractor::from_config(config).map_err(js_error)?;
    let palette = extractor.extract(&input).map_err(js_error)?;
    palette_to_js(&palette)
}

/// Name a `#rrggbb` color, e.g. `"#8b4513"` → `"brown"`.
#[wasm_bindgen(js_name = classifyColor)]
pub fn classify_color_js(hex: &str) -> Result<String, JsValue> {
    let rgb: Rgb = hex.parse().map_err(js_error)?;
    Ok(classify(rgb).to_string())
}

/// Filter a JSON array of materials down to those with a color matching `token`.
#[wasm_bindgen(js_name = matchByColor)]
pub fn match_by_color_js(materials_json: &str, token: &str) -> Result<String, JsValue> {
    let materials = parse_catalog(materials_json)?;
    let found = match_by_color(&materials, token, ThresholdProfile::default());
    serde_json::to_string(&found).map_err(js_error)
}

/// Name/location matches followed by color matches, without duplicates.
#[wasm_bindgen(js_name = searchMaterials)]
pub fn search_materials_js(materials_json: &str, query: &str) -> Result<String, JsValue> {
    let materials = parse_catalog(materials_json)?;
    let found = search(&materials, query, ThresholdProfile::default());
    serde_json::to_string(&found).map_err(js_error)
}
