//! Finding materials by color word, name or storage location.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::aggregate::Palette;
use crate::classify::{ColorName, ThresholdProfile};

/// A cataloged material sample as stored by the app.
///
/// Only `colors` matters to this crate; the other fields are carried so search
/// results can be handed back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_uri: String,
    #[serde(default)]
    pub colors: Palette,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub notes: String,
}

/// Names of every palette entry, classifying entries that have no stored name.
pub fn color_names(material: &Material, profile: ThresholdProfile) -> Vec<ColorName> {
    material
        .colors
        .iter()
        .map(|c| c.name_or_classify(profile))
        .collect()
}

/// Normalized search token, or `None` when the query is blank.
fn token(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Materials with a palette color whose name contains `query`,
/// case-insensitively. A blank query matches everything.
pub fn match_by_color<'a>(
    materials: &'a [Material],
    query: &str,
    profile: ThresholdProfile,
) -> Vec<&'a Material> {
    let Some(token) = token(query) else {
        return materials.iter().collect();
    };
    materials
        .iter()
        .filter(|m| {
            color_names(m, profile)
                .iter()
                .any(|name| name.as_str().contains(&token))
        })
        .collect()
}

/// Materials whose name or location contains `query`, case-insensitively.
/// A blank query matches everything.
pub fn match_by_text<'a>(materials: &'a [Material], query: &str) -> Vec<&'a Material> {
    let Some(token) = token(query) else {
        return materials.iter().collect();
    };
    materials
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&token) || m.location.to_lowercase().contains(&token)
        })
        .collect()
}

/// Combined search: text matches first, then color matches, each material
/// listed once at its first position.
pub fn search<'a>(
    materials: &'a [Material],
    query: &str,
    profile: ThresholdProfile,
) -> Vec<&'a Material> {
    if token(query).is_none() {
        return materials.iter().collect();
    }

    let text = match_by_text(materials, query);
    let color = match_by_color(materials, query, profile);
    tracing::debug!(query, text = text.len(), color = color.len(), "Searched materials");

    let mut seen = HashSet::new();
    text.into_iter()
        .chain(color)
        .filter(|&m| seen.insert(m.id.as_str()))
        .collect()
}
