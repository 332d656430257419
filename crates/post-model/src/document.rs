//! Plain-document (JSON) form of post content.
//!
//! Two shapes are accepted on input:
//! - the current shape, where every section carries its own position,
//!   rotation, stacking and style overrides;
//! - the legacy shape with a string `headline` and index-aligned
//!   `positions.sections` / `rotations.sections` / `zIndex.sections` arrays.
//!
//! Legacy documents are migrated on load. Missing or short arrays fall back
//! to computed defaults rather than failing.

use serde::Deserialize;
use serde_json::Value;

use crate::background::Background;
use crate::content::{normalize_rotation, ContentError, HeadlineLayer, PostContent, Section};
use crate::format::PostFormat;
use crate::geometry::NormalizedPosition;
use crate::style::{RoleMap, TextStyle};

impl PostContent {
    /// Serialize into a JSON-compatible document.
    pub fn to_document(&self) -> Result<Value, ContentError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild content from a document in either the current or legacy shape.
    pub fn from_document(value: Value) -> Result<PostContent, ContentError> {
        if !value.is_object() {
            return Err(ContentError::InvalidDocument(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        if is_legacy_document(&value) {
            let legacy: LegacyPostContent = serde_json::from_value(value)?;
            Ok(legacy.into_content())
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// Parse a JSON string in either shape.
    pub fn from_json(json: &str) -> Result<PostContent, ContentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_document(value)
    }

    pub fn to_json_pretty(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Whether a document uses the parallel-array layout.
pub fn is_legacy_document(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let headline_is_text = matches!(object.get("headline"), Some(Value::String(_)));
    headline_is_text
        || object.contains_key("positions")
        || object.contains_key("rotations")
        || object.contains_key("zIndex")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyPostContent {
    format: PostFormat,
    headline: Option<String>,
    sections: Vec<LegacySection>,
    background: Background,
    #[serde(default = "default_true")]
    show_logo: bool,
    text_styles: RoleMap<TextStyle>,
    fonts: RoleMap<Option<String>>,
    font_sizes: RoleMap<Option<f64>>,
    positions: LegacyPositions,
    rotations: LegacyRotations,
    z_index: LegacyZIndex,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacySection {
    subheadline: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyPositions {
    headline: Option<NormalizedPosition>,
    sections: Vec<Option<NormalizedPosition>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyRotations {
    headline: Option<f64>,
    sections: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyZIndex {
    logo: Option<i32>,
    headline: Option<i32>,
    sections: Vec<Option<i32>>,
}

impl LegacyPostContent {
    fn into_content(self) -> PostContent {
        let positions = self.positions.sections;
        let rotations = self.rotations.sections;
        let z_indexes = self.z_index.sections;

        let sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(index, legacy)| Section {
                subheadline: legacy.subheadline,
                body: legacy.body,
                position: positions.get(index).copied().flatten(),
                rotation: rotations
                    .get(index)
                    .copied()
                    .flatten()
                    .map_or(0.0, normalize_rotation),
                z_index: z_indexes.get(index).copied().flatten(),
                ..Section::default()
            })
            .collect();

        let mut content = PostContent::from_parts(sections);
        content.format = self.format;
        content.headline = HeadlineLayer {
            text: self.headline.unwrap_or_default(),
            position: self.positions.headline,
            rotation: self.rotations.headline.map_or(0.0, normalize_rotation),
            z_index: self.z_index.headline,
        };
        content.background = self.background;
        content.show_logo = self.show_logo;
        content.logo_z_index = self.z_index.logo;
        content.text_styles = self.text_styles;
        content.fonts = self.fonts;
        content.font_sizes = self.font_sizes;
        content
    }
}
