//! The post content model.
//!
//! `PostContent` is a plain value owned by the editor session. Every mutation
//! replaces a whole field so the model stays trivially diffable and
//! serializable; nested maps are never patched in place.

use serde::{Deserialize, Deserializer, Serialize};

use crate::background::Background;
use crate::format::PostFormat;
use crate::geometry::{ElementId, NormalizedPosition};
use crate::style::{RoleMap, SectionStyle, TextRole, TextStyle};

/// Default headline position (percent).
pub const DEFAULT_HEADLINE_POSITION: NormalizedPosition = NormalizedPosition { x: 50.0, y: 25.0 };

/// Vertical spacing between default section positions (percent).
const SECTION_SPACING: f64 = 18.0;

/// Default z-order of the fixed slots; sections stack above the headline.
pub const LOGO_Z: i32 = 1;
pub const HEADLINE_Z: i32 = 2;
pub const SECTION_BASE_Z: i32 = 3;

/// The headline text layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadlineLayer {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<NormalizedPosition>,
    /// Clockwise rotation in degrees around the element centre.
    pub rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// A repeatable content block carrying its own placement and styling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<NormalizedPosition>,
    pub rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    pub style: SectionStyle,
}

impl Section {
    pub fn new(subheadline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subheadline: Some(subheadline.into()),
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Subheadline text, ignoring blanks.
    pub fn subheadline_text(&self) -> Option<&str> {
        non_blank(self.subheadline.as_deref())
    }

    /// Body text, ignoring blanks.
    pub fn body_text(&self) -> Option<&str> {
        non_blank(self.body.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.subheadline_text().is_none() && self.body_text().is_none()
    }
}

/// Complete declarative description of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostContent {
    pub format: PostFormat,
    pub headline: HeadlineLayer,
    #[serde(deserialize_with = "deserialize_sections")]
    sections: Vec<Section>,
    pub background: Background,
    pub show_logo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_z_index: Option<i32>,
    pub text_styles: RoleMap<TextStyle>,
    pub fonts: RoleMap<Option<String>>,
    pub font_sizes: RoleMap<Option<f64>>,
}

impl Default for PostContent {
    fn default() -> Self {
        Self::new(PostFormat::Square)
    }
}

impl PostContent {
    /// Create a post with constructor defaults for the given format.
    pub fn new(format: PostFormat) -> Self {
        Self {
            format,
            headline: HeadlineLayer::default(),
            sections: vec![Section::default()],
            background: Background::default(),
            show_logo: true,
            logo_z_index: None,
            text_styles: RoleMap::default(),
            fonts: RoleMap::default(),
            font_sizes: RoleMap::default(),
        }
    }

    /// Sections in paint/index order. Never empty.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Every element that can appear on the canvas, in default paint order.
    pub fn element_ids(&self) -> Vec<ElementId> {
        let mut ids = vec![ElementId::Logo, ElementId::Headline];
        ids.extend((0..self.sections.len()).map(ElementId::Section));
        ids
    }

    pub fn set_format(&mut self, format: PostFormat) {
        self.format = format;
    }

    pub fn set_headline_text(&mut self, text: impl Into<String>) {
        self.headline = HeadlineLayer {
            text: text.into(),
            ..self.headline.clone()
        };
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn set_show_logo(&mut self, show: bool) {
        self.show_logo = show;
    }

    pub fn set_text_style(&mut self, role: TextRole, style: TextStyle) {
        self.text_styles = std::mem::take(&mut self.text_styles).with(role, style);
    }

    pub fn set_font(&mut self, role: TextRole, family: Option<String>) {
        let family = family.filter(|f| !f.trim().is_empty());
        self.fonts = std::mem::take(&mut self.fonts).with(role, family);
    }

    pub fn set_font_size(&mut self, role: TextRole, size: Option<f64>) {
        let size = size.filter(|s| s.is_finite() && *s > 0.0);
        self.font_sizes = std::mem::take(&mut self.font_sizes).with(role, size);
    }

    /// Replace a whole section.
    pub fn set_section(&mut self, index: usize, section: Section) -> Result<(), ContentError> {
        let len = self.sections.len();
        let slot = self
            .sections
            .get_mut(index)
            .ok_or(ContentError::IndexOutOfRange { index, len })?;
        *slot = section;
        Ok(())
    }

    /// Append a section and return its index.
    pub fn add_section(&mut self, section: Section) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Remove a section. The last remaining section cannot be removed.
    pub fn remove_section(&mut self, index: usize) -> Result<Section, ContentError> {
        if index >= self.sections.len() {
            return Err(ContentError::IndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        if self.sections.len() == 1 {
            return Err(ContentError::LastSection);
        }
        Ok(self.sections.remove(index))
    }

    /// Replace the stored position of a draggable element.
    pub fn set_position(
        &mut self,
        element: ElementId,
        position: NormalizedPosition,
    ) -> Result<(), ContentError> {
        let position = NormalizedPosition::new(position.x, position.y);
        match element {
            ElementId::Logo => Err(ContentError::NotPositionable(element)),
            ElementId::Headline => {
                self.headline = HeadlineLayer {
                    position: Some(position),
                    ..self.headline.clone()
                };
                Ok(())
            }
            ElementId::Section(index) => {
                let section = self.section_or_err(index)?;
                let updated = Section {
                    position: Some(position),
                    ..section.clone()
                };
                self.set_section(index, updated)
            }
        }
    }

    /// Replace the rotation of a draggable element (degrees).
    pub fn set_rotation(&mut self, element: ElementId, degrees: f64) -> Result<(), ContentError> {
        let rotation = normalize_rotation(degrees);
        match element {
            ElementId::Logo => Err(ContentError::NotPositionable(element)),
            ElementId::Headline => {
                self.headline = HeadlineLayer {
                    rotation,
                    ..self.headline.clone()
                };
                Ok(())
            }
            ElementId::Section(index) => {
                let section = self.section_or_err(index)?;
                let updated = Section {
                    rotation,
                    ..section.clone()
                };
                self.set_section(index, updated)
            }
        }
    }

    /// Replace the stacking override of an element.
    pub fn set_z_index(&mut self, element: ElementId, z: Option<i32>) -> Result<(), ContentError> {
        match element {
            ElementId::Logo => {
                self.logo_z_index = z;
                Ok(())
            }
            ElementId::Headline => {
                self.headline = HeadlineLayer {
                    z_index: z,
                    ..self.headline.clone()
                };
                Ok(())
            }
            ElementId::Section(index) => {
                let section = self.section_or_err(index)?;
                let updated = Section {
                    z_index: z,
                    ..section.clone()
                };
                self.set_section(index, updated)
            }
        }
    }

    /// Stored position, or the computed default when none is stored.
    ///
    /// Returns `None` for the logo (fixed slot) and unknown sections.
    pub fn position_of(&self, element: ElementId) -> Option<NormalizedPosition> {
        match element {
            ElementId::Logo => None,
            ElementId::Headline => Some(
                self.headline
                    .position
                    .unwrap_or(DEFAULT_HEADLINE_POSITION),
            ),
            ElementId::Section(index) => self.sections.get(index).map(|section| {
                section
                    .position
                    .unwrap_or_else(|| default_section_position(index, self.sections.len()))
            }),
        }
    }

    /// Rotation in degrees; 0 for the logo and unknown sections.
    pub fn rotation_of(&self, element: ElementId) -> f64 {
        match element {
            ElementId::Logo => 0.0,
            ElementId::Headline => self.headline.rotation,
            ElementId::Section(index) => self.sections.get(index).map_or(0.0, |s| s.rotation),
        }
    }

    /// Effective stacking order: explicit override or the default slot order.
    pub fn z_index_of(&self, element: ElementId) -> i32 {
        match element {
            ElementId::Logo => self.logo_z_index.unwrap_or(LOGO_Z),
            ElementId::Headline => self.headline.z_index.unwrap_or(HEADLINE_Z),
            ElementId::Section(index) => self
                .sections
                .get(index)
                .and_then(|s| s.z_index)
                .unwrap_or(SECTION_BASE_Z + index as i32),
        }
    }

    fn section_or_err(&self, index: usize) -> Result<&Section, ContentError> {
        self.sections.get(index).ok_or(ContentError::IndexOutOfRange {
            index,
            len: self.sections.len(),
        })
    }

    pub(crate) fn from_parts(mut sections: Vec<Section>) -> Self {
        if sections.is_empty() {
            sections.push(Section::default());
        }
        Self {
            sections,
            ..Self::default()
        }
    }
}

/// Default centre of section `index` out of `count` sections.
///
/// Sections are spread vertically around the lower middle of the canvas.
pub fn default_section_position(index: usize, count: usize) -> NormalizedPosition {
    let count = count.max(1) as f64;
    let offset = index as f64 - (count - 1.0) / 2.0;
    NormalizedPosition::new(50.0, 55.0 + offset * SECTION_SPACING)
}

/// Bring a rotation into `(-360, 360)`; non-finite values become 0.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if degrees.is_finite() {
        degrees % 360.0
    } else {
        0.0
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

fn deserialize_sections<'de, D>(deserializer: D) -> Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut sections = Vec::<Section>::deserialize(deserializer)?;
    if sections.is_empty() {
        sections.push(Section::default());
    }
    Ok(sections)
}

/// Errors raised by content mutations and document parsing.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Section index {index} out of range (post has {len} sections)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("A post must keep at least one section")]
    LastSection,

    #[error("Element '{0}' has a fixed slot and cannot be positioned")]
    NotPositionable(ElementId),

    #[error("Invalid post document: {0}")]
    InvalidDocument(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_defaults() {
        let content = PostContent::default();
        assert_eq!(content.format, PostFormat::Square);
        assert_eq!(content.headline.text, "");
        assert_eq!(content.sections().len(), 1);
        assert!(content.sections()[0].is_empty());
        assert!(content.show_logo);
        assert_eq!(
            content.background.style,
            crate::background::BackgroundStyle::DarkGradient
        );
    }

    #[test]
    fn test_remove_last_section_is_refused() {
        let mut content = PostContent::default();
        assert!(matches!(
            content.remove_section(0),
            Err(ContentError::LastSection)
        ));
        content.add_section(Section::new("Lineup", "DJ Nova"));
        let removed = content.remove_section(0).unwrap();
        assert!(removed.is_empty());
        assert_eq!(content.sections().len(), 1);
        assert_eq!(content.sections()[0].subheadline_text(), Some("Lineup"));
    }

    #[test]
    fn test_set_position_clamps_and_targets_one_element() {
        let mut content = PostContent::default();
        content.add_section(Section::default());
        let before = content.position_of(ElementId::Section(0));

        content
            .set_position(ElementId::Section(1), NormalizedPosition { x: 95.0, y: 3.0 })
            .unwrap();

        assert_eq!(
            content.position_of(ElementId::Section(1)),
            Some(NormalizedPosition { x: 90.0, y: 10.0 })
        );
        assert_eq!(content.position_of(ElementId::Section(0)), before);
        assert_eq!(
            content.position_of(ElementId::Headline),
            Some(DEFAULT_HEADLINE_POSITION)
        );
    }

    #[test]
    fn test_logo_is_not_positionable() {
        let mut content = PostContent::default();
        let err = content
            .set_position(ElementId::Logo, NormalizedPosition::CENTER)
            .unwrap_err();
        assert!(matches!(err, ContentError::NotPositionable(ElementId::Logo)));
        assert_eq!(content.position_of(ElementId::Logo), None);
    }

    #[test]
    fn test_out_of_range_section_errors() {
        let mut content = PostContent::default();
        assert!(matches!(
            content.set_rotation(ElementId::Section(4), 10.0),
            Err(ContentError::IndexOutOfRange { index: 4, len: 1 })
        ));
    }

    #[test]
    fn test_default_section_positions_spread_and_stay_in_bounds() {
        let single = default_section_position(0, 1);
        assert_eq!(single, NormalizedPosition { x: 50.0, y: 55.0 });

        for count in 1..12 {
            for index in 0..count {
                assert!(default_section_position(index, count).is_within_bounds());
            }
        }
        let first = default_section_position(0, 2);
        let second = default_section_position(1, 2);
        assert!(second.y > first.y);
    }

    #[test]
    fn test_rotation_normalized() {
        assert_eq!(normalize_rotation(375.0), 15.0);
        assert_eq!(normalize_rotation(f64::NAN), 0.0);
    }

    #[test]
    fn test_z_order_defaults() {
        let mut content = PostContent::default();
        content.add_section(Section::default());
        assert!(content.z_index_of(ElementId::Logo) < content.z_index_of(ElementId::Headline));
        assert!(
            content.z_index_of(ElementId::Headline) < content.z_index_of(ElementId::Section(0))
        );
        content.set_z_index(ElementId::Headline, Some(10)).unwrap();
        assert_eq!(content.z_index_of(ElementId::Headline), 10);
    }

    #[test]
    fn test_empty_sections_array_deserializes_to_one_section() {
        let content: PostContent = serde_json::from_str(r#"{"sections": []}"#).unwrap();
        assert_eq!(content.sections().len(), 1);
    }

    #[test]
    fn test_font_overrides_drop_blanks() {
        let mut content = PostContent::default();
        content.set_font(TextRole::Body, Some("  ".to_string()));
        assert_eq!(content.fonts.body, None);
        content.set_font_size(TextRole::Headline, Some(-4.0));
        assert_eq!(content.font_sizes.headline, None);
        content.set_font_size(TextRole::Headline, Some(90.0));
        assert_eq!(content.font_sizes.headline, Some(90.0));
    }
}
