//! Per-role text styling as stored in post content.
//!
//! These are the user's overrides only. Concrete paint styles are produced
//! by the style resolver in `nitepost-layout-core`.

use serde::{Deserialize, Serialize};

/// Default font family for every role.
pub const DEFAULT_FONT_FAMILY: &str = "Poppins";

/// Text role within a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Headline,
    Subheadline,
    Body,
}

impl TextRole {
    pub const ALL: [TextRole; 3] = [TextRole::Headline, TextRole::Subheadline, TextRole::Body];

    pub fn as_str(self) -> &'static str {
        match self {
            TextRole::Headline => "headline",
            TextRole::Subheadline => "subheadline",
            TextRole::Body => "body",
        }
    }
}

impl std::str::FromStr for TextRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "headline" => Ok(TextRole::Headline),
            "subheadline" => Ok(TextRole::Subheadline),
            "body" => Ok(TextRole::Body),
            other => Err(format!(
                "Unknown text role: {other}. Use: headline, subheadline, body"
            )),
        }
    }
}

/// One value per text role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleMap<T> {
    pub headline: T,
    pub subheadline: T,
    pub body: T,
}

impl<T> RoleMap<T> {
    pub fn new(headline: T, subheadline: T, body: T) -> Self {
        Self {
            headline,
            subheadline,
            body,
        }
    }

    pub fn get(&self, role: TextRole) -> &T {
        match role {
            TextRole::Headline => &self.headline,
            TextRole::Subheadline => &self.subheadline,
            TextRole::Body => &self.body,
        }
    }

    /// Return a copy with one role replaced.
    pub fn with(mut self, role: TextRole, value: T) -> Self {
        match role {
            TextRole::Headline => self.headline = value,
            TextRole::Subheadline => self.subheadline = value,
            TextRole::Body => self.body = value,
        }
        self
    }
}

/// Horizontal text alignment inside an element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Drop shadow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShadowSpec {
    pub enabled: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            offset_x: 2.0,
            offset_y: 2.0,
            blur: 4.0,
            color: "rgba(0,0,0,0.5)".to_string(),
        }
    }
}

/// Glyph outline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrokeSpec {
    pub enabled: bool,
    pub width: f64,
    pub color: String,
}

impl Default for StrokeSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 2.0,
            color: "#000000".to_string(),
        }
    }
}

/// Stored styling for one text role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// CSS-like colour string; `None` selects the role default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StrokeSpec>,
    pub alignment: TextAlign,
}

impl TextStyle {
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }
}

/// Style overrides carried by a single section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<TextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<TextStyle>,
}

impl SectionStyle {
    /// Override for a role, if this section has one.
    pub fn for_role(&self, role: TextRole) -> Option<&TextStyle> {
        match role {
            TextRole::Headline => None,
            TextRole::Subheadline => self.subheadline.as_ref(),
            TextRole::Body => self.body.as_ref(),
        }
    }
}
