//! Background treatment stored with a post.

use serde::{Deserialize, Serialize};

/// Overlay opacity used for custom images when none is stored.
pub const DEFAULT_IMAGE_OPACITY: u8 = 30;

/// Background treatment selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    #[default]
    DarkGradient,
    HeroStyle,
    NeonAccent,
    CustomImage,
}

impl BackgroundStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundStyle::DarkGradient => "dark-gradient",
            BackgroundStyle::HeroStyle => "hero-style",
            BackgroundStyle::NeonAccent => "neon-accent",
            BackgroundStyle::CustomImage => "custom-image",
        }
    }
}

impl std::str::FromStr for BackgroundStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark-gradient" => Ok(BackgroundStyle::DarkGradient),
            "hero-style" => Ok(BackgroundStyle::HeroStyle),
            "neon-accent" => Ok(BackgroundStyle::NeonAccent),
            "custom-image" => Ok(BackgroundStyle::CustomImage),
            other => Err(format!(
                "Unknown background: {other}. Use: dark-gradient, hero-style, neon-accent, custom-image"
            )),
        }
    }
}

/// Background description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Background {
    pub style: BackgroundStyle,

    /// Opaque image reference (path, `file://` or `data:` URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Black overlay strength over a custom image, 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
}

impl Background {
    pub fn gradient(style: BackgroundStyle) -> Self {
        Self {
            style,
            image: None,
            opacity: None,
        }
    }

    pub fn custom_image(image: impl Into<String>, opacity: u8) -> Self {
        Self {
            style: BackgroundStyle::CustomImage,
            image: Some(image.into()),
            opacity: Some(opacity.min(100)),
        }
    }

    /// Overlay opacity in `[0, 100]`, defaulting to 30.
    pub fn effective_opacity(&self) -> u8 {
        self.opacity.unwrap_or(DEFAULT_IMAGE_OPACITY).min(100)
    }

    /// Image reference, ignoring empty strings.
    pub fn image_ref(&self) -> Option<&str> {
        self.image.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_serializes_kebab_case() {
        let json = serde_json::to_string(&BackgroundStyle::CustomImage).unwrap();
        assert_eq!(json, "\"custom-image\"");
    }

    #[test]
    fn test_effective_opacity_defaults_and_clamps() {
        assert_eq!(Background::default().effective_opacity(), 30);
        let bg = Background {
            opacity: Some(250),
            ..Background::default()
        };
        assert_eq!(bg.effective_opacity(), 100);
    }

    #[test]
    fn test_blank_image_reference_is_absent() {
        let bg = Background::custom_image("   ", 40);
        assert!(bg.image_ref().is_none());
    }
}
