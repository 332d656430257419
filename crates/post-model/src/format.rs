//! Output formats and their logical canvas dimensions.

use serde::{Deserialize, Serialize};

use crate::style::{RoleMap, TextRole};

/// Logical canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a percentage along the horizontal axis into logical pixels.
    pub fn x_px(&self, percent: f64) -> f64 {
        percent / 100.0 * self.width as f64
    }

    /// Convert a percentage along the vertical axis into logical pixels.
    pub fn y_px(&self, percent: f64) -> f64 {
        percent / 100.0 * self.height as f64
    }
}

/// Post output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostFormat {
    /// 1:1 feed post.
    #[default]
    Square,
    /// 4:5 feed post.
    Portrait,
    /// 9:16 story.
    Story,
}

impl PostFormat {
    pub const ALL: [PostFormat; 3] = [PostFormat::Square, PostFormat::Portrait, PostFormat::Story];

    /// Logical canvas dimensions for this format.
    pub fn canvas(self) -> CanvasSize {
        match self {
            PostFormat::Square => CanvasSize::new(1080, 1080),
            PostFormat::Portrait => CanvasSize::new(1080, 1350),
            PostFormat::Story => CanvasSize::new(1080, 1920),
        }
    }

    /// Fixed on-screen scale used by the interactive preview.
    pub fn preview_scale(self) -> f64 {
        match self {
            PostFormat::Square => 0.40,
            PostFormat::Portrait => 0.35,
            PostFormat::Story => 0.25,
        }
    }

    /// Default font sizes in logical pixels, per text role.
    pub fn default_font_sizes(self) -> RoleMap<f64> {
        match self {
            PostFormat::Square => RoleMap::new(72.0, 48.0, 32.0),
            PostFormat::Portrait => RoleMap::new(76.0, 50.0, 34.0),
            PostFormat::Story => RoleMap::new(84.0, 56.0, 38.0),
        }
    }

    /// Default font size for a single role.
    pub fn default_font_size(self, role: TextRole) -> f64 {
        *self.default_font_sizes().get(role)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostFormat::Square => "square",
            PostFormat::Portrait => "portrait",
            PostFormat::Story => "story",
        }
    }
}

impl std::str::FromStr for PostFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(PostFormat::Square),
            "portrait" => Ok(PostFormat::Portrait),
            "story" => Ok(PostFormat::Story),
            other => Err(format!(
                "Unknown format: {other}. Use: square, portrait, story"
            )),
        }
    }
}

impl std::fmt::Display for PostFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_dimensions() {
        assert_eq!(PostFormat::Square.canvas(), CanvasSize::new(1080, 1080));
        assert_eq!(PostFormat::Portrait.canvas(), CanvasSize::new(1080, 1350));
        assert_eq!(PostFormat::Story.canvas(), CanvasSize::new(1080, 1920));
    }

    #[test]
    fn test_preview_scales() {
        assert!((PostFormat::Story.preview_scale() - 0.25).abs() < 1e-9);
        assert!((PostFormat::Portrait.preview_scale() - 0.35).abs() < 1e-9);
        assert!((PostFormat::Square.preview_scale() - 0.40).abs() < 1e-9);
    }

    #[test]
    fn test_square_defaults_match_constructor_sizes() {
        let sizes = PostFormat::Square.default_font_sizes();
        assert_eq!(sizes, RoleMap::new(72.0, 48.0, 32.0));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("Story".parse::<PostFormat>().unwrap(), PostFormat::Story);
        assert!("landscape".parse::<PostFormat>().is_err());
    }

    #[test]
    fn test_percent_to_pixels() {
        let canvas = PostFormat::Portrait.canvas();
        assert!((canvas.x_px(50.0) - 540.0).abs() < 1e-9);
        assert!((canvas.y_px(10.0) - 135.0).abs() < 1e-9);
    }
}
