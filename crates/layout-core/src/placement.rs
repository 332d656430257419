//! Element placement and line breaking on the logical canvas.
//!
//! Positions are resolved against the logical canvas, never the scaled
//! on-screen size. Line breaking happens here so every backend draws the
//! same lines instead of relying on its own text layout.

use nitepost_post_model::{CanvasSize, NormalizedPosition, TextAlign};
use serde::Serialize;

/// Text boxes span this fraction of the canvas width.
pub const TEXT_BOX_WIDTH_RATIO: f64 = 0.8;

/// Average glyph advance as a fraction of the font size.
pub const AVERAGE_GLYPH_ADVANCE: f64 = 0.55;

/// Gap between stacked runs in a section, as a fraction of the next run's size.
pub const RUN_GAP_RATIO: f64 = 0.35;

/// Ascent as a fraction of the font size, for placing baselines.
pub const ASCENT_RATIO: f64 = 0.8;

/// Element centre in logical pixels plus its rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub center_x: f64,
    pub center_y: f64,
    /// Clockwise degrees around the centre. Purely visual.
    pub rotation_deg: f64,
}

/// Resolve a normalized position into logical pixels.
pub fn place_element(
    position: NormalizedPosition,
    rotation_deg: f64,
    canvas: CanvasSize,
) -> Placement {
    Placement {
        center_x: canvas.x_px(position.x),
        center_y: canvas.y_px(position.y),
        rotation_deg,
    }
}

/// Width of a text element's box in logical pixels.
pub fn text_box_width(canvas: CanvasSize) -> f64 {
    canvas.width as f64 * TEXT_BOX_WIDTH_RATIO
}

/// Maximum characters that fit on one line at `font_size`.
pub fn max_chars_per_line(font_size: f64, box_width: f64) -> usize {
    if font_size <= 0.0 || !font_size.is_finite() {
        return 1;
    }
    ((box_width / (font_size * AVERAGE_GLYPH_ADVANCE)).floor() as usize).max(1)
}

/// Break `text` into lines; explicit newlines are kept as hard breaks.
pub fn wrap_lines(text: &str, font_size: f64, box_width: f64) -> Vec<String> {
    let width = max_chars_per_line(font_size, box_width);
    text.lines()
        .flat_map(|paragraph| {
            let paragraph = paragraph.trim_end();
            if paragraph.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(paragraph, width)
                    .into_iter()
                    .map(|line| line.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Horizontal anchor for a line inside a box centred at `center_x`.
pub fn line_anchor_x(alignment: TextAlign, center_x: f64, box_width: f64) -> f64 {
    match alignment {
        TextAlign::Left => center_x - box_width / 2.0,
        TextAlign::Center => center_x,
        TextAlign::Right => center_x + box_width / 2.0,
    }
}

/// Fixed slot for the brand logo: centred at the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogoSlot {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogoSlot {
    pub fn left(&self) -> f64 {
        self.center_x - self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center_y - self.height / 2.0
    }
}

/// Logo slot for a canvas.
pub fn logo_slot(canvas: CanvasSize) -> LogoSlot {
    let width = canvas.width as f64 * 0.25;
    let height = width / 3.0;
    LogoSlot {
        center_x: canvas.width as f64 / 2.0,
        center_y: canvas.height as f64 * 0.06 + height / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nitepost_post_model::PostFormat;

    #[test]
    fn test_place_element_uses_logical_canvas() {
        let p = place_element(
            NormalizedPosition::new(15.0, 15.0),
            0.0,
            PostFormat::Story.canvas(),
        );
        assert!((p.center_x - 162.0).abs() < 1e-9);
        assert!((p.center_y - 288.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_respects_box_and_hard_breaks() {
        let box_width = text_box_width(PostFormat::Square.canvas());
        let lines = wrap_lines("DJ Nova\nMC Echo", 32.0, box_width);
        assert_eq!(lines, vec!["DJ Nova", "MC Echo"]);

        let long = "Saturday night special with resident DJs and guests all night long";
        let wrapped = wrap_lines(long, 72.0, box_width);
        let limit = max_chars_per_line(72.0, box_width);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|line| line.chars().count() <= limit));
    }

    #[test]
    fn test_wrap_empty_text_yields_nothing() {
        assert!(wrap_lines("", 32.0, 800.0).is_empty());
    }

    #[test]
    fn test_max_chars_never_zero() {
        assert_eq!(max_chars_per_line(10_000.0, 100.0), 1);
        assert_eq!(max_chars_per_line(f64::NAN, 100.0), 1);
    }

    #[test]
    fn test_line_anchor_follows_alignment() {
        assert_eq!(line_anchor_x(TextAlign::Left, 540.0, 864.0), 108.0);
        assert_eq!(line_anchor_x(TextAlign::Center, 540.0, 864.0), 540.0);
        assert_eq!(line_anchor_x(TextAlign::Right, 540.0, 864.0), 972.0);
    }

    #[test]
    fn test_logo_slot_is_top_centre() {
        let slot = logo_slot(PostFormat::Square.canvas());
        assert_eq!(slot.center_x, 540.0);
        assert!(slot.top() > 0.0);
        assert!(slot.top() < 1080.0 * 0.1);
    }
}
