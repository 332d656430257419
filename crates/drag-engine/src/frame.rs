//! Reference frame geometry and pointer-to-position mapping.

use nitepost_post_model::NormalizedPosition;
use serde::{Deserialize, Serialize};

/// Bounding rectangle of the rendered canvas in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the frame has been laid out with a usable size.
    pub fn is_laid_out(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Client coordinates of a percentage point inside the frame.
    pub fn client_point(&self, x_percent: f64, y_percent: f64) -> (f64, f64) {
        (
            self.left + x_percent / 100.0 * self.width,
            self.top + y_percent / 100.0 * self.height,
        )
    }
}

/// Map a pointer location to a clamped normalized position.
///
/// Returns `None` when the frame is not laid out or the pointer
/// coordinates are not finite, so callers skip the update instead of
/// storing NaN or infinity.
pub fn pointer_to_position(
    frame: &FrameRect,
    client_x: f64,
    client_y: f64,
) -> Option<NormalizedPosition> {
    if !frame.is_laid_out() || !client_x.is_finite() || !client_y.is_finite() {
        return None;
    }
    let x = (client_x - frame.left) / frame.width * 100.0;
    let y = (client_y - frame.top) / frame.height * 100.0;
    Some(NormalizedPosition::new(x, y))
}
