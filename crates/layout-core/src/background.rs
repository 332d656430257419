//! Background Compositor.
//!
//! Every render paints exactly one base fill followed by one overlay:
//!
//! | style           | base fill                 | overlay                       |
//! |-----------------|---------------------------|-------------------------------|
//! | `dark-gradient` | fixed gradient            | fixed legibility gradient     |
//! | `hero-style`    | fixed gradient            | fixed legibility gradient     |
//! | `neon-accent`   | fixed gradient            | fixed legibility gradient     |
//! | `custom-image`  | image, cover-fit, centred | flat black at `opacity`%      |
//!
//! A `custom-image` background without an image paints a flat fallback
//! colour instead of failing.

use nitepost_post_model::{Background, BackgroundStyle, CanvasSize};
use serde::Serialize;

use crate::color::Rgba;

/// Flat colour used when an image background cannot be painted.
pub const FALLBACK_BACKGROUND: Rgba = Rgba::rgb(0x0f, 0x0c, 0x29);

/// A colour stop at `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient using the CSS angle convention (0° points up, 90° right).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearGradient {
    pub angle_deg: f64,
    pub stops: Vec<GradientStop>,
}

/// How an image fills the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to cover the canvas, centred, cropping overflow.
    Cover,
}

/// Bottom-most paint of the background.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseFill {
    Gradient(LinearGradient),
    Image { reference: String, fit: ImageFit },
    Solid { color: Rgba },
}

/// Legibility layer painted over the base fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Gradient(LinearGradient),
    Flat { color: Rgba },
}

/// Paint instructions for the whole background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundPaint {
    pub style: BackgroundStyle,
    pub base: BaseFill,
    pub overlay: Overlay,
}

impl BackgroundPaint {
    /// Image reference to resolve, if the base fill is an image.
    pub fn image_reference(&self) -> Option<&str> {
        match &self.base {
            BaseFill::Image { reference, .. } => Some(reference),
            _ => None,
        }
    }

    /// Replace an image base fill with the flat fallback colour.
    pub fn without_image(&self) -> BackgroundPaint {
        match self.base {
            BaseFill::Image { .. } => BackgroundPaint {
                style: self.style,
                base: BaseFill::Solid {
                    color: FALLBACK_BACKGROUND,
                },
                overlay: self.overlay.clone(),
            },
            _ => self.clone(),
        }
    }
}

const fn stop(offset: f64, color: Rgba) -> GradientStop {
    GradientStop { offset, color }
}

static DARK_GRADIENT: [GradientStop; 3] = [
    stop(0.0, Rgba::rgb(0x0f, 0x0c, 0x29)),
    stop(0.5, Rgba::rgb(0x30, 0x2b, 0x63)),
    stop(1.0, Rgba::rgb(0x24, 0x24, 0x3e)),
];

static HERO_GRADIENT: [GradientStop; 3] = [
    stop(0.0, Rgba::rgb(0x1a, 0x1a, 0x2e)),
    stop(0.5, Rgba::rgb(0x16, 0x21, 0x3e)),
    stop(1.0, Rgba::rgb(0x0f, 0x34, 0x60)),
];

static NEON_GRADIENT: [GradientStop; 3] = [
    stop(0.0, Rgba::rgb(0x12, 0x00, 0x2b)),
    stop(0.55, Rgba::rgb(0x79, 0x28, 0xca)),
    stop(1.0, Rgba::rgb(0xff, 0x00, 0x80)),
];

/// Gradient table entry: (base angle, base stops, overlay bottom alpha %).
fn gradient_table(style: BackgroundStyle) -> Option<(f64, &'static [GradientStop], u8)> {
    match style {
        BackgroundStyle::DarkGradient => Some((135.0, &DARK_GRADIENT, 55)),
        BackgroundStyle::HeroStyle => Some((180.0, &HERO_GRADIENT, 60)),
        BackgroundStyle::NeonAccent => Some((135.0, &NEON_GRADIENT, 45)),
        BackgroundStyle::CustomImage => None,
    }
}

/// Resolve a stored background into paint instructions.
pub fn compose_background(background: &Background) -> BackgroundPaint {
    match gradient_table(background.style) {
        Some((angle_deg, stops, overlay_alpha)) => BackgroundPaint {
            style: background.style,
            base: BaseFill::Gradient(LinearGradient {
                angle_deg,
                stops: stops.to_vec(),
            }),
            overlay: Overlay::Gradient(LinearGradient {
                angle_deg: 180.0,
                stops: vec![
                    stop(0.0, Rgba::TRANSPARENT),
                    stop(1.0, Rgba::black_percent(overlay_alpha)),
                ],
            }),
        },
        None => {
            let overlay = Overlay::Flat {
                color: Rgba::black_percent(background.effective_opacity()),
            };
            let base = match background.image_ref() {
                Some(reference) => BaseFill::Image {
                    reference: reference.to_string(),
                    fit: ImageFit::Cover,
                },
                None => {
                    tracing::debug!("custom-image background without an image, using flat fill");
                    BaseFill::Solid {
                        color: FALLBACK_BACKGROUND,
                    }
                }
            };
            BackgroundPaint {
                style: background.style,
                base,
                overlay,
            }
        }
    }
}

/// Gradient line endpoints in canvas pixels, matching CSS `linear-gradient`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl GradientLine {
    /// The CSS gradient line for `angle_deg` over a `canvas`-sized box.
    ///
    /// The line passes through the centre and is long enough that the
    /// corners perpendicular to it receive the first and last stop.
    pub fn for_canvas(angle_deg: f64, canvas: CanvasSize) -> Self {
        let (w, h) = (canvas.width as f64, canvas.height as f64);
        let theta = angle_deg.to_radians();
        let (sin, cos) = (theta.sin(), theta.cos());
        let half = (w * sin.abs() + h * cos.abs()) / 2.0;
        let (cx, cy) = (w / 2.0, h / 2.0);
        Self {
            x1: round4(cx - sin * half),
            y1: round4(cy + cos * half),
            x2: round4(cx + sin * half),
            y2: round4(cy - cos * half),
        }
    }
}

/// Round to four decimals so output text is stable across platforms.
fn round4(value: f64) -> f64 {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
