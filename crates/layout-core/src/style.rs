//! Style Resolver: turns stored text styles into concrete paint styles.
//!
//! Precedence per field is section override, then the role's `textStyles`
//! entry, then the role default. Defaults live here and nowhere else, so
//! every backend paints the same colours.

use nitepost_post_model::{
    PostContent, SectionStyle, ShadowSpec, StrokeSpec, TextAlign, TextRole, TextStyle,
    DEFAULT_FONT_FAMILY,
};
use serde::Serialize;

use crate::color::Rgba;

/// Brand cyan used for headlines.
pub const HEADLINE_COLOR: Rgba = Rgba::rgb(0x22, 0xd3, 0xee);
/// Brand indigo used for subheadlines.
pub const SUBHEADLINE_COLOR: Rgba = Rgba::rgb(0x63, 0x66, 0xf1);
/// Near-white used for body copy.
pub const BODY_COLOR: Rgba = Rgba::rgb(0xf8, 0xfa, 0xfc);

const DEFAULT_SHADOW_COLOR: Rgba = Rgba::rgba(0, 0, 0, 128);
const MIN_FONT_SIZE: f64 = 8.0;
const MAX_FONT_SIZE: f64 = 400.0;
const MAX_BLUR: f64 = 100.0;
const MAX_STROKE_WIDTH: f64 = 40.0;

/// Concrete drop shadow in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropShadow {
    pub dx: f64,
    pub dy: f64,
    pub blur: f64,
    pub color: Rgba,
}

/// Concrete glyph outline in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outline {
    pub width: f64,
    pub color: Rgba,
}

/// Paint style for one text run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTextStyle {
    pub role: TextRole,
    pub color: Rgba,
    pub shadow: Option<DropShadow>,
    pub stroke: Option<Outline>,
    pub alignment: TextAlign,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    /// Distance between baselines in logical pixels.
    pub line_height: f64,
}

/// Role default colour.
pub fn default_color(role: TextRole) -> Rgba {
    match role {
        TextRole::Headline => HEADLINE_COLOR,
        TextRole::Subheadline => SUBHEADLINE_COLOR,
        TextRole::Body => BODY_COLOR,
    }
}

fn font_weight(role: TextRole) -> u16 {
    match role {
        TextRole::Headline => 800,
        TextRole::Subheadline => 700,
        TextRole::Body => 400,
    }
}

fn line_height_factor(role: TextRole) -> f64 {
    match role {
        TextRole::Headline => 1.1,
        TextRole::Subheadline => 1.2,
        TextRole::Body => 1.4,
    }
}

/// Resolve the paint style for `role`, optionally within a section.
pub fn resolve_text_style(
    content: &PostContent,
    role: TextRole,
    section: Option<&SectionStyle>,
) -> ResolvedTextStyle {
    let base = content.text_styles.get(role);
    let merged = merge(base, section.and_then(|s| s.for_role(role)));

    let color = merged
        .color
        .as_deref()
        .map(|raw| parse_or_default(raw, default_color(role), role, "color"))
        .unwrap_or_else(|| default_color(role));

    let font_family = content
        .fonts
        .get(role)
        .clone()
        .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

    let font_size = (*content.font_sizes.get(role))
        .filter(|size| size.is_finite())
        .map(|size| size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE))
        .unwrap_or_else(|| content.format.default_font_size(role));

    ResolvedTextStyle {
        role,
        color,
        shadow: merged.shadow.as_ref().and_then(|s| resolve_shadow(s, role)),
        stroke: merged.stroke.as_ref().and_then(|s| resolve_stroke(s, role)),
        alignment: merged.alignment,
        font_family,
        font_size,
        font_weight: font_weight(role),
        line_height: font_size * line_height_factor(role),
    }
}

/// Field-wise merge; the override's alignment always wins.
fn merge(base: &TextStyle, over: Option<&TextStyle>) -> TextStyle {
    match over {
        None => base.clone(),
        Some(over) => TextStyle {
            color: over.color.clone().or_else(|| base.color.clone()),
            shadow: over.shadow.clone().or_else(|| base.shadow.clone()),
            stroke: over.stroke.clone().or_else(|| base.stroke.clone()),
            alignment: over.alignment,
        },
    }
}

fn resolve_shadow(spec: &ShadowSpec, role: TextRole) -> Option<DropShadow> {
    if !spec.enabled {
        return None;
    }
    Some(DropShadow {
        dx: finite_or_zero(spec.offset_x),
        dy: finite_or_zero(spec.offset_y),
        blur: finite_or_zero(spec.blur).clamp(0.0, MAX_BLUR),
        color: parse_or_default(&spec.color, DEFAULT_SHADOW_COLOR, role, "shadow color"),
    })
}

fn resolve_stroke(spec: &StrokeSpec, role: TextRole) -> Option<Outline> {
    let width = finite_or_zero(spec.width).min(MAX_STROKE_WIDTH);
    if !spec.enabled || width <= 0.0 {
        return None;
    }
    Some(Outline {
        width,
        color: parse_or_default(&spec.color, Rgba::BLACK, role, "stroke color"),
    })
}

fn parse_or_default(raw: &str, fallback: Rgba, role: TextRole, field: &str) -> Rgba {
    Rgba::parse(raw).unwrap_or_else(|| {
        tracing::warn!(
            role = role.as_str(),
            field,
            value = raw,
            "Unparseable colour, using default"
        );
        fallback
    })
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
