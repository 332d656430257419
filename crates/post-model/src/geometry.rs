//! Normalized positions and element identifiers.
//!
//! Positions are percentages of the logical canvas. `(50, 50)` is the
//! centre; every stored coordinate lies in `[POSITION_MIN, POSITION_MAX]`.

use serde::{Deserialize, Serialize};

/// Lowest allowed coordinate (percent).
pub const POSITION_MIN: f64 = 10.0;
/// Highest allowed coordinate (percent).
pub const POSITION_MAX: f64 = 90.0;

/// Element centre as a percentage of the logical canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPosition")]
pub struct NormalizedPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
}

impl From<RawPosition> for NormalizedPosition {
    fn from(raw: RawPosition) -> Self {
        NormalizedPosition::new(raw.x, raw.y)
    }
}

impl NormalizedPosition {
    pub const CENTER: NormalizedPosition = NormalizedPosition { x: 50.0, y: 50.0 };

    /// Create a position, clamping both axes to `[10, 90]`.
    ///
    /// Non-finite input collapses to the centre of the axis.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// Whether both axes already satisfy the stored-state bounds.
    pub fn is_within_bounds(&self) -> bool {
        (POSITION_MIN..=POSITION_MAX).contains(&self.x)
            && (POSITION_MIN..=POSITION_MAX).contains(&self.y)
    }
}

impl Default for NormalizedPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(POSITION_MIN, POSITION_MAX)
    } else {
        50.0
    }
}

/// Identifier of a positionable element on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementId {
    Logo,
    Headline,
    Section(usize),
}

impl ElementId {
    /// Whether the drag engine may move this element.
    pub fn is_draggable(&self) -> bool {
        !matches!(self, ElementId::Logo)
    }

    /// Human-readable label shown on drag handles.
    pub fn label(&self) -> String {
        match self {
            ElementId::Logo => "Logo".to_string(),
            ElementId::Headline => "Headline".to_string(),
            ElementId::Section(index) => format!("Section {}", index + 1),
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementId::Logo => f.write_str("logo"),
            ElementId::Headline => f.write_str("headline"),
            ElementId::Section(index) => write!(f, "section-{index}"),
        }
    }
}

impl std::str::FromStr for ElementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logo" => Ok(ElementId::Logo),
            "headline" => Ok(ElementId::Headline),
            other => other
                .strip_prefix("section-")
                .and_then(|index| index.parse::<usize>().ok())
                .map(ElementId::Section)
                .ok_or_else(|| format!("Unknown element id: {other}")),
        }
    }
}

impl TryFrom<String> for ElementId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.to_string()
    }
}
