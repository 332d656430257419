//! NitePost Post Model
//!
//! Defines the declarative data contracts for a branded social post:
//! - **Format:** Logical canvas size (square, portrait, story)
//! - **Content:** Headline, sections, background, logo, per-role styling
//! - **Geometry:** Normalized positions and element identifiers
//! - **Saved posts:** References owned by the external persistence layer
//!
//! All positions are stored as percentages of the logical canvas and are
//! clamped to `[10, 90]` when constructed, so stored state is always
//! renderable without re-clamping.

pub mod background;
pub mod content;
pub mod document;
pub mod format;
pub mod geometry;
pub mod saved;
pub mod style;

pub use background::*;
pub use content::*;
pub use document::*;
pub use format::*;
pub use geometry::*;
pub use saved::*;
pub use style::*;
