//! NitePost Layout Core
//!
//! Turns declarative post content into concrete paint instructions:
//! - **Style Resolver:** Merges per-role and per-section overrides with
//!   format-aware defaults
//! - **Background Compositor:** Maps a background treatment to a base fill
//!   plus a legibility overlay
//! - **Placement:** Resolves normalized positions against the logical canvas
//!   and breaks text into lines
//!
//! This crate is pure computation: no I/O, no rendering backends. Every
//! renderer consumes the same outputs, so preview and export cannot drift.

pub mod background;
pub mod color;
pub mod placement;
pub mod style;

pub use background::{compose_background, BackgroundPaint, BaseFill, GradientLine, Overlay};
pub use color::Rgba;
pub use placement::{logo_slot, place_element, text_box_width, wrap_lines, LogoSlot, Placement};
pub use style::{resolve_text_style, DropShadow, Outline, ResolvedTextStyle};
