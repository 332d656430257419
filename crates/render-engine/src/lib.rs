//! NitePost Render Engine
//!
//! Draws post content through a single scene description, so the
//! interactive preview and the exported bitmap cannot disagree.
//!
//! # Pipeline Architecture
//!
//! ```text
//! PostContent ──► compose_scene ──► Scene ──┬──► HtmlBackend ──► preview HTML
//!                                           │
//!            AssetResolver ──► embed_assets ┴──► SvgBackend ──► resvg ──► PNG
//!                                                                         │
//!                               SaveCoordinator: upload ◄─────────────────┘
//!                                                  │
//!                                                  ▼
//!                                               persist
//! ```

pub mod assets;
pub mod backend;
pub mod export;
pub mod fonts;
pub mod html;
mod markup;
pub mod preview;
pub mod raster;
pub mod save;
pub mod scene;
pub mod svg;

pub use assets::{AssetPolicy, AssetResolver, FsAssetResolver, InMemoryAssetResolver};
pub use backend::{render_scene, RenderBackend};
pub use export::*;
pub use fonts::FontCatalog;
pub use html::HtmlBackend;
pub use preview::{PreviewFrame, PreviewRenderer};
pub use raster::{Bitmap, RasterBackend, Rasterizer, Resolution};
pub use save::{BitmapStore, FsBitmapStore, FsPostStore, PostStore, SaveCoordinator};
pub use scene::{compose_scene, compose_scene_with_brand, Brand, Layer, RenderMode, Scene};
pub use svg::SvgBackend;
