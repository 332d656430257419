//! Headless raster backend: SVG scene through `resvg` into a PNG bitmap.

use nitepost_common::{NiteError, NiteResult};
use nitepost_layout_core::BackgroundPaint;
use nitepost_post_model::CanvasSize;
use serde::Serialize;

use crate::backend::RenderBackend;
use crate::fonts::FontCatalog;
use crate::scene::{LogoLayer, Scene, TextBlock};
use crate::svg::SvgBackend;

/// Output size of a raster render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The format's full logical size (e.g. 1080x1350).
    #[default]
    Full,
    /// Scaled down to at most `max_width` pixels wide, keeping aspect ratio.
    Thumbnail { max_width: u32 },
}

impl Resolution {
    /// Pixel size and scale factor for `canvas`.
    pub fn dimensions(self, canvas: CanvasSize) -> (u32, u32, f32) {
        match self {
            Resolution::Full => (canvas.width, canvas.height, 1.0),
            Resolution::Thumbnail { max_width } => {
                if max_width == 0 || max_width >= canvas.width {
                    return (canvas.width, canvas.height, 1.0);
                }
                let scale = max_width as f32 / canvas.width as f32;
                let height = ((canvas.height as f32 * scale).round() as u32).max(1);
                (max_width, height, scale)
            }
        }
    }
}

/// An encoded PNG.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

/// Renders SVG scenes to pixels with a shared font database.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    fonts: FontCatalog,
}

impl Rasterizer {
    pub fn new(fonts: FontCatalog) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontCatalog {
        &self.fonts
    }

    /// A backend that draws into this rasterizer at `resolution`.
    pub fn backend(&self, resolution: Resolution) -> RasterBackend<'_> {
        RasterBackend {
            svg: SvgBackend::with_fonts(&self.fonts),
            rasterizer: self,
            resolution,
            canvas: CanvasSize::new(0, 0),
        }
    }

    /// Parse and render `svg` into a pixmap.
    pub fn rasterize(
        &self,
        svg: &str,
        canvas: CanvasSize,
        resolution: Resolution,
    ) -> NiteResult<tiny_skia::Pixmap> {
        let options = usvg::Options {
            fontdb: self.fonts.database(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| NiteError::render(format!("Failed to parse SVG scene: {e}")))?;

        let (width, height, scale) = resolution.dimensions(canvas);
        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            NiteError::render(format!("Failed to allocate {width}x{height} pixmap"))
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap)
    }

    /// Encode a pixmap as PNG.
    pub fn encode(&self, pixmap: &tiny_skia::Pixmap) -> NiteResult<Bitmap> {
        let png = pixmap
            .encode_png()
            .map_err(|e| NiteError::export(format!("Failed to encode PNG: {e}")))?;
        Ok(Bitmap {
            width: pixmap.width(),
            height: pixmap.height(),
            png,
        })
    }
}

/// [`RenderBackend`] that builds the SVG scene and rasterizes it on finish.
pub struct RasterBackend<'a> {
    svg: SvgBackend<'a>,
    rasterizer: &'a Rasterizer,
    resolution: Resolution,
    canvas: CanvasSize,
}

impl RenderBackend for RasterBackend<'_> {
    type Output = Bitmap;

    fn name(&self) -> &str {
        "raster"
    }

    fn begin(&mut self, scene: &Scene) -> NiteResult<()> {
        self.canvas = scene.canvas;
        self.svg.begin(scene)
    }

    fn draw_background(&mut self, paint: &BackgroundPaint) -> NiteResult<()> {
        self.svg.draw_background(paint)
    }

    fn draw_logo(&mut self, logo: &LogoLayer) -> NiteResult<()> {
        self.svg.draw_logo(logo)
    }

    fn draw_text(&mut self, block: &TextBlock) -> NiteResult<()> {
        self.svg.draw_text(block)
    }

    fn finish(self) -> NiteResult<Bitmap> {
        let svg = self.svg.finish()?;
        let pixmap = self.rasterizer.rasterize(&svg, self.canvas, self.resolution)?;
        self.rasterizer.encode(&pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::render_scene;
    use crate::scene::{compose_scene, RenderMode};
    use nitepost_post_model::{PostContent, PostFormat};

    #[test]
    fn test_thumbnail_dimensions_keep_aspect() {
        let canvas = PostFormat::Portrait.canvas();
        assert_eq!(Resolution::Full.dimensions(canvas), (1080, 1350, 1.0));
        let (w, h, _) = Resolution::Thumbnail { max_width: 400 }.dimensions(canvas);
        assert_eq!((w, h), (400, 500));
        let (w, h, s) = Resolution::Thumbnail { max_width: 4000 }.dimensions(canvas);
        assert_eq!((w, h, s), (1080, 1350, 1.0));
    }

    #[test]
    fn test_default_post_rasterizes_at_full_size() {
        let rasterizer = Rasterizer::new(FontCatalog::empty());
        let scene = compose_scene(&PostContent::default(), RenderMode::Export);
        let bitmap = render_scene(&scene, rasterizer.backend(Resolution::Full)).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (1080, 1080));
        assert!(bitmap.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_gradient_pixels_are_painted() {
        let rasterizer = Rasterizer::new(FontCatalog::empty());
        let mut content = PostContent::default();
        content.set_show_logo(false);
        let scene = compose_scene(&content, RenderMode::Export);
        let svg = render_scene(&scene, SvgBackend::new()).unwrap();
        let pixmap = rasterizer
            .rasterize(&svg, scene.canvas, Resolution::Thumbnail { max_width: 108 })
            .unwrap();
        let corner = pixmap.pixel(0, 0).unwrap();
        assert_eq!(corner.alpha(), 255);
        assert!(corner.blue() > corner.green());
    }
}
