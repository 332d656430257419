//! Interactive preview: content, drag state, and HTML rendering together.

use std::sync::Arc;

use nitepost_common::NiteResult;
use nitepost_drag_engine::{
    ContentSink, DownOutcome, DragController, FrameRect, ListenerRegistry, PointerCapture,
};
use nitepost_post_model::{ElementId, NormalizedPosition, PostContent, PostFormat};

use crate::assets::{embed_assets, AssetPolicy, AssetResolver};
use crate::backend::render_scene;
use crate::html::HtmlBackend;
use crate::scene::{compose_scene_with_brand, Brand, RenderMode};

/// One rendered preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub html: String,
    pub logical_width: u32,
    pub logical_height: u32,
    pub scale: f64,
}

impl PreviewFrame {
    /// On-screen size after scaling.
    pub fn display_size(&self) -> (f64, f64) {
        (
            self.logical_width as f64 * self.scale,
            self.logical_height as f64 * self.scale,
        )
    }
}

/// Owns the editing session for one post.
pub struct PreviewRenderer<C: PointerCapture = ListenerRegistry> {
    content: PostContent,
    drag: DragController<C>,
    mode: RenderMode,
    brand: Brand,
    assets: Option<Arc<dyn AssetResolver>>,
}

impl PreviewRenderer<ListenerRegistry> {
    pub fn new(content: PostContent) -> Self {
        Self::with_capture(content, ListenerRegistry::new())
    }
}

impl<C: PointerCapture> PreviewRenderer<C> {
    pub fn with_capture(content: PostContent, capture: C) -> Self {
        Self {
            content,
            drag: DragController::new(capture),
            mode: RenderMode::Edit,
            brand: Brand::default(),
            assets: None,
        }
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = brand;
        self
    }

    /// Embed images through `assets`; failures degrade to flat fills.
    ///
    /// Without a resolver, image references are passed to the page as-is.
    pub fn with_assets(mut self, assets: Arc<dyn AssetResolver>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switch between edit and read-only. Leaving edit mode ends any drag.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode != RenderMode::Edit {
            self.drag.cancel();
        }
        self.mode = mode;
    }

    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// Replace the content wholesale, e.g. after loading a saved post.
    pub fn replace_content(&mut self, content: PostContent) {
        self.drag.cancel();
        self.content = content;
    }

    pub fn into_content(self) -> PostContent {
        self.content
    }

    pub fn drag(&self) -> &DragController<C> {
        &self.drag
    }

    pub fn scale(&self) -> f64 {
        self.content.format.preview_scale()
    }

    /// Frame rectangle of the rendered canvas when placed at `left, top`.
    pub fn frame_rect(&self, left: f64, top: f64) -> FrameRect {
        let canvas = self.content.format.canvas();
        let scale = self.scale();
        FrameRect::new(
            left,
            top,
            canvas.width as f64 * scale,
            canvas.height as f64 * scale,
        )
    }

    /// Change the format. Stored percentages are kept; an active drag is
    /// cancelled because its frame no longer matches.
    pub fn set_format(&mut self, format: PostFormat) {
        if self.drag.cancel().is_some() {
            tracing::debug!(format = %format, "Format change cancelled active drag");
        }
        self.content.set_format(format);
    }

    pub fn begin_drag(&mut self, element: ElementId, frame: FrameRect) -> DownOutcome {
        if self.mode != RenderMode::Edit {
            tracing::debug!(%element, mode = ?self.mode, "Drag ignored outside edit mode");
            return DownOutcome::NotDraggable;
        }
        if self.content.position_of(element).is_none() {
            return DownOutcome::NotDraggable;
        }
        self.drag.pointer_down(element, frame)
    }

    pub fn drag_to(&mut self, client_x: f64, client_y: f64) -> Option<NormalizedPosition> {
        let mut sink = ContentSink::new(&mut self.content);
        self.drag.pointer_move(client_x, client_y, &mut sink)
    }

    pub fn end_drag(&mut self) -> Option<ElementId> {
        self.drag.pointer_up()
    }

    /// Render the current content at the format's preview scale.
    pub fn render(&self) -> NiteResult<PreviewFrame> {
        let mut scene = compose_scene_with_brand(&self.content, self.mode, &self.brand);
        if let Some(assets) = &self.assets {
            scene = embed_assets(scene, assets.as_ref(), AssetPolicy::Degrade)?;
        }
        let scale = self.scale();
        let html = render_scene(&scene, HtmlBackend::new(scale))?;
        Ok(PreviewFrame {
            html,
            logical_width: scene.canvas.width,
            logical_height: scene.canvas.height,
            scale,
        })
    }
}

impl<C: PointerCapture> std::fmt::Debug for PreviewRenderer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewRenderer")
            .field("format", &self.content.format)
            .field("mode", &self.mode)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryAssetResolver;
    use nitepost_post_model::Background;

    #[test]
    fn test_default_renders_square_frame() {
        let frame = PreviewRenderer::new(PostContent::default()).render().unwrap();
        assert_eq!((frame.logical_width, frame.logical_height), (1080, 1080));
        assert_eq!(frame.scale, 0.40);
        let (w, h) = frame.display_size();
        assert!((w - 432.0).abs() < 1e-9 && (h - 432.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_updates_content_and_preview() {
        let mut preview = PreviewRenderer::new(PostContent::default());
        let frame = preview.frame_rect(0.0, 0.0);
        assert_eq!(preview.begin_drag(ElementId::Headline, frame), DownOutcome::Started);
        for (x, y) in [(0.4, 0.3), (0.25, 0.2), (0.15, 0.15)] {
            preview.drag_to(x * frame.width, y * frame.height);
        }
        assert_eq!(preview.end_drag(), Some(ElementId::Headline));

        let stored = preview.content().position_of(ElementId::Headline).unwrap();
        assert!((stored.x - 15.0).abs() < 1e-9 && (stored.y - 15.0).abs() < 1e-9);
        assert!(preview.render().unwrap().html.contains("left:-270px;top:"));
    }

    #[test]
    fn test_format_switch_cancels_drag_and_keeps_percentages() {
        let mut preview = PreviewRenderer::new(PostContent::default());
        let frame = preview.frame_rect(0.0, 0.0);
        preview.begin_drag(ElementId::Section(0), frame);
        preview.drag_to(frame.width * 0.3, frame.height * 0.7);
        let before = preview.content().position_of(ElementId::Section(0));

        preview.set_format(PostFormat::Story);
        assert!(!preview.drag().is_dragging());
        assert_eq!(preview.drag().capture().active(), 0);
        assert_eq!(preview.content().position_of(ElementId::Section(0)), before);
        assert_eq!(preview.render().unwrap().logical_height, 1920);
    }

    #[test]
    fn test_read_only_mode_blocks_drags() {
        let mut preview = PreviewRenderer::new(PostContent::default());
        preview.set_mode(RenderMode::ReadOnly);
        let frame = preview.frame_rect(0.0, 0.0);
        assert_eq!(
            preview.begin_drag(ElementId::Headline, frame),
            DownOutcome::NotDraggable
        );
    }

    #[test]
    fn test_missing_image_degrades_in_preview() {
        let mut content = PostContent::default();
        content.set_background(Background::custom_image("lost.jpg", 30));
        let preview = PreviewRenderer::new(content).with_assets(Arc::new(InMemoryAssetResolver::new()));
        let frame = preview.render().unwrap();
        assert!(!frame.html.contains("background-image"));
        assert!(frame.html.contains("background-color:#0f0c29"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut content = PostContent::default();
        content.set_headline_text("Twice");
        let preview = PreviewRenderer::new(content);
        assert_eq!(preview.render().unwrap(), preview.render().unwrap());
    }
}
