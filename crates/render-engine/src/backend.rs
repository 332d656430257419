//! Renderer abstraction.

use nitepost_common::NiteResult;
use nitepost_layout_core::BackgroundPaint;

use crate::scene::{Layer, LogoLayer, Scene, TextBlock};

/// A target that can draw a [`Scene`].
///
/// Backends receive draw calls in paint order: background first, then
/// layers in ascending z. They never see `PostContent` directly.
pub trait RenderBackend {
    type Output;

    /// Backend name for logging.
    fn name(&self) -> &str;

    fn begin(&mut self, scene: &Scene) -> NiteResult<()>;

    fn draw_background(&mut self, paint: &BackgroundPaint) -> NiteResult<()>;

    fn draw_logo(&mut self, logo: &LogoLayer) -> NiteResult<()>;

    fn draw_text(&mut self, block: &TextBlock) -> NiteResult<()>;

    fn finish(self) -> NiteResult<Self::Output>
    where
        Self: Sized;
}

/// Drive `backend` through `scene` in paint order.
pub fn render_scene<B: RenderBackend>(scene: &Scene, mut backend: B) -> NiteResult<B::Output> {
    tracing::debug!(
        backend = backend.name(),
        format = %scene.format,
        mode = ?scene.mode,
        layers = scene.layers.len(),
        "Rendering scene"
    );

    backend.begin(scene)?;
    backend.draw_background(&scene.background)?;
    for layer in &scene.layers {
        match layer {
            Layer::Logo(logo) => backend.draw_logo(logo)?,
            Layer::Text(block) => backend.draw_text(block)?,
        }
    }
    backend.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{compose_scene, RenderMode};
    use nitepost_post_model::{ElementId, PostContent, Section};

    #[derive(Default)]
    struct CallLog(Vec<String>);

    impl RenderBackend for CallLog {
        type Output = Vec<String>;

        fn name(&self) -> &str {
            "call-log"
        }

        fn begin(&mut self, scene: &Scene) -> NiteResult<()> {
            self.0.push(format!("begin {}x{}", scene.canvas.width, scene.canvas.height));
            Ok(())
        }

        fn draw_background(&mut self, _paint: &BackgroundPaint) -> NiteResult<()> {
            self.0.push("background".to_string());
            Ok(())
        }

        fn draw_logo(&mut self, _logo: &LogoLayer) -> NiteResult<()> {
            self.0.push("logo".to_string());
            Ok(())
        }

        fn draw_text(&mut self, block: &TextBlock) -> NiteResult<()> {
            self.0.push(block.element.to_string());
            Ok(())
        }

        fn finish(self) -> NiteResult<Vec<String>> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_background_first_then_z_order() {
        let mut content = PostContent::default();
        content.set_headline_text("Top");
        content.set_section(0, Section::new("Sub", "Body")).unwrap();
        content.set_z_index(ElementId::Headline, Some(99)).unwrap();

        let scene = compose_scene(&content, RenderMode::Export);
        let calls = render_scene(&scene, CallLog::default()).unwrap();
        assert_eq!(
            calls,
            vec!["begin 1080x1080", "background", "logo", "section-0", "headline"]
        );
    }
}
