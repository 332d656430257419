//! Interactive DOM/CSS preview backend.

use askama::Template;
use nitepost_common::{NiteError, NiteResult};
use nitepost_layout_core::background::{BaseFill, LinearGradient, Overlay};
use nitepost_layout_core::{BackgroundPaint, Rgba};

use crate::backend::RenderBackend;
use crate::markup::{css_url, family_list, num, plain_text};
use crate::scene::{LogoLayer, RenderMode, Scene, TextBlock, TextRun};

#[derive(Template)]
#[template(path = "preview.html", escape = "html")]
struct PreviewHtml {
    format: &'static str,
    mode: &'static str,
    frame_width: String,
    frame_height: String,
    width: u32,
    height: u32,
    scale: String,
    grab: bool,
    background: Option<HtmlBackground>,
    layers: Vec<HtmlLayer>,
}

#[derive(Debug)]
struct HtmlBackground {
    style: &'static str,
    base: String,
    overlay: String,
}

#[derive(Debug)]
enum HtmlLayer {
    Logo(HtmlLogo),
    Text(HtmlText),
}

#[derive(Debug)]
struct HtmlLogo {
    left: String,
    top: String,
    width: String,
    height: String,
    z_index: i32,
    image: Option<String>,
    wordmark: String,
    family: String,
    font_size: String,
}

#[derive(Debug)]
struct HtmlText {
    element: String,
    left: String,
    top: String,
    width: String,
    height: String,
    z_index: i32,
    rotation: String,
    handle: Option<String>,
    runs: Vec<HtmlRun>,
}

#[derive(Debug)]
struct HtmlRun {
    role: &'static str,
    top: String,
    line_height: String,
    css: String,
    lines: Vec<String>,
}

/// Renders a scene as absolutely positioned HTML on a logical-size frame,
/// scaled down for display.
///
/// Every draggable element carries `data-element` for pointer hit-testing.
#[derive(Debug)]
pub struct HtmlBackend {
    scale: f64,
    mode: RenderMode,
    format: &'static str,
    width: u32,
    height: u32,
    background: Option<HtmlBackground>,
    layers: Vec<HtmlLayer>,
}

impl HtmlBackend {
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale,
            mode: RenderMode::default(),
            format: "",
            width: 0,
            height: 0,
            background: None,
            layers: Vec::new(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

fn run_view(run: &TextRun) -> HtmlRun {
    let style = &run.style;
    let mut css = format!(
        "font-family:{};font-size:{}px;font-weight:{};line-height:{}px;color:{};text-align:{};",
        family_list(&style.font_family),
        num(style.font_size),
        style.font_weight,
        num(style.line_height),
        style.color.css(),
        style.alignment.as_str(),
    );
    if let Some(shadow) = &style.shadow {
        css.push_str(&format!(
            "text-shadow:{}px {}px {}px {};",
            num(shadow.dx),
            num(shadow.dy),
            num(shadow.blur),
            shadow.color.css()
        ));
    }
    if let Some(stroke) = &style.stroke {
        css.push_str(&format!(
            "-webkit-text-stroke:{}px {};paint-order:stroke fill;",
            num(stroke.width),
            stroke.color.css()
        ));
    }
    HtmlRun {
        role: style.role.as_str(),
        top: num(run.offset_y),
        line_height: num(style.line_height),
        css,
        lines: run.lines.iter().map(|line| plain_text(line)).collect(),
    }
}

fn css_gradient(gradient: &LinearGradient) -> String {
    let stops: Vec<String> = gradient
        .stops
        .iter()
        .map(|stop| format!("{} {}%", stop.color.css(), num(stop.offset * 100.0)))
        .collect();
    format!(
        "linear-gradient({}deg, {})",
        num(gradient.angle_deg),
        stops.join(", ")
    )
}

fn css_solid(color: Rgba) -> String {
    format!("background-color:{}", color.css())
}

impl RenderBackend for HtmlBackend {
    type Output = String;

    fn name(&self) -> &str {
        "html"
    }

    fn begin(&mut self, scene: &Scene) -> NiteResult<()> {
        self.mode = scene.mode;
        self.format = scene.format.as_str();
        self.width = scene.canvas.width;
        self.height = scene.canvas.height;
        Ok(())
    }

    fn draw_background(&mut self, paint: &BackgroundPaint) -> NiteResult<()> {
        let base = match &paint.base {
            BaseFill::Gradient(gradient) => format!("background:{}", css_gradient(gradient)),
            BaseFill::Image { reference, .. } => format!(
                "background-image:url('{}');background-size:cover;background-position:center",
                css_url(reference)
            ),
            BaseFill::Solid { color } => css_solid(*color),
        };
        let overlay = match &paint.overlay {
            Overlay::Gradient(gradient) => format!("background:{}", css_gradient(gradient)),
            Overlay::Flat { color } => css_solid(*color),
        };
        self.background = Some(HtmlBackground {
            style: paint.style.as_str(),
            base,
            overlay,
        });
        Ok(())
    }

    fn draw_logo(&mut self, logo: &LogoLayer) -> NiteResult<()> {
        let slot = &logo.slot;
        self.layers.push(HtmlLayer::Logo(HtmlLogo {
            left: num(slot.left()),
            top: num(slot.top()),
            width: num(slot.width),
            height: num(slot.height),
            z_index: logo.z_index,
            image: logo.image.clone(),
            wordmark: plain_text(&logo.wordmark),
            family: family_list(nitepost_post_model::DEFAULT_FONT_FAMILY),
            font_size: num(slot.height * 0.5),
        }));
        Ok(())
    }

    fn draw_text(&mut self, block: &TextBlock) -> NiteResult<()> {
        self.layers.push(HtmlLayer::Text(HtmlText {
            element: block.element.to_string(),
            left: num(block.left()),
            top: num(block.top()),
            width: num(block.box_width),
            height: num(block.height),
            z_index: block.z_index,
            rotation: num(block.placement.rotation_deg),
            handle: block.handle.clone(),
            runs: block.runs.iter().map(run_view).collect(),
        }));
        Ok(())
    }

    fn finish(self) -> NiteResult<String> {
        let (w, h) = (self.width as f64, self.height as f64);
        PreviewHtml {
            format: self.format,
            mode: match self.mode {
                RenderMode::Edit => "edit",
                RenderMode::ReadOnly => "read-only",
                RenderMode::Export => "export",
            },
            frame_width: num(w * self.scale),
            frame_height: num(h * self.scale),
            width: self.width,
            height: self.height,
            scale: num_scale(self.scale),
            grab: self.mode.shows_handles(),
            background: self.background,
            layers: self.layers,
        }
        .render()
        .map_err(|e| NiteError::render(format!("preview template failed: {e}")))
    }
}

/// Preview scales carry up to three significant decimals (e.g. 0.35).
fn num_scale(scale: f64) -> String {
    let text = format!("{:.3}", scale);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::render_scene;
    use crate::scene::{compose_scene, compose_scene_with_brand, Brand};
    use nitepost_post_model::{Background, PostContent, PostFormat, Section, TextRole, TextStyle};

    fn render(content: &PostContent, mode: RenderMode) -> String {
        let scene = compose_scene(content, mode);
        render_scene(&scene, HtmlBackend::new(content.format.preview_scale())).unwrap()
    }

    #[test]
    fn test_frame_uses_logical_size_and_scale() {
        let content = PostContent::new(PostFormat::Story);
        let html = render(&content, RenderMode::Edit);
        assert!(html.contains("width:270px;height:480px"));
        assert!(html.contains("width:1080px;height:1920px;transform:scale(0.25)"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut content = PostContent::default();
        content.set_headline_text("<b>Loud & \"Proud\"");
        content.set_text_style(
            TextRole::Headline,
            TextStyle::with_color("\"><script>alert(1)</script>"),
        );
        let html = render(&content, RenderMode::ReadOnly);
        assert!(html.contains("&lt;b&gt;Loud &amp; &quot;Proud&quot;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_handles_and_hit_targets() {
        let mut content = PostContent::default();
        content.set_headline_text("Hello");
        content.set_section(0, Section::new("Sub", "Body")).unwrap();

        let edit = render(&content, RenderMode::Edit);
        assert!(edit.contains("data-element=\"headline\""));
        assert!(edit.contains("data-element=\"section-0\""));
        assert!(edit.contains(">Section 1</div>"));
        assert!(edit.contains("cursor:grab"));

        let read_only = render(&content, RenderMode::ReadOnly);
        assert!(!read_only.contains("np-handle"));
        assert!(!read_only.contains("cursor:grab"));
    }

    #[test]
    fn test_custom_image_background() {
        let mut content = PostContent::default();
        content.set_background(Background::custom_image("https://cdn.example/bg.jpg", 30));
        let html = render(&content, RenderMode::ReadOnly);
        // Quotes inside the style attribute come out entity-encoded.
        assert!(html.contains("background-image:url(&#"));
        assert!(!html.contains("url('"));
        assert!(html.contains("cdn.example"));
        assert!(html.contains(");background-size:cover"));
        assert!(html.contains("background-color:rgba(0,0,0,0.302)"));
    }

    #[test]
    fn test_wordmark_and_logo_reference_are_escaped() {
        let scene = compose_scene_with_brand(
            &PostContent::default(),
            RenderMode::ReadOnly,
            &Brand {
                wordmark: "<Nite> & Co".to_string(),
                logo: None,
            },
        );
        let html = render_scene(&scene, HtmlBackend::new(0.4)).unwrap();
        assert!(html.contains(">&lt;Nite&gt; &amp; Co</span>"));

        let scene = compose_scene_with_brand(
            &PostContent::default(),
            RenderMode::ReadOnly,
            &Brand {
                wordmark: "Nite".to_string(),
                logo: Some("logo.png\"><script>x</script>".to_string()),
            },
        );
        let html = render_scene(&scene, HtmlBackend::new(0.4)).unwrap();
        assert!(html.contains("src=\"logo.png&quot;&gt;&lt;script&gt;x"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_gradient_background() {
        let html = render(&PostContent::default(), RenderMode::ReadOnly);
        assert!(html.contains("linear-gradient(135deg, #0f0c29 0%, #302b63 50%, #24243e 100%)"));
        assert!(!html.contains("background-image"));
    }
}
