//! Headless vector backend.
//!
//! Emits a self-contained SVG document that `usvg` can parse. Image
//! references must already be embedded as `data:` URLs for rasterization;
//! see [`crate::assets::embed_assets`].

use askama::Template;
use nitepost_common::{NiteError, NiteResult};
use nitepost_layout_core::background::{BaseFill, GradientLine, LinearGradient, Overlay};
use nitepost_layout_core::placement::line_anchor_x;
use nitepost_layout_core::{BackgroundPaint, Rgba};
use nitepost_post_model::{CanvasSize, TextAlign};

use crate::backend::RenderBackend;
use crate::fonts::FontCatalog;
use crate::markup::{family_list, num, plain_text};
use crate::scene::{LogoLayer, Scene, TextBlock, TextRun};

#[derive(Template)]
#[template(path = "scene.svg", escape = "html")]
struct SceneSvg {
    width: u32,
    height: u32,
    format: &'static str,
    gradients: Vec<SvgGradient>,
    shadows: Vec<SvgShadow>,
    paints: Vec<SvgPaint>,
    layers: Vec<SvgLayer>,
}

#[derive(Debug)]
struct SvgGradient {
    id: String,
    x1: String,
    y1: String,
    x2: String,
    y2: String,
    stops: Vec<SvgStop>,
}

#[derive(Debug)]
struct SvgStop {
    offset: String,
    color: String,
    opacity: String,
}

#[derive(Debug)]
struct SvgShadow {
    id: String,
    dx: String,
    dy: String,
    deviation: String,
    color: String,
    opacity: String,
}

#[derive(Debug)]
enum SvgPaint {
    Rect(SvgRect),
    Image(SvgImage),
}

#[derive(Debug)]
struct SvgRect {
    fill: String,
    opacity: Option<String>,
}

#[derive(Debug)]
struct SvgImage {
    x: String,
    y: String,
    width: String,
    height: String,
    aspect: &'static str,
    href: String,
}

#[derive(Debug)]
enum SvgLayer {
    LogoImage(SvgImage),
    Wordmark(SvgWordmark),
    Text(SvgGroup),
}

#[derive(Debug)]
struct SvgWordmark {
    x: String,
    y: String,
    family: String,
    size: String,
    spacing: String,
    text: String,
}

#[derive(Debug)]
struct SvgGroup {
    element: String,
    transform: Option<String>,
    runs: Vec<SvgRun>,
}

#[derive(Debug)]
struct SvgRun {
    family: String,
    size: String,
    weight: u16,
    fill: String,
    fill_opacity: String,
    anchor: &'static str,
    stroke: Option<SvgStroke>,
    filter: Option<String>,
    lines: Vec<SvgLine>,
}

#[derive(Debug)]
struct SvgStroke {
    color: String,
    opacity: String,
    width: String,
}

#[derive(Debug)]
struct SvgLine {
    x: String,
    y: String,
    text: String,
}

/// Collects draw calls into a `scene.svg` template; text and attribute
/// values go through the template's HTML escaper.
#[derive(Debug)]
pub struct SvgBackend<'a> {
    canvas: CanvasSize,
    format: &'static str,
    fonts: Option<&'a FontCatalog>,
    next_id: usize,
    gradients: Vec<SvgGradient>,
    shadows: Vec<SvgShadow>,
    paints: Vec<SvgPaint>,
    layers: Vec<SvgLayer>,
}

impl Default for SvgBackend<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SvgBackend<'a> {
    pub fn new() -> Self {
        Self {
            canvas: CanvasSize::new(0, 0),
            format: "",
            fonts: None,
            next_id: 0,
            gradients: Vec::new(),
            shadows: Vec::new(),
            paints: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Resolve font families against `fonts` so missing faces fall back
    /// predictably instead of at the rasterizer's discretion.
    pub fn with_fonts(fonts: &'a FontCatalog) -> Self {
        Self {
            fonts: Some(fonts),
            ..Self::new()
        }
    }

    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn family(&self, requested: &str) -> String {
        match self.fonts {
            Some(fonts) => family_list(&fonts.resolve_family(requested)),
            None => family_list(requested),
        }
    }

    /// Register a gradient definition and return a rect painted with it.
    fn gradient_rect(&mut self, gradient: &LinearGradient) -> SvgPaint {
        let id = self.id("gradient");
        let line = GradientLine::for_canvas(gradient.angle_deg, self.canvas);
        self.gradients.push(SvgGradient {
            id: id.clone(),
            x1: num(line.x1),
            y1: num(line.y1),
            x2: num(line.x2),
            y2: num(line.y2),
            stops: gradient
                .stops
                .iter()
                .map(|stop| SvgStop {
                    offset: num(stop.offset),
                    color: stop.color.hex(),
                    opacity: opacity(stop.color),
                })
                .collect(),
        });
        SvgPaint::Rect(SvgRect {
            fill: format!("url(#{id})"),
            opacity: None,
        })
    }

    fn run(&mut self, block: &TextBlock, run: &TextRun) -> SvgRun {
        let style = &run.style;
        let filter = style.shadow.as_ref().map(|shadow| {
            let id = self.id("shadow");
            self.shadows.push(SvgShadow {
                id: id.clone(),
                dx: num(shadow.dx),
                dy: num(shadow.dy),
                deviation: num(shadow.blur / 2.0),
                color: shadow.color.hex(),
                opacity: opacity(shadow.color),
            });
            id
        });
        let anchor = match style.alignment {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let x = num(line_anchor_x(
            style.alignment,
            block.placement.center_x,
            block.box_width,
        ));
        let lines = run
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(index, line)| SvgLine {
                x: x.clone(),
                y: num(block.top() + run.baseline(index)),
                text: plain_text(line),
            })
            .collect();

        SvgRun {
            family: self.family(&style.font_family),
            size: num(style.font_size),
            weight: style.font_weight,
            fill: style.color.hex(),
            fill_opacity: opacity(style.color),
            anchor,
            stroke: style.stroke.as_ref().map(|outline| SvgStroke {
                color: outline.color.hex(),
                opacity: opacity(outline.color),
                width: num(outline.width),
            }),
            filter,
            lines,
        }
    }
}

fn opacity(color: Rgba) -> String {
    nitepost_layout_core::color::format_alpha(color.alpha())
}

fn flat(color: Rgba) -> SvgPaint {
    SvgPaint::Rect(SvgRect {
        fill: color.hex(),
        opacity: Some(opacity(color)),
    })
}

impl RenderBackend for SvgBackend<'_> {
    type Output = String;

    fn name(&self) -> &str {
        "svg"
    }

    fn begin(&mut self, scene: &Scene) -> NiteResult<()> {
        self.canvas = scene.canvas;
        self.format = scene.format.as_str();
        Ok(())
    }

    fn draw_background(&mut self, paint: &BackgroundPaint) -> NiteResult<()> {
        let base = match &paint.base {
            BaseFill::Gradient(gradient) => self.gradient_rect(gradient),
            BaseFill::Image { reference, .. } => SvgPaint::Image(SvgImage {
                x: "0".to_string(),
                y: "0".to_string(),
                width: self.canvas.width.to_string(),
                height: self.canvas.height.to_string(),
                aspect: "xMidYMid slice",
                href: reference.clone(),
            }),
            BaseFill::Solid { color } => flat(*color),
        };
        self.paints.push(base);
        let overlay = match &paint.overlay {
            Overlay::Gradient(gradient) => self.gradient_rect(gradient),
            Overlay::Flat { color } => flat(*color),
        };
        self.paints.push(overlay);
        Ok(())
    }

    fn draw_logo(&mut self, logo: &LogoLayer) -> NiteResult<()> {
        let slot = &logo.slot;
        let layer = match &logo.image {
            Some(image) => SvgLayer::LogoImage(SvgImage {
                x: num(slot.left()),
                y: num(slot.top()),
                width: num(slot.width),
                height: num(slot.height),
                aspect: "xMidYMid meet",
                href: image.clone(),
            }),
            None => {
                let size = slot.height * 0.5;
                SvgLayer::Wordmark(SvgWordmark {
                    x: num(slot.center_x),
                    y: num(slot.center_y + size * 0.35),
                    family: self.family(nitepost_post_model::DEFAULT_FONT_FAMILY),
                    size: num(size),
                    spacing: num(size * 0.2),
                    text: plain_text(&logo.wordmark),
                })
            }
        };
        self.layers.push(layer);
        Ok(())
    }

    fn draw_text(&mut self, block: &TextBlock) -> NiteResult<()> {
        let rotation = block.placement.rotation_deg;
        let transform = (rotation != 0.0).then(|| {
            format!(
                "rotate({} {} {})",
                num(rotation),
                num(block.placement.center_x),
                num(block.placement.center_y)
            )
        });
        let runs = block.runs.iter().map(|run| self.run(block, run)).collect();
        self.layers.push(SvgLayer::Text(SvgGroup {
            element: block.element.to_string(),
            transform,
            runs,
        }));
        Ok(())
    }

    fn finish(self) -> NiteResult<String> {
        SceneSvg {
            width: self.canvas.width,
            height: self.canvas.height,
            format: self.format,
            gradients: self.gradients,
            shadows: self.shadows,
            paints: self.paints,
            layers: self.layers,
        }
        .render()
        .map_err(|e| NiteError::render(format!("SVG template failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::render_scene;
    use crate::scene::{compose_scene, compose_scene_with_brand, Brand, RenderMode};
    use nitepost_post_model::{
        Background, BackgroundStyle, ElementId, PostContent, Section, ShadowSpec, StrokeSpec,
        TextRole, TextStyle,
    };

    fn svg(content: &PostContent) -> String {
        render_scene(&compose_scene(content, RenderMode::Export), SvgBackend::new()).unwrap()
    }

    #[test]
    fn test_custom_image_has_single_image_and_flat_overlay() {
        let mut content = PostContent::default();
        content.set_background(Background::custom_image("data:image/png;base64,AAAA", 30));
        let out = svg(&content);
        assert_eq!(out.matches("<image ").count(), 1);
        assert!(out.contains("preserveAspectRatio=\"xMidYMid slice\""));
        assert!(out.contains("fill=\"#000000\" fill-opacity=\"0.302\""));
        assert!(!out.contains("<linearGradient"));
    }

    #[test]
    fn test_gradient_styles_have_no_image() {
        for style in [
            BackgroundStyle::DarkGradient,
            BackgroundStyle::HeroStyle,
            BackgroundStyle::NeonAccent,
        ] {
            let mut content = PostContent::default();
            content.set_show_logo(false);
            content.set_background(Background::gradient(style));
            let out = svg(&content);
            assert_eq!(out.matches("<linearGradient").count(), 2, "{style:?}");
            assert!(!out.contains("<image"), "{style:?}");
        }
    }

    #[test]
    fn test_shadow_stroke_and_rotation() {
        let mut content = PostContent::default();
        content.set_headline_text("Spin");
        content.set_rotation(ElementId::Headline, 15.0).unwrap();
        content.set_text_style(
            TextRole::Headline,
            TextStyle {
                shadow: Some(ShadowSpec {
                    enabled: true,
                    ..ShadowSpec::default()
                }),
                stroke: Some(StrokeSpec {
                    enabled: true,
                    ..StrokeSpec::default()
                }),
                ..TextStyle::default()
            },
        );
        let out = svg(&content);
        assert!(out.contains("<feDropShadow dx=\"2\" dy=\"2\" stdDeviation=\"2\""));
        assert!(out.contains("paint-order=\"stroke\""));
        assert!(out.contains("transform=\"rotate(15 540 270)\""));
    }

    #[test]
    fn test_text_is_escaped_and_wrapped() {
        let mut content = PostContent::default();
        content
            .set_section(0, Section::new("A & B", "line one\nline <two>"))
            .unwrap();
        let out = svg(&content);
        assert!(out.contains(">A &amp; B</text>"));
        assert!(out.contains(">line &lt;two&gt;</text>"));
        assert_eq!(out.matches("xml:space").count(), 3);
    }

    #[test]
    fn test_brand_values_are_escaped_in_attributes_and_text() {
        let scene = compose_scene_with_brand(
            &PostContent::default(),
            RenderMode::Export,
            &Brand {
                wordmark: "Tom & Jerry's".to_string(),
                logo: None,
            },
        );
        let out = render_scene(&scene, SvgBackend::new()).unwrap();
        assert!(out.contains(">Tom &amp; Jerry"));
        assert!(!out.contains("Jerry's"));

        let scene = compose_scene_with_brand(
            &PostContent::default(),
            RenderMode::Export,
            &Brand {
                wordmark: "NITE".to_string(),
                logo: Some("logo.png\" onload=\"alert(1)".to_string()),
            },
        );
        let out = render_scene(&scene, SvgBackend::new()).unwrap();
        assert!(out.contains("logo.png&quot; onload=&quot;alert(1)"));
        assert!(!out.contains("\" onload="));
    }

    #[test]
    fn test_control_characters_never_reach_the_document() {
        let mut content = PostContent::default();
        content.set_headline_text("Bell\u{7} ringer");
        let out = svg(&content);
        assert!(!out.contains('\u{7}'));
        assert!(out.contains(">Bell ringer</text>"));
    }

    #[test]
    fn test_output_is_stable() {
        let mut content = PostContent::default();
        content.set_headline_text("Same every time");
        assert_eq!(svg(&content), svg(&content));
    }
}
