//! Scene composition: the single description every backend draws.
//!
//! A [`Scene`] is computed from `PostContent` without touching any
//! renderer, so the interactive preview and the exported bitmap are two
//! views of the same data.

use nitepost_layout_core::placement::{ASCENT_RATIO, RUN_GAP_RATIO};
use nitepost_layout_core::{
    compose_background, logo_slot, place_element, resolve_text_style, text_box_width, wrap_lines,
    BackgroundPaint, LogoSlot, Placement, ResolvedTextStyle,
};
use nitepost_post_model::{CanvasSize, ElementId, PostContent, PostFormat, Section, TextRole};
use serde::Serialize;

/// Where the scene is going to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Interactive editing: drag handles are visible.
    #[default]
    Edit,
    /// Static preview.
    ReadOnly,
    /// Headless export.
    Export,
}

impl RenderMode {
    pub fn shows_handles(self) -> bool {
        matches!(self, RenderMode::Edit)
    }
}

/// Brand mark drawn in the logo slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brand {
    pub wordmark: String,
    /// Optional logo image reference; the wordmark is used when absent.
    pub logo: Option<String>,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            wordmark: "NITEPOST".to_string(),
            logo: None,
        }
    }
}

impl From<&nitepost_common::BrandConfig> for Brand {
    fn from(config: &nitepost_common::BrandConfig) -> Self {
        Self {
            wordmark: config.wordmark.clone(),
            logo: config.logo.clone().filter(|l| !l.trim().is_empty()),
        }
    }
}

/// Fixed brand logo layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoLayer {
    pub z_index: i32,
    pub slot: LogoSlot,
    pub wordmark: String,
    pub image: Option<String>,
}

/// One styled run inside a text block (headline, subheadline, or body).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub style: ResolvedTextStyle,
    pub lines: Vec<String>,
    /// Distance from the block top to the run's first line box.
    pub offset_y: f64,
}

impl TextRun {
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.style.line_height
    }

    /// Baseline of `line`, relative to the block top.
    pub fn baseline(&self, line: usize) -> f64 {
        let line_top = self.offset_y + line as f64 * self.style.line_height;
        let half_leading = (self.style.line_height - self.style.font_size) / 2.0;
        line_top + half_leading + self.style.font_size * ASCENT_RATIO
    }
}

/// A positioned text element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub element: ElementId,
    pub z_index: i32,
    pub placement: Placement,
    pub box_width: f64,
    pub height: f64,
    pub runs: Vec<TextRun>,
    /// Drag handle label, only in edit mode.
    pub handle: Option<String>,
}

impl TextBlock {
    pub fn left(&self) -> f64 {
        self.placement.center_x - self.box_width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.placement.center_y - self.height / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Layer {
    Logo(LogoLayer),
    Text(TextBlock),
}

impl Layer {
    pub fn z_index(&self) -> i32 {
        match self {
            Layer::Logo(logo) => logo.z_index,
            Layer::Text(block) => block.z_index,
        }
    }

    pub fn element(&self) -> ElementId {
        match self {
            Layer::Logo(_) => ElementId::Logo,
            Layer::Text(block) => block.element,
        }
    }
}

/// Everything needed to draw one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub format: PostFormat,
    pub canvas: CanvasSize,
    pub mode: RenderMode,
    /// Always painted first, below every layer.
    pub background: BackgroundPaint,
    /// Ascending z-order.
    pub layers: Vec<Layer>,
}

impl Scene {
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Text(block) => Some(block),
            Layer::Logo(_) => None,
        })
    }

    pub fn logo(&self) -> Option<&LogoLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Logo(logo) => Some(logo),
            Layer::Text(_) => None,
        })
    }

    pub fn layer(&self, element: ElementId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.element() == element)
    }
}

/// Compose a scene with the default brand.
pub fn compose_scene(content: &PostContent, mode: RenderMode) -> Scene {
    compose_scene_with_brand(content, mode, &Brand::default())
}

/// Compose a scene for `content`.
pub fn compose_scene_with_brand(content: &PostContent, mode: RenderMode, brand: &Brand) -> Scene {
    let canvas = content.format.canvas();
    let box_width = text_box_width(canvas);
    let mut layers = Vec::with_capacity(content.sections().len() + 2);

    if content.show_logo {
        layers.push(Layer::Logo(LogoLayer {
            z_index: content.z_index_of(ElementId::Logo),
            slot: logo_slot(canvas),
            wordmark: brand.wordmark.clone(),
            image: brand.logo.clone(),
        }));
    }

    let headline = content.headline.text.trim();
    let headline_runs = if headline.is_empty() {
        Vec::new()
    } else {
        vec![(resolve_text_style(content, TextRole::Headline, None), headline)]
    };
    if let Some(block) = text_block(content, ElementId::Headline, headline_runs, box_width, mode) {
        layers.push(Layer::Text(block));
    }

    for (index, section) in content.sections().iter().enumerate() {
        let runs = section_runs(content, section);
        if let Some(block) = text_block(content, ElementId::Section(index), runs, box_width, mode) {
            layers.push(Layer::Text(block));
        }
    }

    // Stable sort keeps slot order for equal z.
    layers.sort_by_key(Layer::z_index);

    Scene {
        format: content.format,
        canvas,
        mode,
        background: compose_background(&content.background),
        layers,
    }
}

fn section_runs<'a>(
    content: &PostContent,
    section: &'a Section,
) -> Vec<(ResolvedTextStyle, &'a str)> {
    let mut runs = Vec::with_capacity(2);
    if let Some(text) = section.subheadline_text() {
        runs.push((
            resolve_text_style(content, TextRole::Subheadline, Some(&section.style)),
            text,
        ));
    }
    if let Some(text) = section.body_text() {
        runs.push((
            resolve_text_style(content, TextRole::Body, Some(&section.style)),
            text,
        ));
    }
    runs
}

fn text_block(
    content: &PostContent,
    element: ElementId,
    runs: Vec<(ResolvedTextStyle, &str)>,
    box_width: f64,
    mode: RenderMode,
) -> Option<TextBlock> {
    // Empty elements stay grabbable while editing, but are not drawn elsewhere.
    if runs.is_empty() && !mode.shows_handles() {
        return None;
    }
    let position = content.position_of(element)?;

    let mut laid_out = Vec::with_capacity(runs.len());
    let mut offset_y = 0.0;
    for (style, text) in runs {
        if !laid_out.is_empty() {
            offset_y += style.font_size * RUN_GAP_RATIO;
        }
        let lines = wrap_lines(text, style.font_size, box_width);
        let run = TextRun {
            style,
            lines,
            offset_y,
        };
        offset_y += run.height();
        laid_out.push(run);
    }

    Some(TextBlock {
        element,
        z_index: content.z_index_of(element),
        placement: place_element(position, content.rotation_of(element), content.format.canvas()),
        box_width,
        height: offset_y,
        runs: laid_out,
        handle: mode.shows_handles().then(|| element.label()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nitepost_post_model::{NormalizedPosition, Section};

    fn two_sections() -> PostContent {
        let mut content = PostContent::default();
        content.set_headline_text("Neon Nights");
        content.set_section(0, Section::new("Lineup", "DJ Nova")).unwrap();
        content.add_section(Section::new("Tickets", "$20"));
        content
    }

    #[test]
    fn test_default_layer_order() {
        let scene = compose_scene(&two_sections(), RenderMode::Export);
        let order: Vec<_> = scene.layers.iter().map(Layer::element).collect();
        assert_eq!(
            order,
            vec![
                ElementId::Logo,
                ElementId::Headline,
                ElementId::Section(0),
                ElementId::Section(1)
            ]
        );
    }

    #[test]
    fn test_explicit_z_index_wins() {
        let mut content = two_sections();
        content.set_z_index(ElementId::Headline, Some(10)).unwrap();
        content.set_z_index(ElementId::Logo, Some(4)).unwrap();
        let scene = compose_scene(&content, RenderMode::Export);
        let order: Vec<_> = scene.layers.iter().map(Layer::element).collect();
        assert_eq!(
            order,
            vec![
                ElementId::Section(0),
                ElementId::Logo,
                ElementId::Section(1),
                ElementId::Headline
            ]
        );
    }

    #[test]
    fn test_handles_only_in_edit_mode() {
        let content = two_sections();
        let edit = compose_scene(&content, RenderMode::Edit);
        assert!(edit.text_blocks().all(|b| b.handle.is_some()));
        let section = edit.layer(ElementId::Section(1)).unwrap();
        match section {
            Layer::Text(block) => assert_eq!(block.handle.as_deref(), Some("Section 2")),
            Layer::Logo(_) => panic!("expected text block"),
        }

        for mode in [RenderMode::ReadOnly, RenderMode::Export] {
            let scene = compose_scene(&content, mode);
            assert!(scene.text_blocks().all(|b| b.handle.is_none()));
        }
    }

    #[test]
    fn test_hidden_logo_is_not_composed() {
        let mut content = two_sections();
        content.set_show_logo(false);
        let scene = compose_scene(&content, RenderMode::Export);
        assert!(scene.logo().is_none());
    }

    #[test]
    fn test_positions_resolve_against_logical_canvas() {
        let mut content = two_sections();
        content
            .set_position(ElementId::Headline, NormalizedPosition::new(15.0, 15.0))
            .unwrap();
        content.set_format(PostFormat::Story);
        let scene = compose_scene(&content, RenderMode::Export);
        assert_eq!((scene.canvas.width, scene.canvas.height), (1080, 1920));
        match scene.layer(ElementId::Headline).unwrap() {
            Layer::Text(block) => {
                assert!((block.placement.center_x - 162.0).abs() < 1e-9);
                assert!((block.placement.center_y - 288.0).abs() < 1e-9);
            }
            Layer::Logo(_) => panic!("expected text block"),
        }
    }

    #[test]
    fn test_section_runs_stack_with_gap() {
        let scene = compose_scene(&two_sections(), RenderMode::Export);
        let Some(Layer::Text(block)) = scene.layer(ElementId::Section(0)) else {
            panic!("missing section layer");
        };
        assert_eq!(block.runs.len(), 2);
        let (sub, body) = (&block.runs[0], &block.runs[1]);
        assert_eq!(sub.style.role, TextRole::Subheadline);
        assert_eq!(body.style.role, TextRole::Body);
        let gap = body.offset_y - sub.height();
        assert!((gap - body.style.font_size * RUN_GAP_RATIO).abs() < 1e-9);
        assert!((block.height - (body.offset_y + body.height())).abs() < 1e-9);
    }

    #[test]
    fn test_empty_headline_kept_only_while_editing() {
        let content = PostContent::default();
        assert!(compose_scene(&content, RenderMode::Export)
            .layer(ElementId::Headline)
            .is_none());
        assert!(compose_scene(&content, RenderMode::Edit)
            .layer(ElementId::Headline)
            .is_some());
    }

    #[test]
    fn test_composition_is_deterministic() {
        let content = two_sections();
        assert_eq!(
            compose_scene(&content, RenderMode::Edit),
            compose_scene(&content, RenderMode::Edit)
        );
    }
}
