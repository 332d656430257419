use nitepost_layout_core::placement::max_chars_per_line;
use nitepost_layout_core::{
    compose_background, resolve_text_style, text_box_width, wrap_lines, BaseFill, GradientLine,
    Overlay, Rgba,
};
use nitepost_post_model::{
    Background, BackgroundStyle, PostContent, PostFormat, TextRole, TextStyle,
};
use proptest::prelude::*;

#[test]
fn gradient_backgrounds_serialize_with_tagged_fills() {
    let paint = compose_background(&Background::gradient(BackgroundStyle::DarkGradient));
    let value = serde_json::to_value(&paint).unwrap();

    assert_eq!(value["style"], "dark-gradient");
    assert_eq!(value["base"]["kind"], "gradient");
    assert_eq!(value["base"]["angle_deg"], 135.0);
    assert_eq!(value["base"]["stops"].as_array().unwrap().len(), 3);
    assert_eq!(value["overlay"]["kind"], "gradient");
    assert_eq!(value["overlay"]["stops"][1]["color"]["a"], 140);
}

#[test]
fn custom_image_background_serializes_image_and_flat_overlay() {
    let paint = compose_background(&Background::custom_image("bg/night.jpg", 45));
    let value = serde_json::to_value(&paint).unwrap();

    assert_eq!(value["base"]["kind"], "image");
    assert_eq!(value["base"]["reference"], "bg/night.jpg");
    assert_eq!(value["base"]["fit"], "cover");
    assert_eq!(value["overlay"]["kind"], "flat");
    assert_eq!(paint.image_reference(), Some("bg/night.jpg"));
}

#[test]
fn every_style_paints_one_base_and_one_overlay() {
    for style in [
        BackgroundStyle::DarkGradient,
        BackgroundStyle::HeroStyle,
        BackgroundStyle::NeonAccent,
        BackgroundStyle::CustomImage,
    ] {
        let paint = compose_background(&Background::gradient(style));
        match (&paint.base, &paint.overlay) {
            (BaseFill::Gradient(_), Overlay::Gradient(_)) => {
                assert_ne!(style, BackgroundStyle::CustomImage)
            }
            (BaseFill::Solid { .. }, Overlay::Flat { .. }) => {
                assert_eq!(style, BackgroundStyle::CustomImage)
            }
            other => panic!("unexpected paint for {style:?}: {other:?}"),
        }
    }
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let canvas = PostFormat::Square.canvas();
    let line = GradientLine::for_canvas(180.0, canvas);
    assert_eq!((line.x1, line.y1, line.x2, line.y2), (540.0, 0.0, 540.0, 1080.0));

    let line = GradientLine::for_canvas(90.0, canvas);
    assert_eq!((line.x1, line.y1, line.x2, line.y2), (0.0, 540.0, 1080.0, 540.0));
}

#[test]
fn story_headline_uses_format_default_size() {
    let content = PostContent::new(PostFormat::Story);
    let style = resolve_text_style(&content, TextRole::Headline, None);
    assert_eq!(
        style.font_size,
        PostFormat::Story.default_font_size(TextRole::Headline)
    );
    assert!(style.line_height > style.font_size);
}

#[test]
fn unparseable_colour_falls_back_to_role_default() {
    let mut content = PostContent::new(PostFormat::Square);
    content.set_text_style(TextRole::Body, TextStyle::with_color("not-a-colour"));
    let style = resolve_text_style(&content, TextRole::Body, None);
    let default = resolve_text_style(&PostContent::new(PostFormat::Square), TextRole::Body, None);
    assert_eq!(style.color, default.color);
    assert_ne!(style.color, Rgba::TRANSPARENT);
}

proptest! {
    #[test]
    fn wrapped_lines_fit_the_text_box(
        words in proptest::collection::vec("[a-z]{1,8}", 1..40),
        font_size in 12.0f64..120.0,
    ) {
        let text = words.join(" ");
        let box_width = text_box_width(PostFormat::Portrait.canvas());
        let limit = max_chars_per_line(font_size, box_width);
        for line in wrap_lines(&text, font_size, box_width) {
            prop_assert!(line.chars().count() <= limit.max(8));
        }
    }

    #[test]
    fn wrapping_keeps_every_word(
        words in proptest::collection::vec("[a-z]{1,8}", 1..40),
        font_size in 12.0f64..120.0,
    ) {
        let text = words.join(" ");
        let lines = wrap_lines(&text, font_size, 864.0);
        let rejoined: Vec<String> = lines
            .iter()
            .flat_map(|line| line.split_whitespace().map(str::to_string))
            .collect();
        prop_assert_eq!(rejoined, words);
    }

    #[test]
    fn font_size_overrides_are_clamped(size in -1000.0f64..5000.0) {
        let mut content = PostContent::new(PostFormat::Square);
        content.set_font_size(TextRole::Body, Some(size));
        let style = resolve_text_style(&content, TextRole::Body, None);
        prop_assert!((8.0..=400.0).contains(&style.font_size));
    }
}
