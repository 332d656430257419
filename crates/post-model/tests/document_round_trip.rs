use nitepost_post_model::{
    Background, ElementId, NormalizedPosition, PostContent, PostFormat, Section, SectionStyle,
    ShadowSpec, StrokeSpec, TextAlign, TextRole, TextStyle,
};
use proptest::prelude::*;

fn populated_content() -> PostContent {
    let mut content = PostContent::new(PostFormat::Portrait);
    content.set_headline_text("Friday Night");
    content
        .set_position(ElementId::Headline, NormalizedPosition::new(42.0, 18.5))
        .unwrap();
    content.set_rotation(ElementId::Headline, -7.5).unwrap();
    content
        .set_section(
            0,
            Section {
                subheadline: Some("Lineup".to_string()),
                body: Some("DJ Nova\nMC Echo".to_string()),
                position: Some(NormalizedPosition::new(30.0, 60.0)),
                rotation: 3.0,
                z_index: Some(7),
                style: SectionStyle {
                    subheadline: Some(TextStyle::with_color("#ff0080")),
                    body: None,
                },
            },
        )
        .unwrap();
    let second = content.add_section(Section::new("Tickets", "$20 at the door"));
    content.set_rotation(ElementId::Section(second), 15.0).unwrap();
    content.set_background(Background::custom_image("images/crowd.jpg", 45));
    content.set_show_logo(false);
    content.set_text_style(
        TextRole::Headline,
        TextStyle {
            color: Some("#22d3ee".to_string()),
            shadow: Some(ShadowSpec {
                enabled: true,
                offset_x: 4.0,
                offset_y: 6.0,
                blur: 12.0,
                color: "rgba(0,0,0,0.8)".to_string(),
            }),
            stroke: Some(StrokeSpec {
                enabled: true,
                width: 3.0,
                color: "#000".to_string(),
            }),
            alignment: TextAlign::Left,
        },
    );
    content.set_font(TextRole::Body, Some("Inter".to_string()));
    content.set_font_size(TextRole::Subheadline, Some(54.0));
    content.set_z_index(ElementId::Logo, Some(20)).unwrap();
    content
}

#[test]
fn populated_content_round_trips_through_document() {
    let content = populated_content();
    let document = content.to_document().unwrap();
    let restored = PostContent::from_document(document).unwrap();
    assert_eq!(restored, content);
}

#[test]
fn populated_content_round_trips_through_json_text() {
    let content = populated_content();
    let json = content.to_json_pretty().unwrap();
    assert_eq!(PostContent::from_json(&json).unwrap(), content);
}

#[test]
fn document_uses_plain_camel_case_keys() {
    let document = populated_content().to_document().unwrap();
    assert!(document.get("showLogo").is_some());
    assert!(document.get("textStyles").is_some());
    assert!(document.get("fontSizes").is_some());
    assert_eq!(document["background"]["style"], "custom-image");
    assert_eq!(document["format"], "portrait");
}

#[test]
fn switching_format_keeps_percentage_positions() {
    let mut content = populated_content();
    let before: Vec<_> = content
        .element_ids()
        .into_iter()
        .map(|id| content.position_of(id))
        .collect();

    for format in PostFormat::ALL {
        content.set_format(format);
        let after: Vec<_> = content
            .element_ids()
            .into_iter()
            .map(|id| content.position_of(id))
            .collect();
        assert_eq!(after, before);
    }
}

proptest! {
    #[test]
    fn constructed_positions_always_in_bounds(x in -1e6f64..1e6, y in -1e6f64..1e6) {
        let position = NormalizedPosition::new(x, y);
        prop_assert!(position.is_within_bounds());
    }

    #[test]
    fn stored_positions_always_in_bounds(x in -500f64..500.0, y in -500f64..500.0, index in 0usize..4) {
        let mut content = PostContent::default();
        for _ in 0..3 {
            content.add_section(Section::default());
        }
        content.set_position(ElementId::Section(index), NormalizedPosition { x, y }).unwrap();
        for id in content.element_ids() {
            if let Some(position) = content.position_of(id) {
                prop_assert!(position.is_within_bounds());
            }
        }
    }
}
