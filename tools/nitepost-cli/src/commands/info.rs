//! Show post information.

use std::path::PathBuf;

use nitepost_common::AppConfig;
use nitepost_post_model::{TextRole, DEFAULT_FONT_FAMILY};
use nitepost_render_engine::{compose_scene_with_brand, Brand, RenderMode};

use super::read_post;

pub fn run(path: PathBuf, scene: bool, config: &AppConfig) -> anyhow::Result<()> {
    let content = read_post(&path)?;

    if scene {
        let scene = compose_scene_with_brand(
            &content,
            RenderMode::Export,
            &Brand::from(&config.brand),
        );
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    let canvas = content.format.canvas();
    println!("Post: {}", path.display());
    println!(
        "  Format: {} ({}x{}, preview scale {})",
        content.format,
        canvas.width,
        canvas.height,
        content.format.preview_scale()
    );
    println!("  Background: {}", content.background.style.as_str());
    if let Some(image) = content.background.image_ref() {
        println!(
            "    Image: {image} (overlay {}%)",
            content.background.effective_opacity()
        );
    }
    println!("  Logo: {}", if content.show_logo { "shown" } else { "hidden" });
    println!();

    println!("Typography:");
    for role in TextRole::ALL {
        let family = content
            .fonts
            .get(role)
            .as_deref()
            .unwrap_or(DEFAULT_FONT_FAMILY);
        let size = (*content.font_sizes.get(role))
            .unwrap_or_else(|| content.format.default_font_size(role));
        println!("  {:<12} {family} {size}px", role.as_str());
    }
    println!();

    println!("Elements:");
    for element in content.element_ids() {
        let z = content.z_index_of(element);
        match content.position_of(element) {
            Some(position) => println!(
                "  {:<12} at ({:.1}%, {:.1}%) rotation {}° z {z}",
                element.to_string(),
                position.x,
                position.y,
                content.rotation_of(element),
            ),
            None => println!("  {:<12} fixed slot z {z}", element.to_string()),
        }
    }
    if !content.headline.text.is_empty() {
        println!();
        println!("Headline: {}", content.headline.text);
    }
    for (index, section) in content.sections().iter().enumerate() {
        println!(
            "Section {}: {} / {}",
            index + 1,
            section.subheadline_text().unwrap_or("-"),
            section.body_text().unwrap_or("-").replace('\n', " | ")
        );
    }

    Ok(())
}
