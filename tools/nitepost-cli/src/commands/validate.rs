//! Validate a post document and the assets it references.

use std::path::PathBuf;

use nitepost_common::AppConfig;
use nitepost_post_model::{Background, BackgroundStyle, TextRole, DEFAULT_FONT_FAMILY};
use nitepost_render_engine::{AssetResolver, FontCatalog, FsAssetResolver};

use super::read_post;

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Validating post at: {}", path.display());

    let content = read_post(&path)?;
    println!("  Format: {}", content.format);
    println!("  Sections: {}", content.sections().len());

    let mut issues = Vec::new();

    if content.headline.text.trim().is_empty() {
        issues.push("Headline is empty".to_string());
    }
    for (index, section) in content.sections().iter().enumerate() {
        if section.is_empty() {
            issues.push(format!("Section {} has no text", index + 1));
        }
    }

    let assets = FsAssetResolver::new(&config.assets_dir);
    issues.extend(background_issue(&content.background, &assets));
    if let Some(logo) = config.brand.logo.as_deref() {
        if !assets.exists(logo) {
            issues.push(format!("Brand logo '{logo}' cannot be resolved"));
        }
    }

    let fonts = FontCatalog::from_config(&config.render);
    for role in TextRole::ALL {
        let family = content
            .fonts
            .get(role)
            .as_deref()
            .unwrap_or(DEFAULT_FONT_FAMILY);
        if !fonts.has_family(family) {
            issues.push(format!(
                "Font '{family}' ({}) is not installed; '{}' will be used",
                role.as_str(),
                fonts.resolve_family(family)
            ));
        }
    }

    if issues.is_empty() {
        println!("\nPost is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. The post may not export as expected.",
            issues.len()
        );
    }

    Ok(())
}

/// Only custom-image backgrounds draw their image, so a leftover reference
/// on a gradient style is not checked.
fn background_issue(background: &Background, assets: &dyn AssetResolver) -> Option<String> {
    match (background.style, background.image_ref()) {
        (BackgroundStyle::CustomImage, None) => {
            Some("custom-image background has no image; it renders flat".to_string())
        }
        (BackgroundStyle::CustomImage, Some(reference)) => assets
            .resolve(reference)
            .err()
            .map(|e| format!("Background image: {e}")),
        _ => None,
    }
}
