//! Render the HTML preview of a post.

use std::path::PathBuf;
use std::sync::Arc;

use nitepost_common::AppConfig;
use nitepost_render_engine::{Brand, FsAssetResolver, PreviewRenderer, RenderMode};

use super::read_post;

pub fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    read_only: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let content = read_post(&path)?;
    let output = output.unwrap_or_else(|| path.with_extension("html"));

    let mut preview = PreviewRenderer::new(content)
        .with_brand(Brand::from(&config.brand))
        .with_assets(Arc::new(FsAssetResolver::new(&config.assets_dir)));
    if read_only {
        preview.set_mode(RenderMode::ReadOnly);
    }

    let frame = preview.render()?;
    let (width, height) = frame.display_size();
    let page = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>NitePost preview</title></head>\n<body style=\"margin:0;padding:24px;background:#111\">\n{}\n</body></html>\n",
        frame.html
    );
    std::fs::write(&output, page)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!("Preview written to {}", output.display());
    println!(
        "  Canvas: {}x{} shown at {width:.0}x{height:.0} (scale {})",
        frame.logical_width, frame.logical_height, frame.scale
    );
    Ok(())
}
