//! Export a post to PNG.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use nitepost_common::AppConfig;
use nitepost_render_engine::assets::embed_assets;
use nitepost_render_engine::{
    compose_scene_with_brand, render_scene, AssetPolicy, Brand, ExportCoordinator, ExportProgress,
    ExportRequest, FontCatalog, FsAssetResolver, ProgressCallback, Rasterizer, RenderMode,
    Resolution, SvgBackend,
};

use super::read_post;

pub async fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    thumbnail: Option<u32>,
    svg: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("Exporting post at: {}", path.display());

    let content = read_post(&path)?;
    let output_path = output.unwrap_or_else(|| path.with_extension("png"));
    let brand = Brand::from(&config.brand);

    let resolution = match thumbnail {
        Some(max_width) => Resolution::Thumbnail { max_width },
        None => Resolution::Full,
    };
    let (width, height, _) = resolution.dimensions(content.format.canvas());
    println!("  Output: {}", output_path.display());
    println!("  Format: {}", content.format);
    println!("  Resolution: {width}x{height}");

    let fonts = FontCatalog::from_config(&config.render);
    let assets = Arc::new(FsAssetResolver::new(&config.assets_dir));

    if svg {
        let scene = compose_scene_with_brand(&content, RenderMode::Export, &brand);
        let scene = embed_assets(scene, assets.as_ref(), AssetPolicy::Strict)?;
        let svg_path = output_path.with_extension("svg");
        std::fs::write(&svg_path, render_scene(&scene, SvgBackend::with_fonts(&fonts))?)?;
        println!("  SVG scene: {}", svg_path.display());
    }

    let exports = ExportCoordinator::new(assets, Arc::new(Rasterizer::new(fonts)));
    let request = ExportRequest {
        content,
        resolution,
        brand,
    };

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!("\r  Progress: {:>3.0}% ({:?})      ", p.progress * 100.0, p.stage);
        std::io::stdout().flush().ok();
    });

    match exports.export(request, Some(progress_cb)).await {
        Ok(bitmap) => {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, &bitmap.png)?;
            println!(
                "\nExport complete: {} ({}x{}, {} bytes)",
                output_path.display(),
                bitmap.width,
                bitmap.height,
                bitmap.png.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("\nExport failed: {e}");
            Err(e.into())
        }
    }
}
