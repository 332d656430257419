//! Save a post: export its thumbnail, store it, then persist the record.

use std::path::PathBuf;
use std::sync::Arc;

use nitepost_common::AppConfig;
use nitepost_post_model::{PostId, PostStatus};
use nitepost_render_engine::{
    Brand, ExportCoordinator, FontCatalog, FsAssetResolver, FsBitmapStore, FsPostStore,
    Rasterizer, SaveCoordinator,
};

use super::read_post;

pub async fn run(
    path: PathBuf,
    title: String,
    status: String,
    id: Option<String>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let status: PostStatus = status.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
    let content = read_post(&path)?;

    let exports = ExportCoordinator::new(
        Arc::new(FsAssetResolver::new(&config.assets_dir)),
        Arc::new(Rasterizer::new(FontCatalog::from_config(&config.render))),
    );
    let saver = SaveCoordinator::new(
        exports,
        Arc::new(FsBitmapStore::new(&config.posts_dir)),
        Arc::new(FsPostStore::new(&config.posts_dir)),
    )
    .with_thumbnail_width(config.render.thumbnail_width)
    .with_brand(Brand::from(&config.brand));

    let existing = id.map(PostId);
    match &existing {
        Some(id) => println!("Updating post {id} as \"{}\" from {}", title.trim(), path.display()),
        None => println!("Saving \"{}\" from {}", title.trim(), path.display()),
    }
    let saved = saver.save(existing.as_ref(), &title, status, &content).await?;

    println!("Saved post {}", saved.id);
    println!("  Status: {:?}", saved.status);
    println!("  Content: {}", saved.content_ref);
    if let Some(thumbnail) = &saved.thumbnail_ref {
        println!("  Thumbnail: {thumbnail}");
    }
    Ok(())
}
