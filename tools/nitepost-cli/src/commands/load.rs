//! Load a saved post's content document.

use std::path::PathBuf;

use nitepost_common::AppConfig;
use nitepost_render_engine::{FsPostStore, PostStore};

use super::write_post;

pub async fn run(
    reference: String,
    output: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let store = FsPostStore::new(&config.posts_dir);
    let reference = if reference.contains('/') {
        reference
    } else {
        format!("{reference}/content.json")
    };

    let content = store.fetch_content(&reference).await?;
    match output {
        Some(path) => {
            write_post(&path, &content)?;
            println!("Loaded {reference} into {}", path.display());
        }
        None => println!("{}", content.to_json_pretty()?),
    }
    Ok(())
}
