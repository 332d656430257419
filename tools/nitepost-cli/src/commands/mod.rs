pub mod config;
pub mod drag;
pub mod export;
pub mod info;
pub mod init;
pub mod load;
pub mod preview;
pub mod save;
pub mod validate;

use std::path::Path;

use nitepost_post_model::{is_legacy_document, PostContent};

/// Read a post document, migrating the legacy layout if needed.
pub fn read_post(path: &Path) -> anyhow::Result<PostContent> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&json)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {e}", path.display()))?;
    if is_legacy_document(&value) {
        tracing::info!(path = %path.display(), "Migrating legacy post document");
    }
    PostContent::from_document(value)
        .map_err(|e| anyhow::anyhow!("Failed to load post {}: {e}", path.display()))
}

/// Write a post document as pretty JSON.
pub fn write_post(path: &Path, content: &PostContent) -> anyhow::Result<()> {
    let json = content.to_json_pretty()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))
}
