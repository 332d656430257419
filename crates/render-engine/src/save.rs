//! Save workflow and persistence interfaces.
//!
//! Saving is export thumbnail, then upload it, then persist the record.
//! A failed step stops the sequence, so a record never exists without its
//! thumbnail and the caller's in-memory content is never touched. A
//! thumbnail uploaded for a save that then fails or is superseded is
//! deleted again.

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use nitepost_common::{NiteError, NiteResult};
use nitepost_post_model::{PostContent, PostId, PostStatus, SavedPost};

use crate::export::{ExportCoordinator, ExportRequest};
use crate::raster::Bitmap;
use crate::scene::Brand;

/// Default folder for uploaded thumbnails.
pub const THUMBNAIL_FOLDER: &str = "thumbnails";

/// Stores post records and their content documents.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a record; returns it with its identifier.
    ///
    /// `existing` updates that record in place; `None` creates a new one.
    async fn persist(
        &self,
        existing: Option<&PostId>,
        title: &str,
        status: PostStatus,
        content: &PostContent,
        thumbnail_url: &str,
    ) -> NiteResult<SavedPost>;

    /// Fetch a content document by its reference.
    async fn fetch_content(&self, reference: &str) -> NiteResult<PostContent>;
}

/// Stores rendered bitmaps and returns a URL for each.
#[async_trait]
pub trait BitmapStore: Send + Sync {
    async fn upload_bitmap(&self, bitmap: &Bitmap, folder: &str) -> NiteResult<String>;

    /// Remove a bitmap previously returned by [`BitmapStore::upload_bitmap`].
    async fn delete_bitmap(&self, url: &str) -> NiteResult<()>;
}

/// Orchestrates thumbnail export, upload, and persistence.
pub struct SaveCoordinator {
    exports: ExportCoordinator,
    bitmaps: Arc<dyn BitmapStore>,
    posts: Arc<dyn PostStore>,
    thumbnail_width: u32,
    folder: String,
    brand: Brand,
    generation: AtomicU64,
}

impl SaveCoordinator {
    pub fn new(
        exports: ExportCoordinator,
        bitmaps: Arc<dyn BitmapStore>,
        posts: Arc<dyn PostStore>,
    ) -> Self {
        Self {
            exports,
            bitmaps,
            posts,
            thumbnail_width: 400,
            folder: THUMBNAIL_FOLDER.to_string(),
            brand: Brand::default(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = width;
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = brand;
        self
    }

    fn ensure_current(&self, generation: u64, step: &str) -> NiteResult<()> {
        let latest = self.generation.load(Ordering::SeqCst);
        if generation == latest {
            Ok(())
        } else {
            tracing::info!(generation, latest, step, "Save superseded by a newer save");
            Err(NiteError::Superseded { newer: latest })
        }
    }

    /// Remove a thumbnail whose save did not complete. Cleanup failures
    /// are logged, never returned.
    async fn discard_thumbnail(&self, url: &str) {
        match self.bitmaps.delete_bitmap(url).await {
            Ok(()) => tracing::debug!(thumbnail = url, "Discarded unused thumbnail"),
            Err(e) => tracing::warn!(thumbnail = url, error = %e, "Failed to discard unused thumbnail"),
        }
    }

    /// Save `content` under `title`, updating `existing` when given.
    ///
    /// Returns [`NiteError::Superseded`] when a newer save started before
    /// this one reached persistence.
    pub async fn save(
        &self,
        existing: Option<&PostId>,
        title: &str,
        status: PostStatus,
        content: &PostContent,
    ) -> NiteResult<SavedPost> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NiteError::content("A post title is required"));
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            generation,
            title,
            status = ?status,
            existing = existing.map(|id| id.0.as_str()),
            "Saving post"
        );

        let request = ExportRequest::thumbnail(content.clone(), self.thumbnail_width)
            .with_brand(self.brand.clone());
        let bitmap = self.exports.export(request, None).await?;
        self.ensure_current(generation, "export")?;

        let url = self.bitmaps.upload_bitmap(&bitmap, &self.folder).await?;
        if let Err(e) = self.ensure_current(generation, "upload") {
            self.discard_thumbnail(&url).await;
            return Err(e);
        }

        match self
            .posts
            .persist(existing, title, status, content, &url)
            .await
        {
            Ok(saved) => {
                tracing::info!(id = %saved.id, thumbnail = %url, "Post saved");
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisting post failed");
                self.discard_thumbnail(&url).await;
                Err(e)
            }
        }
    }

    /// Re-hydrate content from a stored reference.
    pub async fn load(&self, reference: &str) -> NiteResult<PostContent> {
        tracing::info!(reference, "Loading post content");
        self.posts.fetch_content(reference).await
    }
}

impl std::fmt::Debug for SaveCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveCoordinator")
            .field("thumbnail_width", &self.thumbnail_width)
            .field("folder", &self.folder)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Reject absolute paths and parent traversal in store-relative references.
fn relative_path(reference: &str) -> NiteResult<PathBuf> {
    let path = Path::new(reference);
    let safe = !reference.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if safe {
        Ok(path.to_path_buf())
    } else {
        Err(NiteError::persistence(format!(
            "Invalid store reference: {reference}"
        )))
    }
}

/// Time-seeded identifier in UUID v4 layout.
fn new_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seed = nanos ^ (u128::from(COUNTER.fetch_add(1, Ordering::Relaxed)) << 64);
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFF_FFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 64) & 0x3FFF) | 0x8000) as u16,
        ((seed >> 80) ^ (seed & 0xFFFF_FFFF_FFFF)) & 0xFFFF_FFFF_FFFF,
    )
}

fn absolute(path: &Path) -> NiteResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Post records as JSON files: `<root>/<id>/post.json` and `<root>/<id>/content.json`.
#[derive(Debug, Clone)]
pub struct FsPostStore {
    root: PathBuf,
}

impl FsPostStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Content reference for a post id.
    pub fn content_ref(id: &PostId) -> String {
        format!("{id}/content.json")
    }

    /// Read a stored record by id.
    pub async fn record(&self, id: &PostId) -> NiteResult<SavedPost> {
        let path = self.root.join(relative_path(&id.0)?).join("post.json");
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| NiteError::persistence(format!("{}: {e}", path.display())))?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl PostStore for FsPostStore {
    async fn persist(
        &self,
        existing: Option<&PostId>,
        title: &str,
        status: PostStatus,
        content: &PostContent,
        thumbnail_url: &str,
    ) -> NiteResult<SavedPost> {
        let id = match existing {
            Some(id) => id.clone(),
            None => PostId(new_id()),
        };
        let dir = self.root.join(relative_path(&id.0)?);
        let document = content
            .to_json_pretty()
            .map_err(|e| NiteError::persistence(format!("Failed to serialize content: {e}")))?;

        let saved = SavedPost {
            id: id.clone(),
            title: title.to_string(),
            status,
            content_ref: Self::content_ref(&id),
            thumbnail_ref: Some(thumbnail_url.to_string()),
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        let record = serde_json::to_string_pretty(&saved)?;

        let write = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(dir.join("content.json"), document).await?;
            tokio::fs::write(dir.join("post.json"), record).await
        };
        write
            .await
            .map_err(|e| NiteError::persistence(format!("{}: {e}", dir.display())))?;

        tracing::debug!(id = %id, dir = %dir.display(), "Post record written");
        Ok(saved)
    }

    async fn fetch_content(&self, reference: &str) -> NiteResult<PostContent> {
        let path = self.root.join(relative_path(reference)?);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NiteError::FileNotFound { path })
            }
            Err(e) => return Err(NiteError::persistence(format!("{}: {e}", path.display()))),
        };
        PostContent::from_json(&json).map_err(|e| NiteError::content(e.to_string()))
    }
}

/// PNG files under `<root>/<folder>/`, addressed by `file://` URLs.
#[derive(Debug, Clone)]
pub struct FsBitmapStore {
    root: PathBuf,
}

impl FsBitmapStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BitmapStore for FsBitmapStore {
    async fn upload_bitmap(&self, bitmap: &Bitmap, folder: &str) -> NiteResult<String> {
        let dir = absolute(&self.root.join(relative_path(folder)?))?;
        let path = dir.join(format!("{}.png", new_id()));
        let write = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, &bitmap.png).await
        };
        write
            .await
            .map_err(|e| NiteError::persistence(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), bytes = bitmap.png.len(), "Bitmap stored");
        Ok(format!("file://{}", path.display()))
    }

    async fn delete_bitmap(&self, url: &str) -> NiteResult<()> {
        let path = url
            .strip_prefix("file://")
            .map(PathBuf::from)
            .ok_or_else(|| NiteError::persistence(format!("Not a stored bitmap: {url}")))?;
        let root = absolute(&self.root)?;
        if !path.starts_with(&root) || path.components().any(|c| c == Component::ParentDir) {
            return Err(NiteError::persistence(format!(
                "Bitmap {url} is outside {}",
                root.display()
            )));
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NiteError::persistence(format!("{}: {e}", path.display()))),
        }
    }
}
