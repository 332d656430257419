//! Asset resolution and embedding.
//!
//! Image references in content are opaque strings: plain paths relative to
//! an assets directory, `file://` URLs, or `data:` URLs. Before a scene is
//! rasterized every reference is resolved to bytes and embedded as a
//! `data:` URL so the SVG document is self-contained.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use nitepost_common::{NiteError, NiteResult};
use nitepost_layout_core::background::{BaseFill, ImageFit};

use crate::scene::Scene;

/// Loads the bytes behind an image reference.
pub trait AssetResolver: Send + Sync + Debug {
    fn resolve(&self, reference: &str) -> NiteResult<Vec<u8>>;

    fn exists(&self, reference: &str) -> bool {
        self.resolve(reference).is_ok()
    }
}

/// What to do when an asset cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetPolicy {
    /// Log a warning and fall back (flat background, wordmark logo).
    Degrade,
    /// Fail the render.
    Strict,
}

/// Resolves references against the local filesystem.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    base_dir: PathBuf,
}

impl FsAssetResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        match reference.strip_prefix("file://") {
            Some(path) => PathBuf::from(path),
            None => {
                let path = Path::new(reference);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.base_dir.join(path)
                }
            }
        }
    }
}

impl AssetResolver for FsAssetResolver {
    fn resolve(&self, reference: &str) -> NiteResult<Vec<u8>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(NiteError::asset(reference, "empty reference"));
        }
        if reference.starts_with("data:") {
            return decode_data_url(reference);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Err(NiteError::asset(
                reference,
                "remote references must be downloaded into the assets directory first",
            ));
        }

        let path = self.path_for(reference);
        tracing::debug!(reference, path = %path.display(), "Resolving asset");
        std::fs::read(&path).map_err(|e| NiteError::asset(reference, format!("{}: {e}", path.display())))
    }
}

/// Pre-populated in-memory assets, keyed by reference.
#[derive(Debug, Default)]
pub struct InMemoryAssetResolver {
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, reference: impl Into<String>, bytes: Vec<u8>) {
        let mut assets = self
            .assets
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        assets.insert(reference.into(), bytes);
    }
}

impl AssetResolver for InMemoryAssetResolver {
    fn resolve(&self, reference: &str) -> NiteResult<Vec<u8>> {
        if reference.starts_with("data:") {
            return decode_data_url(reference);
        }
        let assets = self
            .assets
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        assets
            .get(reference)
            .cloned()
            .ok_or_else(|| NiteError::asset(reference, "not found"))
    }
}

/// Decode a base64 `data:` URL into bytes.
pub fn decode_data_url(url: &str) -> NiteResult<Vec<u8>> {
    let Some((header, payload)) = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
    else {
        return Err(NiteError::asset(truncate(url), "malformed data URL"));
    };
    if !header.ends_with(";base64") {
        return Err(NiteError::asset(
            truncate(url),
            "only base64 data URLs are supported",
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| NiteError::asset(truncate(url), format!("invalid base64 payload: {e}")))
}

/// Encode image bytes as a `data:` URL, sniffing the format.
pub fn to_data_url(reference: &str, bytes: &[u8]) -> NiteResult<String> {
    let format = image::guess_format(bytes)
        .map_err(|e| NiteError::asset(truncate(reference), format!("not a supported image: {e}")))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

fn truncate(reference: &str) -> String {
    const MAX: usize = 64;
    match reference.char_indices().nth(MAX) {
        Some((index, _)) => format!("{}...", &reference[..index]),
        None => reference.to_string(),
    }
}

fn embed(resolver: &dyn AssetResolver, reference: &str) -> NiteResult<String> {
    let bytes = resolver.resolve(reference)?;
    to_data_url(reference, &bytes)
}

/// Replace every image reference in `scene` with an embedded `data:` URL.
///
/// Under [`AssetPolicy::Degrade`] unresolvable images are dropped with a
/// warning; under [`AssetPolicy::Strict`] the first failure is returned.
pub fn embed_assets(
    mut scene: Scene,
    resolver: &dyn AssetResolver,
    policy: AssetPolicy,
) -> NiteResult<Scene> {
    if let Some(reference) = scene.background.image_reference().map(str::to_string) {
        match embed(resolver, &reference) {
            Ok(data_url) => {
                scene.background.base = BaseFill::Image {
                    reference: data_url,
                    fit: ImageFit::Cover,
                };
            }
            Err(e) if policy == AssetPolicy::Degrade => {
                tracing::warn!(error = %e, "Background image unavailable, using flat fill");
                scene.background = scene.background.without_image();
            }
            Err(e) => return Err(e),
        }
    }

    for layer in &mut scene.layers {
        let crate::scene::Layer::Logo(logo) = layer else {
            continue;
        };
        let Some(reference) = logo.image.take() else {
            continue;
        };
        match embed(resolver, &reference) {
            Ok(data_url) => logo.image = Some(data_url),
            Err(e) if policy == AssetPolicy::Degrade => {
                tracing::warn!(error = %e, "Logo image unavailable, using wordmark");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(scene)
}
