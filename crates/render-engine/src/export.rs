//! Export configuration and job management.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use nitepost_common::{NiteError, NiteResult};
use nitepost_post_model::PostContent;
use tokio::task::{AbortHandle, JoinHandle};

use crate::assets::{embed_assets, AssetPolicy, AssetResolver};
use crate::backend::render_scene;
use crate::raster::{Bitmap, Rasterizer, Resolution};
use crate::scene::{compose_scene_with_brand, Brand, RenderMode};
use crate::svg::SvgBackend;

/// A snapshot of content to rasterize.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub content: PostContent,
    pub resolution: Resolution,
    pub brand: Brand,
}

impl ExportRequest {
    pub fn full(content: PostContent) -> Self {
        Self {
            content,
            resolution: Resolution::Full,
            brand: Brand::default(),
        }
    }

    pub fn thumbnail(content: PostContent, max_width: u32) -> Self {
        Self {
            content,
            resolution: Resolution::Thumbnail { max_width },
            brand: Brand::default(),
        }
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = brand;
        self
    }
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Resolving,
    Rendering,
    Encoding,
    Complete,
    Failed,
}

fn report(progress: Option<&ProgressCallback>, stage: ExportStage, fraction: f64) {
    if let Some(cb) = progress {
        cb(ExportProgress {
            progress: fraction,
            stage,
        });
    }
}

/// Rasterize `request` synchronously.
///
/// Unresolvable images fail the export instead of producing a bitmap with
/// a missing background.
pub fn export_bitmap(
    request: &ExportRequest,
    assets: &dyn AssetResolver,
    rasterizer: &Rasterizer,
) -> NiteResult<Bitmap> {
    export_bitmap_with_progress(request, assets, rasterizer, None)
}

/// [`export_bitmap`] with stage reporting.
pub fn export_bitmap_with_progress(
    request: &ExportRequest,
    assets: &dyn AssetResolver,
    rasterizer: &Rasterizer,
    progress: Option<&ProgressCallback>,
) -> NiteResult<Bitmap> {
    let result = run_export(request, assets, rasterizer, progress);
    match &result {
        Ok(bitmap) => {
            tracing::info!(
                width = bitmap.width,
                height = bitmap.height,
                bytes = bitmap.png.len(),
                "Export complete"
            );
            report(progress, ExportStage::Complete, 1.0);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Export failed");
            report(progress, ExportStage::Failed, 1.0);
        }
    }
    result
}

fn run_export(
    request: &ExportRequest,
    assets: &dyn AssetResolver,
    rasterizer: &Rasterizer,
    progress: Option<&ProgressCallback>,
) -> NiteResult<Bitmap> {
    tracing::info!(
        format = %request.content.format,
        resolution = ?request.resolution,
        "Starting export"
    );

    report(progress, ExportStage::Preparing, 0.0);
    let scene = compose_scene_with_brand(&request.content, RenderMode::Export, &request.brand);

    report(progress, ExportStage::Resolving, 0.2);
    let scene = embed_assets(scene, assets, AssetPolicy::Strict)?;

    report(progress, ExportStage::Rendering, 0.4);
    let svg = render_scene(&scene, SvgBackend::with_fonts(rasterizer.fonts()))?;
    let pixmap = rasterizer.rasterize(&svg, scene.canvas, request.resolution)?;

    report(progress, ExportStage::Encoding, 0.8);
    rasterizer.encode(&pixmap)
}

/// An in-flight export.
#[derive(Debug)]
pub struct ExportTicket {
    generation: u64,
    handle: JoinHandle<NiteResult<Bitmap>>,
}

impl ExportTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Runs exports off the async runtime with latest-wins semantics.
///
/// Each [`request`](Self::request) supersedes every earlier one: the
/// previous task is aborted if it has not started, and its ticket resolves
/// to [`NiteError::Superseded`] instead of a stale bitmap.
pub struct ExportCoordinator {
    assets: Arc<dyn AssetResolver>,
    rasterizer: Arc<Rasterizer>,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl ExportCoordinator {
    pub fn new(assets: Arc<dyn AssetResolver>, rasterizer: Arc<Rasterizer>) -> Self {
        Self {
            assets,
            rasterizer,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Start an export. Must be called from within a Tokio runtime.
    pub fn request(
        &self,
        request: ExportRequest,
        progress: Option<ProgressCallback>,
    ) -> ExportTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let assets = Arc::clone(&self.assets);
        let rasterizer = Arc::clone(&self.rasterizer);

        let handle = tokio::task::spawn_blocking(move || {
            export_bitmap_with_progress(&request, assets.as_ref(), &rasterizer, progress.as_ref())
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = in_flight.replace(handle.abort_handle()) {
            if !previous.is_finished() {
                tracing::debug!(generation, "Aborting superseded export");
                previous.abort();
            }
        }

        ExportTicket { generation, handle }
    }

    /// Await a ticket. Stale results are reported as superseded.
    pub async fn finish(&self, ticket: ExportTicket) -> NiteResult<Bitmap> {
        let joined = ticket.handle.await;
        let latest = self.latest_generation();
        if ticket.generation != latest {
            tracing::debug!(
                generation = ticket.generation,
                latest,
                "Discarding superseded export result"
            );
            return Err(NiteError::Superseded { newer: latest });
        }
        match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(NiteError::Superseded { newer: latest }),
            Err(e) => Err(NiteError::export(format!("Export task failed: {e}"))),
        }
    }

    /// Request and await in one step.
    pub async fn export(
        &self,
        request: ExportRequest,
        progress: Option<ProgressCallback>,
    ) -> NiteResult<Bitmap> {
        let ticket = self.request(request, progress);
        self.finish(ticket).await
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: &ExportTicket) -> bool {
        ticket.generation == self.latest_generation()
    }
}

impl std::fmt::Debug for ExportCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportCoordinator")
            .field("generation", &self.latest_generation())
            .finish_non_exhaustive()
    }
}
