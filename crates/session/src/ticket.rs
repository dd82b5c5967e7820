//! Export tickets: a frozen copy of everything one export needs.

use image::RgbaImage;
use snapbooth_capture_engine::pipeline::CapturedPhoto;
use snapbooth_common::config::ExportSettings;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_overlay_model::model::OverlaySnapshot;
use snapbooth_render_engine::compositor::Compositor;
use snapbooth_render_engine::export::{
    export_for_download, export_for_upload, DownloadExport, PhotoBlob,
};

use crate::loader::ImageLoader;
use crate::store::CollageStore;

/// Proof of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub collage_id: String,
    pub filename: String,
    pub bytes: usize,
    pub width: u32,
    pub height: u32,
}

/// Inputs of one export, detached from the booth.
///
/// Edits made after the ticket was issued do not affect it. The booth
/// compares [`ExportTicket::generation`] when the result comes back.
#[derive(Debug, Clone)]
pub struct ExportTicket {
    generation: u64,
    photo: CapturedPhoto,
    snapshot: OverlaySnapshot,
    compositor: Compositor,
    settings: ExportSettings,
}

impl ExportTicket {
    pub(crate) fn new(
        generation: u64,
        photo: CapturedPhoto,
        snapshot: OverlaySnapshot,
        compositor: Compositor,
        settings: ExportSettings,
    ) -> Self {
        Self {
            generation,
            photo,
            snapshot,
            compositor,
            settings,
        }
    }

    /// Session generation this ticket was issued in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> &OverlaySnapshot {
        &self.snapshot
    }

    /// Compose the photo at native resolution.
    ///
    /// The sticker is fully decoded before anything is drawn.
    pub async fn compose(&self, loader: &dyn ImageLoader) -> BoothResult<RgbaImage> {
        self.render_blocking(loader, Ok).await
    }

    /// Compose and encode as a downloadable `data:` URI.
    pub async fn render_download(&self, loader: &dyn ImageLoader) -> BoothResult<DownloadExport> {
        let settings = self.settings.clone();
        self.render_blocking(loader, move |composed| {
            export_for_download(&composed, &settings)
        })
        .await
    }

    /// Compose and encode as an upload blob.
    pub async fn render_upload(&self, loader: &dyn ImageLoader) -> BoothResult<PhotoBlob> {
        let settings = self.settings.clone();
        self.render_blocking(loader, move |composed| export_for_upload(&composed, &settings))
            .await
    }

    /// Compose, encode, and hand the blob to `store`.
    pub async fn upload(
        &self,
        loader: &dyn ImageLoader,
        store: &dyn CollageStore,
        collage_id: &str,
    ) -> BoothResult<UploadReceipt> {
        let blob = self.render_upload(loader).await?;
        if !store.upload_photo(collage_id, &blob).await? {
            return Err(BoothError::upload("storage rejected the photo"));
        }
        Ok(UploadReceipt {
            collage_id: collage_id.to_string(),
            filename: blob.filename.clone(),
            bytes: blob.len(),
            width: blob.width,
            height: blob.height,
        })
    }

    async fn render_blocking<T, F>(&self, loader: &dyn ImageLoader, finish: F) -> BoothResult<T>
    where
        T: Send + 'static,
        F: FnOnce(RgbaImage) -> BoothResult<T> + Send + 'static,
    {
        let sticker = match &self.snapshot.sticker {
            Some(sticker) => Some(loader.load(sticker.image()).await?),
            None => None,
        };

        let raster = self.photo.shared_raster();
        let snapshot = self.snapshot.clone();
        let compositor = self.compositor.clone();
        tokio::task::spawn_blocking(move || {
            let composed = compositor.compose(&raster, &snapshot, sticker.as_ref());
            finish(composed)
        })
        .await
        .map_err(|e| BoothError::context_unavailable(format!("render task failed: {e}")))?
    }
}
