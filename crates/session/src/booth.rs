//! The photo booth session.

use image::RgbaImage;
use snapbooth_capture_engine::pipeline::{CapturePipeline, CapturedPhoto};
use snapbooth_capture_engine::source::FrameSource;
use snapbooth_common::config::BoothConfig;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_gesture::event::InputEvent;
use snapbooth_gesture::intent::{apply_intents, GestureIntent};
use snapbooth_gesture::interpreter::{GestureConfig, GestureInterpreter};
use snapbooth_overlay_model::layer::{ImageRef, LayerKind, TextLayer};
use snapbooth_overlay_model::model::OverlayModel;
use snapbooth_overlay_model::transform::{FrameSize, OverlayCoordinate};
use snapbooth_render_engine::compositor::Compositor;
use snapbooth_render_engine::export::DownloadExport;
use snapbooth_render_engine::text::TextFace;

use crate::loader::ImageLoader;
use crate::store::CollageStore;
use crate::ticket::{ExportTicket, UploadReceipt};

/// One user's booth: a captured photo, its overlays, and export state.
///
/// The booth is driven from a single event loop. Only exports leave it,
/// as [`ExportTicket`]s.
#[derive(Debug)]
pub struct PhotoBooth {
    config: BoothConfig,
    overlay: OverlayModel,
    gestures: GestureInterpreter,
    pipeline: CapturePipeline,
    compositor: Compositor,
    photo: Option<CapturedPhoto>,
    quick_preview: Option<RgbaImage>,
    /// Bumped by every retake or reset; results from older tickets are dropped.
    generation: u64,
    export_pending: bool,
}

impl PhotoBooth {
    pub fn new(config: BoothConfig) -> Self {
        let face = TextFace::from_config(config.font_path.as_deref());
        Self::with_compositor(config, Compositor::new(face))
    }

    pub fn with_compositor(config: BoothConfig, compositor: Compositor) -> Self {
        Self {
            overlay: OverlayModel::new(config.overlay.clone()),
            gestures: GestureInterpreter::new(GestureConfig::from(&config.overlay)),
            pipeline: CapturePipeline::new(&config.capture, compositor.clone()),
            compositor,
            config,
            photo: None,
            quick_preview: None,
            generation: 0,
            export_pending: false,
        }
    }

    pub fn config(&self) -> &BoothConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayModel {
        &self.overlay
    }

    pub fn gestures(&self) -> &GestureInterpreter {
        &self.gestures
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    /// Caption burned into the still at capture time, if enabled.
    pub fn quick_preview(&self) -> Option<&RgbaImage> {
        self.quick_preview.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_exporting(&self) -> bool {
        self.export_pending
    }

    // ── Capture ──────────────────────────────────────────────

    /// Freeze the source's current frame. An existing photo is retaken once
    /// the new frame is in hand; a failed grab leaves the session untouched.
    ///
    /// A caption typed before the first capture is kept.
    pub fn capture(&mut self, source: &mut dyn FrameSource) -> BoothResult<&CapturedPhoto> {
        let capture = if self.photo.is_some() {
            let blank = TextLayer::new(self.config.overlay.text_size);
            let capture = self.pipeline.capture(source, &blank)?;
            self.retake();
            capture
        } else {
            self.pipeline.capture(source, self.overlay.text())?
        };

        self.overlay.set_capture_size(capture.photo.size());
        self.quick_preview = capture.quick_preview;
        Ok(self.photo.insert(capture.photo))
    }

    /// Discard the photo and every overlay edit.
    pub fn retake(&mut self) {
        self.photo = None;
        self.quick_preview = None;
        self.overlay.reset();
        self.gestures.cancel();
        self.generation += 1;
        self.export_pending = false;
        tracing::info!(generation = self.generation, "Session reset");
    }

    /// Return to the initial empty state, e.g. when the user navigates away.
    pub fn reset(&mut self) {
        self.retake();
    }

    // ── Editing ──────────────────────────────────────────────

    /// Record the on-screen preview container size.
    pub fn set_preview_size(&mut self, size: FrameSize) {
        self.overlay.set_preview_size(size);
    }

    /// Feed a raw input event; the resulting intents are applied and returned.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<GestureIntent> {
        let intents = self.gestures.handle(event, &self.overlay);
        apply_intents(&mut self.overlay, &intents);
        intents
    }

    pub fn set_text(&mut self, content: impl Into<String>) {
        self.overlay.set_text(content);
    }

    pub fn append_emoji(&mut self, emoji: &str) {
        self.overlay.append_emoji(emoji);
    }

    /// Pick a sticker. Stickers are sized against the photo, so one is needed.
    pub fn select_sticker(&mut self, image: ImageRef) -> BoothResult<()> {
        if self.photo.is_none() {
            return Err(BoothError::NoPhoto);
        }
        self.overlay.select_sticker(image);
        Ok(())
    }

    pub fn delete_sticker(&mut self) {
        if self
            .gestures
            .active_session()
            .is_some_and(|session| session.layer() == LayerKind::Sticker)
        {
            self.gestures.cancel();
        }
        self.overlay.delete_sticker();
    }

    /// Place a layer directly, without a gesture.
    pub fn set_layer_position(&mut self, layer: LayerKind, position: OverlayCoordinate) -> bool {
        self.overlay.set_position(layer, position)
    }

    /// Resize a layer directly, without a gesture.
    pub fn set_layer_size(&mut self, layer: LayerKind, size: f64) -> bool {
        self.overlay.apply_resize(layer, size)
    }

    // ── Export ───────────────────────────────────────────────

    /// Start an export. Only one may be outstanding.
    pub fn begin_export(&mut self) -> BoothResult<ExportTicket> {
        let photo = self.photo.as_ref().ok_or(BoothError::NoPhoto)?;
        if self.export_pending {
            return Err(BoothError::ExportInFlight);
        }
        self.export_pending = true;

        tracing::info!(
            generation = self.generation,
            width = photo.width(),
            height = photo.height(),
            "Export started"
        );
        Ok(ExportTicket::new(
            self.generation,
            photo.clone(),
            self.overlay.snapshot(),
            self.compositor.clone(),
            self.config.export.clone(),
        ))
    }

    /// Hand back the result of a ticket. Returns `Ok(None)` when the photo
    /// was retaken after the ticket was issued.
    pub fn complete_export<T>(
        &mut self,
        generation: u64,
        result: BoothResult<T>,
    ) -> BoothResult<Option<T>> {
        if generation != self.generation {
            tracing::info!(
                ticket = generation,
                current = self.generation,
                "Discarding stale export result"
            );
            return Ok(None);
        }
        self.export_pending = false;

        match result {
            Ok(value) => {
                tracing::info!(generation, "Export finished");
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Export failed; session kept");
                Err(e)
            }
        }
    }

    /// Hand back an upload result. A successful upload resets the session.
    pub fn complete_upload(
        &mut self,
        generation: u64,
        result: BoothResult<UploadReceipt>,
    ) -> BoothResult<Option<UploadReceipt>> {
        let receipt = self.complete_export(generation, result)?;
        if let Some(receipt) = &receipt {
            tracing::info!(
                collage = %receipt.collage_id,
                bytes = receipt.bytes,
                "Upload succeeded"
            );
            self.retake();
        }
        Ok(receipt)
    }

    /// Compose and encode for download. The session is kept.
    pub async fn export_for_download(
        &mut self,
        loader: &dyn ImageLoader,
    ) -> BoothResult<DownloadExport> {
        let ticket = self.begin_export()?;
        let result = ticket.render_download(loader).await;
        self.complete_export(ticket.generation(), result)?
            .ok_or_else(|| BoothError::context_unavailable("export superseded by a retake"))
    }

    /// Compose, encode, and upload. Success resets the session; failure
    /// keeps the photo and overlays for a retry.
    pub async fn export_for_upload(
        &mut self,
        loader: &dyn ImageLoader,
        store: &dyn CollageStore,
        collage_id: &str,
    ) -> BoothResult<UploadReceipt> {
        let ticket = self.begin_export()?;
        let result = ticket.upload(loader, store, collage_id).await;
        self.complete_upload(ticket.generation(), result)?
            .ok_or_else(|| BoothError::context_unavailable("upload superseded by a retake"))
    }

    /// Render what the preview container shows.
    pub async fn render_preview(&self, loader: &dyn ImageLoader) -> BoothResult<RgbaImage> {
        let photo = self.photo.as_ref().ok_or(BoothError::NoPhoto)?;
        let snapshot = self.overlay.snapshot();
        let sticker = match &snapshot.sticker {
            Some(sticker) => Some(loader.load(sticker.image()).await?),
            None => None,
        };
        let preview = self.overlay.preview_size();
        Ok(self
            .compositor
            .render_preview(photo.raster(), &snapshot, sticker.as_ref(), preview))
    }
}

impl Default for PhotoBooth {
    fn default() -> Self {
        Self::with_compositor(BoothConfig::default(), Compositor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbooth_capture_engine::source::SyntheticSource;
    use snapbooth_gesture::event::HitTarget;

    fn booth_with_photo() -> PhotoBooth {
        let mut booth = PhotoBooth::default();
        booth.capture(&mut SyntheticSource::new(1920, 1080)).unwrap();
        booth.set_preview_size(FrameSize::new(360, 203));
        booth
    }

    #[test]
    fn test_capture_sets_capture_size() {
        let booth = booth_with_photo();
        assert_eq!(booth.overlay().capture_size(), FrameSize::new(1920, 1080));
        assert!((booth.overlay().text().font_size_preview() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_retake_resets_everything() {
        let mut booth = booth_with_photo();
        booth.set_text("BYE");
        booth.set_layer_position(LayerKind::Text, OverlayCoordinate::new(10.0, 90.0));
        booth.set_layer_size(LayerKind::Text, 120.0);
        booth.select_sticker(ImageRef::new("star.png")).unwrap();
        let generation = booth.generation();

        booth.retake();

        assert!(!booth.has_photo());
        let text = booth.overlay().text();
        assert_eq!(text.content(), "");
        assert_eq!(text.position(), OverlayCoordinate::CENTER);
        assert_eq!(text.font_size_capture(), 48.0);
        assert!(booth.overlay().sticker().is_none());
        assert_eq!(booth.generation(), generation + 1);
    }

    #[test]
    fn test_capture_keeps_caption_typed_beforehand() {
        let mut booth = PhotoBooth::default();
        booth.set_text("HELLO");
        booth.capture(&mut SyntheticSource::new(640, 480)).unwrap();
        assert_eq!(booth.overlay().text().content(), "HELLO");
    }

    #[test]
    fn test_second_capture_retakes() {
        let mut booth = booth_with_photo();
        booth.select_sticker(ImageRef::new("star.png")).unwrap();
        booth.capture(&mut SyntheticSource::new(640, 480)).unwrap();
        assert!(booth.overlay().sticker().is_none());
        assert_eq!(booth.photo().unwrap().size(), FrameSize::new(640, 480));
    }

    #[test]
    fn test_failed_capture_keeps_session() {
        let mut booth = booth_with_photo();
        booth.set_text("KEEP");
        booth.select_sticker(ImageRef::new("star.png")).unwrap();
        let generation = booth.generation();

        let mut stopped = SyntheticSource::new(640, 480);
        stopped.stop();
        let err = booth.capture(&mut stopped).unwrap_err();

        assert!(matches!(err, BoothError::CaptureUnavailable { .. }));
        assert!(err.preserves_session());
        assert_eq!(booth.photo().unwrap().size(), FrameSize::new(1920, 1080));
        assert_eq!(booth.overlay().text().content(), "KEEP");
        assert!(booth.overlay().sticker().is_some());
        assert_eq!(booth.generation(), generation);
    }

    #[test]
    fn test_retake_does_not_burn_in_old_caption() {
        let mut config = BoothConfig::default();
        config.capture.burn_in_text = true;
        let mut booth = PhotoBooth::with_compositor(config, Compositor::default());
        booth.capture(&mut SyntheticSource::new(320, 240)).unwrap();
        booth.set_text("OLD");

        booth.capture(&mut SyntheticSource::new(320, 240)).unwrap();
        assert_eq!(booth.overlay().text().content(), "");
        assert!(booth.quick_preview().is_none());
    }

    #[test]
    fn test_sticker_requires_photo() {
        let mut booth = PhotoBooth::default();
        let err = booth.select_sticker(ImageRef::new("star.png")).unwrap_err();
        assert!(matches!(err, BoothError::NoPhoto));
        assert!(booth.overlay().sticker().is_none());

        booth.capture(&mut SyntheticSource::new(1280, 720)).unwrap();
        booth.select_sticker(ImageRef::new("star.png")).unwrap();
        let sticker = booth.overlay().sticker().unwrap();
        assert_eq!(sticker.reference_width(), 1280);
        assert_eq!(sticker.size_for_width(1280), 100.0);
    }

    #[test]
    fn test_export_requires_photo() {
        let mut booth = PhotoBooth::default();
        assert!(matches!(booth.begin_export(), Err(BoothError::NoPhoto)));
    }

    #[test]
    fn test_single_export_in_flight() {
        let mut booth = booth_with_photo();
        let ticket = booth.begin_export().unwrap();
        assert!(matches!(booth.begin_export(), Err(BoothError::ExportInFlight)));

        booth
            .complete_export(ticket.generation(), Ok::<_, BoothError>(()))
            .unwrap();
        assert!(booth.begin_export().is_ok());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut booth = booth_with_photo();
        let stale = booth.begin_export().unwrap();
        booth.retake();
        booth.capture(&mut SyntheticSource::new(640, 480)).unwrap();
        let current = booth.begin_export().unwrap();

        let outcome = booth.complete_export(stale.generation(), Ok::<_, BoothError>(1)).unwrap();
        assert_eq!(outcome, None);
        // The live export is still outstanding.
        assert!(booth.is_exporting());

        let outcome = booth.complete_export(current.generation(), Ok::<_, BoothError>(2)).unwrap();
        assert_eq!(outcome, Some(2));
        assert!(!booth.is_exporting());
    }

    #[test]
    fn test_failed_export_keeps_session() {
        let mut booth = booth_with_photo();
        booth.set_text("KEEP");
        let ticket = booth.begin_export().unwrap();
        let err = booth
            .complete_export::<()>(ticket.generation(), Err(BoothError::upload("offline")))
            .unwrap_err();
        assert!(err.preserves_session());
        assert!(booth.has_photo());
        assert_eq!(booth.overlay().text().content(), "KEEP");
        assert!(!booth.is_exporting());
    }

    #[test]
    fn test_successful_upload_resets() {
        let mut booth = booth_with_photo();
        booth.set_text("BYE");
        let ticket = booth.begin_export().unwrap();
        let receipt = UploadReceipt {
            collage_id: "c1".to_string(),
            filename: "photo.jpg".to_string(),
            bytes: 10,
            width: 1920,
            height: 1080,
        };
        let outcome = booth.complete_upload(ticket.generation(), Ok(receipt)).unwrap();
        assert!(outcome.is_some());
        assert!(!booth.has_photo());
        assert_eq!(booth.overlay().text().content(), "");
    }

    #[test]
    fn test_input_drives_overlay() {
        let mut booth = booth_with_photo();
        booth.handle_input(&InputEvent::down(0.0, 0.0, Some(HitTarget::body(LayerKind::Text))));
        booth.handle_input(&InputEvent::moved(36.0, 20.3));
        booth.handle_input(&InputEvent::PointerUp);

        let position = booth.overlay().text().position();
        assert!((position.x - 60.0).abs() < 1e-9);
        assert!((position.y - 60.0).abs() < 1e-9);
        assert!(!booth.gestures().is_active());
    }

    #[test]
    fn test_deleting_sticker_cancels_its_gesture() {
        let mut booth = booth_with_photo();
        booth.select_sticker(ImageRef::new("star.png")).unwrap();
        booth.handle_input(&InputEvent::down(0.0, 0.0, Some(HitTarget::body(LayerKind::Sticker))));
        booth.delete_sticker();
        assert!(!booth.gestures().is_active());
        assert!(booth.handle_input(&InputEvent::moved(10.0, 10.0)).is_empty());
    }
}
