//! Freezing a live frame into a still photo.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::RgbaImage;
use snapbooth_common::config::CaptureDefaults;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_overlay_model::layer::TextLayer;
use snapbooth_overlay_model::model::OverlaySnapshot;
use snapbooth_overlay_model::transform::FrameSize;
use snapbooth_render_engine::compositor::Compositor;

use crate::source::FrameSource;

/// The frozen still every export is composed on.
///
/// The raster is shared and never modified after capture; its dimensions
/// are the capture-resolution authority for the session.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    raster: Arc<RgbaImage>,
    captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(raster: RgbaImage) -> Self {
        Self {
            raster: Arc::new(raster),
            captured_at: Utc::now(),
        }
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Cheap shared handle to the raster, for moving into blocking tasks.
    pub fn shared_raster(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.raster)
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width(), self.height())
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Result of a capture.
#[derive(Debug, Clone)]
pub struct Capture {
    pub photo: CapturedPhoto,
    /// Caption burned into a copy of the still, when enabled and non-empty.
    /// Display only; exports always start from `photo`.
    pub quick_preview: Option<RgbaImage>,
}

/// Grabs a frame from a source and freezes it.
#[derive(Debug, Clone, Default)]
pub struct CapturePipeline {
    burn_in_text: bool,
    compositor: Compositor,
}

impl CapturePipeline {
    pub fn new(defaults: &CaptureDefaults, compositor: Compositor) -> Self {
        Self {
            burn_in_text: defaults.burn_in_text,
            compositor,
        }
    }

    pub fn burns_in_text(&self) -> bool {
        self.burn_in_text
    }

    /// Freeze the source's current frame at its native resolution.
    pub fn capture(&self, source: &mut dyn FrameSource, text: &TextLayer) -> BoothResult<Capture> {
        if !source.is_streaming() {
            return Err(BoothError::capture_unavailable(format!(
                "{} is not streaming",
                source.name()
            )));
        }

        let frame = source.grab_frame()?;
        if frame.size().is_empty() {
            return Err(BoothError::capture_unavailable(format!(
                "{} returned an empty frame",
                source.name()
            )));
        }

        let photo = CapturedPhoto::new(frame.image);
        tracing::info!(
            source = source.name(),
            sequence = frame.sequence,
            width = photo.width(),
            height = photo.height(),
            "Photo captured"
        );

        let quick_preview = (self.burn_in_text && !text.is_empty())
            .then(|| self.burn_in(&photo, text));

        Ok(Capture {
            photo,
            quick_preview,
        })
    }

    fn burn_in(&self, photo: &CapturedPhoto, text: &TextLayer) -> RgbaImage {
        let snapshot = OverlaySnapshot {
            text: text.clone(),
            sticker: None,
            reference_width: photo.width(),
        };
        self.compositor.compose(photo.raster(), &snapshot, None)
    }
}
