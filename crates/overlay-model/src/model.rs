//! The editable overlay state for one booth session.

use snapbooth_common::config::OverlayDefaults;

use crate::layer::{ImageRef, LayerKind, StickerLayer, TextLayer, EMOJI_MIN_TEXT_SIZE};
use crate::transform::{from_delta, scale_factor, CoordinateDelta, FrameSize, OverlayCoordinate};

/// Owns the caption and sticker layers and enforces their invariants.
#[derive(Debug, Clone)]
pub struct OverlayModel {
    text: TextLayer,
    sticker: Option<StickerLayer>,
    capture: FrameSize,
    preview: FrameSize,
    defaults: OverlayDefaults,
}

/// Immutable copy of the overlay state handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySnapshot {
    pub text: TextLayer,
    pub sticker: Option<StickerLayer>,
    /// Capture width the overlay sizes refer to.
    pub reference_width: u32,
}

impl OverlayModel {
    pub fn new(defaults: OverlayDefaults) -> Self {
        Self {
            text: TextLayer::new(defaults.text_size),
            sticker: None,
            capture: FrameSize::default(),
            preview: FrameSize::default(),
            defaults,
        }
    }

    pub fn text(&self) -> &TextLayer {
        &self.text
    }

    pub fn sticker(&self) -> Option<&StickerLayer> {
        self.sticker.as_ref()
    }

    pub fn capture_size(&self) -> FrameSize {
        self.capture
    }

    pub fn preview_size(&self) -> FrameSize {
        self.preview
    }

    pub fn defaults(&self) -> &OverlayDefaults {
        &self.defaults
    }

    /// Current preview/capture ratio, derived from the live dimensions.
    pub fn scale_factor(&self) -> f64 {
        if self.capture.is_empty() || self.preview.is_empty() {
            return 1.0;
        }
        scale_factor(self.capture.width, self.preview.width)
    }

    /// Record the native resolution of the captured still.
    ///
    /// A sticker picked before any capture adopts the new width as its
    /// reference, so its size keeps meaning capture pixels.
    pub fn set_capture_size(&mut self, size: FrameSize) {
        if self.capture.is_empty() {
            if let Some(sticker) = self.sticker.as_mut() {
                sticker.set_reference_width(size.width);
            }
        }
        self.capture = size;
        self.refresh_preview_sizes();
    }

    /// Record the on-screen container size (call on every container resize).
    pub fn set_preview_size(&mut self, size: FrameSize) {
        self.preview = size;
        self.refresh_preview_sizes();
    }

    /// Sticker edge length in preview pixels.
    pub fn sticker_preview_size(&self) -> Option<f64> {
        let preview_width = if self.preview.is_empty() {
            self.capture.width
        } else {
            self.preview.width
        };
        self.sticker
            .as_ref()
            .map(|sticker| sticker.size_for_width(preview_width))
    }

    /// Replace the caption text, keeping its geometry.
    pub fn set_text(&mut self, content: impl Into<String>) {
        self.text.set_content(content.into());
    }

    /// Append an emoji to the caption, growing it so the glyph stays legible.
    pub fn append_emoji(&mut self, emoji: &str) {
        self.text.push_str(emoji);
        if self.text.font_size_capture() < EMOJI_MIN_TEXT_SIZE {
            let scale = self.scale_factor();
            self.text.set_font_size(EMOJI_MIN_TEXT_SIZE, scale);
        }
    }

    /// Select a sticker, replacing any existing one entirely.
    pub fn select_sticker(&mut self, image: ImageRef) {
        tracing::debug!(image = %image, "Sticker selected");
        self.sticker = Some(StickerLayer::new(
            image,
            self.defaults.sticker_size,
            self.capture.width,
        ));
    }

    /// Remove the sticker.
    pub fn delete_sticker(&mut self) {
        self.sticker = None;
    }

    /// Authoritative size of a layer in capture pixels.
    pub fn layer_size(&self, kind: LayerKind) -> Option<f64> {
        match kind {
            LayerKind::Text => Some(self.text.font_size_capture()),
            LayerKind::Sticker => self.sticker.as_ref().map(StickerLayer::size_capture),
        }
    }

    pub fn layer_position(&self, kind: LayerKind) -> Option<OverlayCoordinate> {
        match kind {
            LayerKind::Text => Some(self.text.position()),
            LayerKind::Sticker => self.sticker.as_ref().map(StickerLayer::position),
        }
    }

    /// Add a relative delta to a layer position, clamping per axis.
    ///
    /// Returns false when the layer does not exist.
    pub fn apply_move(&mut self, kind: LayerKind, delta: CoordinateDelta) -> bool {
        match kind {
            LayerKind::Text => {
                let moved = self.text.position().offset(delta);
                self.text.set_position(moved);
                true
            }
            LayerKind::Sticker => match self.sticker.as_mut() {
                Some(sticker) => {
                    let moved = sticker.position().offset(delta);
                    sticker.set_position(moved);
                    true
                }
                None => false,
            },
        }
    }

    /// Move a layer by a pixel displacement measured in the preview container.
    pub fn apply_move_px(&mut self, kind: LayerKind, dx: f64, dy: f64) -> bool {
        let container = if self.preview.is_empty() {
            self.capture
        } else {
            self.preview
        };
        let delta = from_delta(dx, dy, container.width, container.height);
        self.apply_move(kind, delta)
    }

    /// Place a layer at an absolute coordinate.
    pub fn set_position(&mut self, kind: LayerKind, position: OverlayCoordinate) -> bool {
        match kind {
            LayerKind::Text => {
                self.text.set_position(position);
                true
            }
            LayerKind::Sticker => match self.sticker.as_mut() {
                Some(sticker) => {
                    sticker.set_position(position);
                    true
                }
                None => false,
            },
        }
    }

    /// Set a layer size in capture pixels, clamped to the layer's bounds.
    ///
    /// Returns false when the layer does not exist.
    pub fn apply_resize(&mut self, kind: LayerKind, size: f64) -> bool {
        let scale = self.scale_factor();
        match kind {
            LayerKind::Text => {
                self.text.set_font_size(size, scale);
                true
            }
            LayerKind::Sticker => match self.sticker.as_mut() {
                Some(sticker) => {
                    sticker.set_size(size);
                    true
                }
                None => false,
            },
        }
    }

    /// Return both layers to their initial state. Dimensions are kept.
    pub fn reset(&mut self) {
        self.text = TextLayer::new(self.defaults.text_size);
        self.sticker = None;
        self.refresh_preview_sizes();
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            text: self.text.clone(),
            sticker: self.sticker.clone(),
            reference_width: self.capture.width.max(1),
        }
    }

    fn refresh_preview_sizes(&mut self) {
        let scale = self.scale_factor();
        self.text.rescale(scale);
    }
}

impl Default for OverlayModel {
    fn default() -> Self {
        Self::new(OverlayDefaults::default())
    }
}
