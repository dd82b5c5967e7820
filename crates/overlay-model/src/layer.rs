//! Overlay layer types: the caption and the sticker.

use serde::{Deserialize, Serialize};

use crate::transform::OverlayCoordinate;

/// Caption size after a reset, in capture pixels.
pub const DEFAULT_TEXT_SIZE: f64 = 48.0;

/// Sticker size on selection, in capture pixels.
pub const DEFAULT_STICKER_SIZE: f64 = 100.0;

/// Appending an emoji raises the caption to at least this size.
pub const EMOJI_MIN_TEXT_SIZE: f64 = 96.0;

/// Caption size bounds in capture pixels.
pub const TEXT_SIZE_LIMITS: SizeLimits = SizeLimits {
    min: 24.0,
    max: 240.0,
};

/// Sticker size bounds in capture pixels.
pub const STICKER_SIZE_LIMITS: SizeLimits = SizeLimits {
    min: 40.0,
    max: 300.0,
};

/// Which overlay a gesture or edit addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Text,
    Sticker,
}

impl LayerKind {
    /// Size bounds for this layer type.
    pub fn size_limits(self) -> SizeLimits {
        match self {
            LayerKind::Text => TEXT_SIZE_LIMITS,
            LayerKind::Sticker => STICKER_SIZE_LIMITS,
        }
    }
}

/// Inclusive size range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min: f64,
    pub max: f64,
}

impl SizeLimits {
    pub fn clamp(&self, size: f64) -> f64 {
        if size.is_nan() {
            return self.min;
        }
        size.clamp(self.min, self.max)
    }

    pub fn contains(&self, size: f64) -> bool {
        size >= self.min && size <= self.max
    }
}

/// Opaque reference to a loadable image (URL, data URI, or path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Data URIs can be megabytes long.
        if self.0.starts_with("data:") {
            write!(f, "data:<{} bytes>", self.0.len())
        } else {
            f.write_str(&self.0)
        }
    }
}

/// The caption overlay.
///
/// `font_size_capture` is authoritative for every export. The preview size
/// is derived from it and is refreshed by the owning model whenever the
/// capture or preview dimensions change.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    content: String,
    position: OverlayCoordinate,
    font_size_capture: f64,
    font_size_preview: f64,
}

impl TextLayer {
    /// An empty caption at the container center.
    pub fn new(font_size_capture: f64) -> Self {
        let size = TEXT_SIZE_LIMITS.clamp(font_size_capture);
        Self {
            content: String::new(),
            position: OverlayCoordinate::CENTER,
            font_size_capture: size,
            font_size_preview: size,
        }
    }

    /// Caption text. Empty means "not rendered".
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn position(&self) -> OverlayCoordinate {
        self.position
    }

    pub fn font_size_capture(&self) -> f64 {
        self.font_size_capture
    }

    pub fn font_size_preview(&self) -> f64 {
        self.font_size_preview
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn push_str(&mut self, suffix: &str) {
        self.content.push_str(suffix);
    }

    pub(crate) fn set_position(&mut self, position: OverlayCoordinate) {
        self.position = OverlayCoordinate::new(position.x, position.y);
    }

    /// Set the capture size (clamped) and rederive the preview size.
    pub(crate) fn set_font_size(&mut self, size: f64, scale: f64) {
        self.font_size_capture = TEXT_SIZE_LIMITS.clamp(size);
        self.rescale(scale);
    }

    pub(crate) fn rescale(&mut self, scale: f64) {
        self.font_size_preview = self.font_size_capture * scale;
    }
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_SIZE)
    }
}

/// The sticker overlay.
///
/// The size is stored in capture pixels only, against `reference_width`,
/// the capture width it was chosen for. Renderers scale it to their target.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerLayer {
    image: ImageRef,
    position: OverlayCoordinate,
    size_capture: f64,
    reference_width: u32,
}

impl StickerLayer {
    /// A sticker at the container center.
    pub fn new(image: ImageRef, size_capture: f64, reference_width: u32) -> Self {
        Self {
            image,
            position: OverlayCoordinate::CENTER,
            size_capture: STICKER_SIZE_LIMITS.clamp(size_capture),
            reference_width: reference_width.max(1),
        }
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn position(&self) -> OverlayCoordinate {
        self.position
    }

    pub fn size_capture(&self) -> f64 {
        self.size_capture
    }

    pub fn reference_width(&self) -> u32 {
        self.reference_width
    }

    /// Edge length when drawn onto a raster `target_width` pixels wide.
    pub fn size_for_width(&self, target_width: u32) -> f64 {
        self.size_capture * target_width as f64 / self.reference_width as f64
    }

    pub(crate) fn set_position(&mut self, position: OverlayCoordinate) {
        self.position = OverlayCoordinate::new(position.x, position.y);
    }

    pub(crate) fn set_size(&mut self, size: f64) {
        self.size_capture = STICKER_SIZE_LIMITS.clamp(size);
    }

    pub(crate) fn set_reference_width(&mut self, width: u32) {
        self.reference_width = width.max(1);
    }
}
