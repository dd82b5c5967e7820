//! Overlay compositor: draws the sticker and caption onto a photo.
//!
//! Composition is a pure function of its inputs. Every placement is derived
//! from the overlay snapshot and the target raster's own dimensions, so the
//! same routine serves the full-resolution export and the on-screen preview.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use snapbooth_overlay_model::model::OverlaySnapshot;
use snapbooth_overlay_model::transform::{to_pixels, FrameSize};

use crate::text::{TextFace, STROKE_WIDTH};

/// Resolved drawing instructions for one target raster.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlacement {
    /// Sticker top-left corner and edge length, in target pixels.
    pub sticker: Option<StickerPlacement>,
    /// Caption anchor, in target pixels.
    pub text: Option<TextPlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerPlacement {
    pub x: i64,
    pub y: i64,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub font_px: f32,
    pub stroke_width: f32,
}

/// Compute where the overlays land on a `target` raster.
pub fn place_overlays(snapshot: &OverlaySnapshot, target: FrameSize) -> OverlayPlacement {
    let sticker = snapshot.sticker.as_ref().map(|sticker| {
        let size = sticker.size_for_width(target.width).round().max(1.0);
        let (cx, cy) = to_pixels(sticker.position(), target.width, target.height);
        StickerPlacement {
            x: (cx - size / 2.0).round() as i64,
            y: (cy - size / 2.0).round() as i64,
            size: size as u32,
        }
    });

    let text = (!snapshot.text.is_empty()).then(|| {
        let scale = target.width as f64 / snapshot.reference_width.max(1) as f64;
        let (x, y) = to_pixels(snapshot.text.position(), target.width, target.height);
        TextPlacement {
            anchor_x: x as f32,
            anchor_y: y as f32,
            font_px: (snapshot.text.font_size_capture() * scale) as f32,
            stroke_width: STROKE_WIDTH * scale as f32,
        }
    });

    OverlayPlacement { sticker, text }
}

/// Draws overlays with a fixed caption face.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    face: TextFace,
}

impl Compositor {
    pub fn new(face: TextFace) -> Self {
        Self { face }
    }

    pub fn face(&self) -> &TextFace {
        &self.face
    }

    /// Compose the export raster at the base image's native resolution.
    ///
    /// Draw order is base, then sticker, then caption.
    pub fn compose(
        &self,
        base: &RgbaImage,
        snapshot: &OverlaySnapshot,
        sticker_image: Option<&RgbaImage>,
    ) -> RgbaImage {
        let mut canvas = base.clone();
        self.draw_overlays(&mut canvas, snapshot, sticker_image);
        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            sticker = snapshot.sticker.is_some(),
            text = !snapshot.text.is_empty(),
            "Composed photo"
        );
        canvas
    }

    /// Render what the preview container shows: the base scaled to the
    /// container, with overlays drawn at preview scale.
    ///
    /// The base is stretched to fill the container rather than cropped
    /// to cover it. Overlay positions are percentages of the container, so
    /// a stretched base keeps every overlay over the same photo pixel the
    /// export will use. Callers wanting an undistorted preview should size
    /// the container to the capture's aspect ratio.
    pub fn render_preview(
        &self,
        base: &RgbaImage,
        snapshot: &OverlaySnapshot,
        sticker_image: Option<&RgbaImage>,
        preview: FrameSize,
    ) -> RgbaImage {
        let native = base.dimensions() == (preview.width, preview.height);
        let mut canvas = if preview.is_empty() || native {
            base.clone()
        } else {
            imageops::resize(base, preview.width, preview.height, FilterType::Triangle)
        };
        self.draw_overlays(&mut canvas, snapshot, sticker_image);
        canvas
    }

    /// Draw the sticker, then the caption, onto `canvas` in place.
    pub fn draw_overlays(
        &self,
        canvas: &mut RgbaImage,
        snapshot: &OverlaySnapshot,
        sticker_image: Option<&RgbaImage>,
    ) {
        let target = FrameSize::new(canvas.width(), canvas.height());
        let placement = place_overlays(snapshot, target);

        match (placement.sticker, sticker_image) {
            (Some(sticker), Some(image)) => {
                let scaled =
                    imageops::resize(image, sticker.size, sticker.size, FilterType::Triangle);
                imageops::overlay(canvas, &scaled, sticker.x, sticker.y);
            }
            (Some(_), None) => {
                tracing::warn!("Sticker layer present without a decoded image; skipping");
            }
            _ => {}
        }

        if let Some(text) = placement.text {
            self.face.draw(
                canvas,
                snapshot.text.content(),
                (text.anchor_x, text.anchor_y),
                text.font_px,
                text.stroke_width,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FILL_COLOR, STROKE_COLOR};
    use image::Rgba;
    use snapbooth_overlay_model::layer::{ImageRef, LayerKind};
    use snapbooth_overlay_model::model::OverlayModel;
    use snapbooth_overlay_model::transform::OverlayCoordinate;

    const BACKGROUND: Rgba<u8> = Rgba([20, 90, 160, 255]);
    const RED: Rgba<u8> = Rgba([230, 20, 20, 255]);

    fn model(width: u32, height: u32) -> OverlayModel {
        let mut model = OverlayModel::default();
        model.set_capture_size(FrameSize::new(width, height));
        model
    }

    fn red_sticker() -> RgbaImage {
        RgbaImage::from_pixel(64, 64, RED)
    }

    #[test]
    fn test_empty_overlays_leave_base_untouched() {
        let base = RgbaImage::from_pixel(320, 240, BACKGROUND);
        let out = Compositor::default().compose(&base, &model(320, 240).snapshot(), None);
        assert_eq!(out, base);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let mut model = model(640, 480);
        model.set_text("SAY CHEESE");
        model.select_sticker(ImageRef::new("red.png"));
        model.set_position(LayerKind::Sticker, OverlayCoordinate::new(25.0, 30.0));
        let base = RgbaImage::from_pixel(640, 480, BACKGROUND);
        let sticker = red_sticker();

        let compositor = Compositor::default();
        let first = compositor.compose(&base, &model.snapshot(), Some(&sticker));
        let second = compositor.compose(&base, &model.snapshot(), Some(&sticker));
        assert_eq!(first, second);
    }

    #[test]
    fn test_sticker_is_centered_and_sized() {
        let mut model = model(1280, 720);
        model.select_sticker(ImageRef::new("red.png"));
        let base = RgbaImage::from_pixel(1280, 720, BACKGROUND);
        let out = Compositor::default().compose(&base, &model.snapshot(), Some(&red_sticker()));

        // 100px square centered on (640, 360).
        assert_eq!(*out.get_pixel(640, 360), RED);
        assert_eq!(*out.get_pixel(591, 311), RED);
        assert_eq!(*out.get_pixel(688, 408), RED);
        assert_eq!(*out.get_pixel(589, 360), BACKGROUND);
        assert_eq!(*out.get_pixel(691, 360), BACKGROUND);
    }

    #[test]
    fn test_sticker_scales_with_target_width() {
        let mut model = model(1280, 720);
        model.select_sticker(ImageRef::new("red.png"));
        let placement = place_overlays(&model.snapshot(), FrameSize::new(640, 360));
        let sticker = placement.sticker.unwrap();
        assert_eq!(sticker.size, 50);
        assert_eq!((sticker.x, sticker.y), (295, 155));
    }

    #[test]
    fn test_text_drawn_over_sticker() {
        let mut model = model(1280, 720);
        model.set_text("I");
        model.apply_resize(LayerKind::Text, 70.0);
        model.select_sticker(ImageRef::new("red.png"));
        model.apply_resize(LayerKind::Sticker, 200.0);
        let base = RgbaImage::from_pixel(1280, 720, BACKGROUND);
        let out = Compositor::default().compose(&base, &model.snapshot(), Some(&red_sticker()));

        // Caption anchor is (640, 360); the "I" stem is at x 635..645, y 300..350.
        assert_eq!(*out.get_pixel(640, 320), FILL_COLOR);
        assert_eq!(*out.get_pixel(634, 320), STROKE_COLOR);
        // Sticker still visible around the caption.
        assert_eq!(*out.get_pixel(600, 420), RED);
    }

    #[test]
    fn test_text_anchor_follows_position() {
        let mut model = model(1280, 720);
        model.set_text("HI");
        model.set_position(LayerKind::Text, OverlayCoordinate::new(60.0, 70.0));
        model.apply_resize(LayerKind::Text, 96.0);
        let placement = place_overlays(&model.snapshot(), FrameSize::new(1280, 720));
        let text = placement.text.unwrap();
        assert_eq!((text.anchor_x, text.anchor_y), (768.0, 504.0));
        assert_eq!(text.font_px, 96.0);
        assert_eq!(text.stroke_width, 2.0);
    }

    #[test]
    fn test_preview_has_container_dimensions() {
        let mut model = model(1920, 1080);
        model.set_preview_size(FrameSize::new(360, 203));
        model.set_text("HELLO");
        let base = RgbaImage::from_pixel(1920, 1080, BACKGROUND);
        let preview = Compositor::default().render_preview(
            &base,
            &model.snapshot(),
            None,
            model.preview_size(),
        );
        assert_eq!(preview.dimensions(), (360, 203));

        let placement = place_overlays(&model.snapshot(), model.preview_size());
        let text = placement.text.unwrap();
        assert!((text.font_px as f64 - model.text().font_size_preview()).abs() < 1e-4);
    }

    #[test]
    fn test_preview_stretches_base_to_container() {
        // Left quarter red: a cover crop of this 2:1 base into a square
        // would cut it away entirely.
        let base = RgbaImage::from_fn(400, 200, |x, _| if x < 100 { RED } else { BACKGROUND });
        let mut model = model(400, 200);
        model.set_preview_size(FrameSize::new(200, 200));

        let preview = Compositor::default().render_preview(
            &base,
            &model.snapshot(),
            None,
            model.preview_size(),
        );
        assert_eq!(preview.dimensions(), (200, 200));
        assert_eq!(*preview.get_pixel(20, 100), RED);
        assert_eq!(*preview.get_pixel(150, 100), BACKGROUND);
    }

    #[test]
    fn test_missing_sticker_image_is_skipped() {
        let mut model = model(320, 240);
        model.select_sticker(ImageRef::new("gone.png"));
        let base = RgbaImage::from_pixel(320, 240, BACKGROUND);
        let out = Compositor::default().compose(&base, &model.snapshot(), None);
        assert_eq!(out, base);
    }
}
