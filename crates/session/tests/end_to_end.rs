//! Capture, edit, and export a photo through the whole booth.

use std::io::Cursor;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use snapbooth_capture_engine::source::StillImageSource;
use snapbooth_common::error::BoothError;
use snapbooth_gesture::event::{HitTarget, InputEvent, PointerPos};
use snapbooth_overlay_model::layer::{ImageRef, LayerKind};
use snapbooth_overlay_model::transform::{FrameSize, OverlayCoordinate};
use snapbooth_render_engine::text::{FILL_COLOR, STROKE_COLOR};
use snapbooth_session::{DirectoryStore, FsImageLoader, PhotoBooth};

const BACKGROUND: Rgba<u8> = Rgba([40, 40, 40, 255]);
const RED: Rgba<u8> = Rgba([220, 30, 30, 255]);

fn red_sticker_uri() -> ImageRef {
    let sticker = RgbaImage::from_pixel(32, 32, RED);
    let mut png = Cursor::new(Vec::new());
    sticker.write_to(&mut png, ImageFormat::Png).unwrap();
    ImageRef::new(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.into_inner())
    ))
}

/// 1280x720 capture, "HI" at (60%, 70%) size 96, default sticker.
fn staged_booth() -> PhotoBooth {
    let mut source = StillImageSource::from_image(
        PathBuf::from("stage"),
        RgbaImage::from_pixel(1280, 720, BACKGROUND),
    );
    let mut booth = PhotoBooth::default();
    booth.capture(&mut source).unwrap();
    booth.set_preview_size(FrameSize::new(640, 360));

    booth.set_text("HI");
    booth.set_layer_position(LayerKind::Text, OverlayCoordinate::new(60.0, 70.0));
    booth.set_layer_size(LayerKind::Text, 96.0);
    booth.select_sticker(red_sticker_uri()).unwrap();
    booth
}

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("snapbooth_{name}_{}", std::process::id()))
}

#[tokio::test]
async fn test_composed_pixels_at_native_resolution() {
    let mut booth = staged_booth();
    let ticket = booth.begin_export().unwrap();
    let composed = ticket.compose(&FsImageLoader::new()).await.unwrap();

    assert_eq!(composed.dimensions(), (1280, 720));

    // Sticker: 100px square centered on (640, 360).
    assert_eq!(*composed.get_pixel(640, 360), RED);
    assert_eq!(*composed.get_pixel(592, 312), RED);
    assert_eq!(*composed.get_pixel(585, 360), BACKGROUND);

    // Caption: anchor (768, 504), glyph box 96px tall ending on the anchor.
    // The left stem of "H" spans x 693..706.
    assert_eq!(*composed.get_pixel(699, 450), FILL_COLOR);
    assert_eq!(*composed.get_pixel(692, 450), STROKE_COLOR);
    assert_eq!(*composed.get_pixel(768, 512), BACKGROUND);
    assert_eq!(*composed.get_pixel(768, 400), BACKGROUND);
}

#[tokio::test]
async fn test_caption_is_drawn_over_sticker() {
    let mut booth = staged_booth();
    booth.set_layer_position(LayerKind::Sticker, OverlayCoordinate::new(60.0, 65.0));
    booth.set_layer_size(LayerKind::Sticker, 300.0);

    let ticket = booth.begin_export().unwrap();
    let composed = ticket.compose(&FsImageLoader::new()).await.unwrap();

    // Sticker covers x 618..918, y 318..618; the caption sits inside it.
    assert_eq!(*composed.get_pixel(699, 450), FILL_COLOR);
    assert_eq!(*composed.get_pixel(650, 350), RED);
}

#[tokio::test]
async fn test_upload_writes_full_resolution_jpeg_and_resets() {
    let root = temp_root("e2e_upload");
    let store = DirectoryStore::new(&root);
    let mut booth = staged_booth();

    let receipt = booth
        .export_for_upload(&FsImageLoader::new(), &store, "party")
        .await
        .unwrap();
    assert_eq!((receipt.width, receipt.height), (1280, 720));
    assert_eq!(receipt.filename, "photo.jpg");

    let stored: Vec<_> = std::fs::read_dir(root.join("party"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(stored.len(), 1);
    let jpeg = std::fs::read(&stored[0]).unwrap();
    let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1280, 720));

    // Successful upload returns to the booth.
    assert!(!booth.has_photo());
    assert_eq!(booth.overlay().text().content(), "");
    assert!(booth.overlay().sticker().is_none());

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn test_download_keeps_session() {
    let mut booth = staged_booth();
    let export = booth.export_for_download(&FsImageLoader::new()).await.unwrap();

    assert!(export.data_uri.starts_with("data:image/jpeg;base64,"));
    assert_eq!(export.filename, "photobooth.jpg");
    assert_eq!((export.width, export.height), (1280, 720));
    assert!(booth.has_photo());
    assert_eq!(booth.overlay().text().content(), "HI");
    assert!(!booth.is_exporting());
}

#[tokio::test]
async fn test_undecodable_sticker_keeps_session() {
    let mut booth = staged_booth();
    booth
        .select_sticker(ImageRef::new("data:image/png;base64,bm90IGFuIGltYWdl"))
        .unwrap();

    let err = booth
        .export_for_download(&FsImageLoader::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BoothError::ImageDecode { .. }));
    assert!(booth.has_photo());
    assert!(!booth.is_exporting());
}

#[tokio::test]
async fn test_rejected_upload_keeps_session() {
    let mut booth = staged_booth();
    let store = DirectoryStore::new(temp_root("e2e_reject"));

    let err = booth
        .export_for_upload(&FsImageLoader::new(), &store, "../escape")
        .await
        .unwrap_err();
    assert!(matches!(err, BoothError::Upload { .. }));
    assert!(booth.has_photo());
    assert_eq!(booth.overlay().text().content(), "HI");
}

#[tokio::test]
async fn test_pinch_and_wheel_on_sticker() {
    let mut booth = staged_booth();
    let target = Some(HitTarget::body(LayerKind::Sticker));

    booth.handle_input(&InputEvent::TouchStart {
        touches: vec![PointerPos::new(300.0, 180.0), PointerPos::new(340.0, 180.0)],
        target,
    });
    booth.handle_input(&InputEvent::TouchMove {
        touches: vec![PointerPos::new(280.0, 180.0), PointerPos::new(360.0, 180.0)],
    });
    booth.handle_input(&InputEvent::TouchEnd);
    assert_eq!(booth.overlay().sticker().unwrap().size_capture(), 200.0);

    booth.handle_input(&InputEvent::Wheel {
        delta_y: 100.0,
        target: Some(LayerKind::Sticker),
    });
    assert_eq!(booth.overlay().sticker().unwrap().size_capture(), 150.0);

    // Text untouched by sticker gestures.
    assert_eq!(booth.overlay().text().font_size_capture(), 96.0);
}
