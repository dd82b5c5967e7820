//! Capture a still from a frame source.

use std::path::PathBuf;

use snapbooth_capture_engine::source::{FrameSource, SyntheticSource};
use snapbooth_common::config::BoothConfig;
use snapbooth_render_engine::export::encode_jpeg;
use snapbooth_session::PhotoBooth;

pub fn run(
    config: BoothConfig,
    synthetic: Option<String>,
    camera: Option<u32>,
    output: PathBuf,
    text: Option<String>,
) -> anyhow::Result<()> {
    let quality = config.export.jpeg_quality;
    let mut source = open_source(&config, synthetic, camera)?;
    println!("Capturing from: {}", source.name());

    let mut booth = PhotoBooth::new(config);
    if let Some(text) = text {
        booth.set_text(text);
    }

    let photo = booth.capture(source.as_mut())?;
    let (width, height) = (photo.width(), photo.height());
    let jpeg = encode_jpeg(photo.raster(), quality)?;
    std::fs::write(&output, &jpeg)?;
    println!("  Photo: {} ({width}x{height})", output.display());

    if let Some(preview) = booth.quick_preview() {
        let preview_path = output.with_extension("preview.jpg");
        std::fs::write(&preview_path, encode_jpeg(preview, quality)?)?;
        println!("  Quick preview: {}", preview_path.display());
    }

    source.stop();
    Ok(())
}

fn open_source(
    config: &BoothConfig,
    synthetic: Option<String>,
    camera: Option<u32>,
) -> anyhow::Result<Box<dyn FrameSource>> {
    if let Some(index) = camera {
        return open_camera(config, index);
    }
    let (width, height) = match synthetic {
        Some(size) => parse_size(&size)?,
        None => (config.capture.ideal_width, config.capture.ideal_height),
    };
    Ok(Box::new(SyntheticSource::new(width, height)))
}

#[cfg(feature = "camera")]
fn open_camera(config: &BoothConfig, index: u32) -> anyhow::Result<Box<dyn FrameSource>> {
    let camera = snapbooth_capture_engine::camera::NokhwaCamera::open(index, &config.capture)?;
    Ok(Box::new(camera))
}

#[cfg(not(feature = "camera"))]
fn open_camera(_config: &BoothConfig, _index: u32) -> anyhow::Result<Box<dyn FrameSource>> {
    anyhow::bail!("Camera support not compiled in; rebuild with --features camera")
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(value: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("Expected WIDTHxHEIGHT, got {value:?}"))?;
    let width: u32 = w.trim().parse()?;
    let height: u32 = h.trim().parse()?;
    if width == 0 || height == 0 {
        anyhow::bail!("Frame size must be non-zero, got {value:?}");
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_size("640X480").unwrap(), (640, 480));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x720").is_err());
    }
}
