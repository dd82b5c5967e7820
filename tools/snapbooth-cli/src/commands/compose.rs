//! Compose a photo with overlays into the download JPEG.

use std::path::PathBuf;

use snapbooth_common::config::BoothConfig;
use snapbooth_overlay_model::transform::FrameSize;
use snapbooth_session::{decode_data_uri, FsImageLoader};

use super::{stage_booth, OverlayArgs};

pub async fn run(
    config: BoothConfig,
    overlay: OverlayArgs,
    output: Option<PathBuf>,
    preview_width: Option<u32>,
    preview_output: PathBuf,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(&config.export.download_filename));
    let mut booth = stage_booth(config, &overlay)?;
    let loader = FsImageLoader::new();

    println!("Composing: {}", overlay.photo.display());
    if let Some(photo) = booth.photo() {
        println!("  Resolution: {}x{}", photo.width(), photo.height());
    }

    if let Some(width) = preview_width.filter(|w| *w > 0) {
        let capture = booth.overlay().capture_size();
        let height = (capture.height as u64 * width as u64 / capture.width.max(1) as u64) as u32;
        booth.set_preview_size(FrameSize::new(width, height.max(1)));
        let preview = booth.render_preview(&loader).await?;
        preview.save(&preview_output)?;
        println!("  Preview: {} ({width}x{})", preview_output.display(), preview.height());
    }

    let export = booth.export_for_download(&loader).await?;
    let jpeg = decode_data_uri(&export.data_uri)
        .ok_or_else(|| anyhow::anyhow!("Download export is not a data URI"))??;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, &jpeg)?;

    println!("  Output: {} ({} bytes)", output.display(), jpeg.len());
    Ok(())
}
