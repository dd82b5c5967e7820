pub mod capture;
pub mod compose;
pub mod stickers;
pub mod upload;

use std::path::PathBuf;

use clap::Args;
use snapbooth_capture_engine::source::StillImageSource;
use snapbooth_common::config::BoothConfig;
use snapbooth_overlay_model::layer::{ImageRef, LayerKind};
use snapbooth_overlay_model::transform::OverlayCoordinate;
use snapbooth_session::{JsonCatalog, PhotoBooth};

/// Photo and overlay placement shared by `compose` and `upload`.
#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Photo to annotate
    pub photo: PathBuf,

    /// Caption text
    #[arg(long)]
    pub text: Option<String>,

    /// Emoji appended to the caption (repeatable)
    #[arg(long)]
    pub emoji: Vec<String>,

    /// Caption position, percent of width
    #[arg(long, default_value = "50")]
    pub text_x: f64,

    /// Caption position, percent of height
    #[arg(long, default_value = "50")]
    pub text_y: f64,

    /// Caption size in photo pixels
    #[arg(long)]
    pub text_size: Option<f64>,

    /// Sticker image: a path or a data: URI
    #[arg(long, conflicts_with = "sticker_id")]
    pub sticker: Option<String>,

    /// Sticker id from --catalog
    #[arg(long, requires = "catalog")]
    pub sticker_id: Option<String>,

    /// Sticker catalog JSON file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Sticker position, percent of width
    #[arg(long, default_value = "50")]
    pub sticker_x: f64,

    /// Sticker position, percent of height
    #[arg(long, default_value = "50")]
    pub sticker_y: f64,

    /// Sticker size in photo pixels
    #[arg(long)]
    pub sticker_size: Option<f64>,
}

/// Capture `args.photo` into a booth and apply the requested overlays.
pub fn stage_booth(config: BoothConfig, args: &OverlayArgs) -> anyhow::Result<PhotoBooth> {
    let mut source = StillImageSource::open(&args.photo)
        .map_err(|e| anyhow::anyhow!("Failed to open photo: {e}"))?;

    let mut booth = PhotoBooth::new(config);
    booth.capture(&mut source)?;

    if let Some(text) = &args.text {
        booth.set_text(text.as_str());
    }
    for emoji in &args.emoji {
        booth.append_emoji(emoji);
    }
    booth.set_layer_position(
        LayerKind::Text,
        OverlayCoordinate::new(args.text_x, args.text_y),
    );
    if let Some(size) = args.text_size {
        booth.set_layer_size(LayerKind::Text, size);
    }

    if let Some(image) = sticker_ref(args)? {
        booth.select_sticker(image)?;
        booth.set_layer_position(
            LayerKind::Sticker,
            OverlayCoordinate::new(args.sticker_x, args.sticker_y),
        );
        if let Some(size) = args.sticker_size {
            booth.set_layer_size(LayerKind::Sticker, size);
        }
    }

    Ok(booth)
}

fn sticker_ref(args: &OverlayArgs) -> anyhow::Result<Option<ImageRef>> {
    if let Some(sticker) = &args.sticker {
        return Ok(Some(ImageRef::new(sticker.as_str())));
    }
    let (Some(id), Some(catalog_path)) = (&args.sticker_id, &args.catalog) else {
        return Ok(None);
    };
    let catalog = JsonCatalog::open(catalog_path)?;
    let entry = catalog
        .find(id)
        .ok_or_else(|| anyhow::anyhow!("No sticker {id:?} in {}", catalog_path.display()))?;
    Ok(Some(catalog.image_ref(entry)))
}
