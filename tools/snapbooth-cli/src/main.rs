//! SnapBooth CLI: capture, annotate, and export booth photos.
//!
//! Usage:
//!   snapbooth compose <PHOTO> [OVERLAYS]     Compose a photo and save the download JPEG
//!   snapbooth upload <PHOTO> [OVERLAYS]      Compose a photo and upload it to a collage
//!   snapbooth stickers --catalog <FILE>      List the sticker catalog
//!   snapbooth capture [--synthetic WxH]      Capture a still from a frame source

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snapbooth_common::config::BoothConfig;

mod commands;

use commands::OverlayArgs;

#[derive(Parser)]
#[command(
    name = "snapbooth",
    about = "Photo booth with draggable captions and stickers",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/snapbooth/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a photo with overlays and save it as the download JPEG
    Compose {
        #[command(flatten)]
        overlay: OverlayArgs,

        /// Output file (defaults to the configured download filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the on-screen preview at this container width
        #[arg(long)]
        preview_width: Option<u32>,

        /// Where to write the preview PNG
        #[arg(long, default_value = "preview.png")]
        preview_output: PathBuf,
    },

    /// Compose a photo with overlays and upload it to a collage directory
    Upload {
        #[command(flatten)]
        overlay: OverlayArgs,

        /// Collage identifier
        #[arg(long)]
        collage: String,

        /// Storage root directory
        #[arg(long, default_value = "collages")]
        store: PathBuf,
    },

    /// List stickers from a catalog file
    Stickers {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,

        /// Only list stickers in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Capture a still from a frame source
    Capture {
        /// Use a synthetic test pattern of the given size, e.g. 1280x720
        #[arg(long, conflicts_with = "camera")]
        synthetic: Option<String>,

        /// Camera index (requires the `camera` feature)
        #[arg(long)]
        camera: Option<u32>,

        /// Output file
        #[arg(short, long, default_value = "capture.jpg")]
        output: PathBuf,

        /// Caption to burn into the quick preview
        #[arg(long)]
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BoothConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?,
        None => BoothConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    snapbooth_common::logging::init_logging(&logging)?;

    match cli.command {
        Commands::Compose {
            overlay,
            output,
            preview_width,
            preview_output,
        } => commands::compose::run(config, overlay, output, preview_width, preview_output).await,
        Commands::Upload {
            overlay,
            collage,
            store,
        } => commands::upload::run(config, overlay, collage, store).await,
        Commands::Stickers { catalog, category } => {
            commands::stickers::run(catalog, category).await
        }
        Commands::Capture {
            synthetic,
            camera,
            output,
            text,
        } => commands::capture::run(config, synthetic, camera, output, text),
    }
}
