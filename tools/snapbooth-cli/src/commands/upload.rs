//! Compose a photo with overlays and upload it to collage storage.

use std::path::PathBuf;

use snapbooth_common::config::BoothConfig;
use snapbooth_session::{DirectoryStore, FsImageLoader};

use super::{stage_booth, OverlayArgs};

pub async fn run(
    config: BoothConfig,
    overlay: OverlayArgs,
    collage: String,
    store: PathBuf,
) -> anyhow::Result<()> {
    let mut booth = stage_booth(config, &overlay)?;
    let store = DirectoryStore::new(store);

    println!("Uploading: {}", overlay.photo.display());
    println!("  Collage: {collage}");
    println!("  Store: {}", store.root().display());

    match booth
        .export_for_upload(&FsImageLoader::new(), &store, &collage)
        .await
    {
        Ok(receipt) => {
            println!(
                "  Uploaded {} ({}x{}, {} bytes)",
                receipt.filename, receipt.width, receipt.height, receipt.bytes
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Upload failed");
            Err(anyhow::anyhow!("Upload failed: {e}"))
        }
    }
}
