//! List the sticker catalog.

use std::path::PathBuf;

use snapbooth_session::{JsonCatalog, StickerCatalog};

pub async fn run(catalog_path: PathBuf, category: Option<String>) -> anyhow::Result<()> {
    let catalog = JsonCatalog::open(&catalog_path)
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {e}"))?;

    let stickers = catalog.stickers(category.as_deref()).await?;

    println!("Sticker catalog: {}", catalog_path.display());
    println!("{}", "=".repeat(50));
    println!("Categories: {}", catalog.categories().join(", "));
    println!();

    if stickers.is_empty() {
        println!("No stickers found.");
        return Ok(());
    }

    for sticker in &stickers {
        println!("  {:<20} [{}] {}", sticker.id, sticker.category, catalog.image_ref(sticker));
    }
    println!();
    println!("{} sticker(s)", stickers.len());

    Ok(())
}
