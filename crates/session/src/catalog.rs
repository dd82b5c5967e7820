//! Sticker catalog.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_overlay_model::layer::ImageRef;

/// One selectable sticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerEntry {
    pub id: String,
    /// Image location: a `data:` URI, an absolute path, or a path relative
    /// to the catalog file.
    pub url: String,
    pub category: String,
}

/// Source of selectable stickers.
#[async_trait::async_trait]
pub trait StickerCatalog: Send + Sync {
    /// Stickers, optionally restricted to one category.
    async fn stickers(&self, category: Option<&str>) -> BoothResult<Vec<StickerEntry>>;
}

/// Catalog read from a JSON array of [`StickerEntry`].
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    entries: Vec<StickerEntry>,
    base_dir: Option<PathBuf>,
}

impl JsonCatalog {
    pub fn open(path: &Path) -> BoothResult<Self> {
        if !path.exists() {
            return Err(BoothError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<StickerEntry> = serde_json::from_str(&content)
            .map_err(|e| BoothError::catalog(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_entries(entries, path.parent().map(Path::to_path_buf))?;
        tracing::debug!(
            path = %path.display(),
            stickers = catalog.len(),
            "Loaded sticker catalog"
        );
        Ok(catalog)
    }

    pub fn from_entries(
        entries: Vec<StickerEntry>,
        base_dir: Option<PathBuf>,
    ) -> BoothResult<Self> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.id.is_empty() {
                return Err(BoothError::catalog("sticker with empty id"));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(BoothError::catalog(format!("duplicate sticker id {:?}", entry.id)));
            }
        }
        Ok(Self { entries, base_dir })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&StickerEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Distinct categories in sorted order.
    pub fn categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Image reference for an entry, with relative paths resolved against
    /// the catalog's directory.
    pub fn image_ref(&self, entry: &StickerEntry) -> ImageRef {
        let url = entry.url.as_str();
        if url.starts_with("data:") || Path::new(url).is_absolute() {
            return ImageRef::new(url);
        }
        match &self.base_dir {
            Some(base) => ImageRef::new(base.join(url).to_string_lossy().into_owned()),
            None => ImageRef::new(url),
        }
    }
}

#[async_trait::async_trait]
impl StickerCatalog for JsonCatalog {
    async fn stickers(&self, category: Option<&str>) -> BoothResult<Vec<StickerEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| category.map_or(true, |c| entry.category == c))
            .cloned()
            .collect())
    }
}
