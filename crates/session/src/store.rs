//! Collage storage: where uploaded photos go.

use std::path::{Path, PathBuf};

use chrono::Utc;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_render_engine::export::PhotoBlob;

/// Remote or local storage for a collage's photos.
#[async_trait::async_trait]
pub trait CollageStore: Send + Sync {
    /// Store `blob` under `collage_id`. `Ok(false)` means the store refused it.
    async fn upload_photo(&self, collage_id: &str, blob: &PhotoBlob) -> BoothResult<bool>;
}

/// Writes each upload to `<root>/<collage_id>/<timestamp>-<filename>`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a collage's photos.
    pub fn collage_dir(&self, collage_id: &str) -> BoothResult<PathBuf> {
        validate_collage_id(collage_id)?;
        Ok(self.root.join(collage_id))
    }
}

fn validate_collage_id(collage_id: &str) -> BoothResult<()> {
    let valid = !collage_id.is_empty()
        && collage_id != "."
        && collage_id != ".."
        && !collage_id.contains(['/', '\\']);
    if valid {
        Ok(())
    } else {
        Err(BoothError::upload(format!("invalid collage id {collage_id:?}")))
    }
}

#[async_trait::async_trait]
impl CollageStore for DirectoryStore {
    async fn upload_photo(&self, collage_id: &str, blob: &PhotoBlob) -> BoothResult<bool> {
        let dir = self.collage_dir(collage_id)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BoothError::upload(format!("{}: {e}", dir.display())))?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let path = dir.join(format!("{stamp}-{}", blob.filename));
        tokio::fs::write(&path, &blob.bytes)
            .await
            .map_err(|e| BoothError::upload(format!("{}: {e}", path.display())))?;

        tracing::info!(
            collage = collage_id,
            path = %path.display(),
            bytes = blob.len(),
            "Photo stored"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> PhotoBlob {
        PhotoBlob {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
            filename: "photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            width: 1,
            height: 1,
        }
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let root = std::env::temp_dir().join(format!("snapbooth_store_{}", std::process::id()));
        let store = DirectoryStore::new(&root);

        assert!(store.upload_photo("wedding-42", &blob()).await.unwrap());

        let entries: Vec<_> = std::fs::read_dir(root.join("wedding-42"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("-photo.jpg"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let store = DirectoryStore::new(std::env::temp_dir());
        for id in ["", "..", "a/b", "a\\b"] {
            let err = store.upload_photo(id, &blob()).await.unwrap_err();
            assert!(matches!(err, BoothError::Upload { .. }), "{id:?}");
        }
    }
}
