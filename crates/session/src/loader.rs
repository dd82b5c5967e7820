//! Resolving image references to decoded rasters.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::RgbaImage;
use snapbooth_common::error::{BoothError, BoothResult, CANVAS_CONTEXT_MESSAGE};
use snapbooth_overlay_model::layer::ImageRef;

/// Loads the image behind an [`ImageRef`].
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetch and fully decode the image.
    async fn load(&self, image: &ImageRef) -> BoothResult<RgbaImage>;
}

/// Loads `data:` URIs and filesystem paths.
///
/// Relative paths are resolved against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    base_dir: Option<PathBuf>,
}

impl FsImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, image: &ImageRef) -> BoothResult<RgbaImage> {
        let bytes = match decode_data_uri(image.as_str()) {
            Some(bytes) => bytes?,
            None => {
                let path = self.resolve(image.as_str());
                match tokio::fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(BoothError::FileNotFound { path });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };
        tracing::trace!(image = %image, bytes = bytes.len(), "Decoding image");
        decode_image(bytes).await
    }
}

/// Payload of a base64 `data:` URI, or `None` if `reference` is not one.
pub fn decode_data_uri(reference: &str) -> Option<BoothResult<Vec<u8>>> {
    let rest = reference.strip_prefix("data:")?;
    let Some((meta, payload)) = rest.split_once(',') else {
        return Some(Err(BoothError::image_decode("malformed data URI")));
    };
    if !meta.ends_with(";base64") {
        return Some(Err(BoothError::image_decode(
            "only base64 data URIs are supported",
        )));
    }
    Some(
        STANDARD
            .decode(payload.trim())
            .map_err(|e| BoothError::image_decode(format!("invalid base64 payload: {e}"))),
    )
}

/// Decode encoded image bytes on the blocking pool.
pub async fn decode_image(bytes: Vec<u8>) -> BoothResult<RgbaImage> {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|_| BoothError::image_decode(CANVAS_CONTEXT_MESSAGE))?
        .map_err(|e| BoothError::image_decode(e.to_string()))?
        .to_rgba8();

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(BoothError::image_decode(CANVAS_CONTEXT_MESSAGE));
    }
    Ok(decoded)
}
