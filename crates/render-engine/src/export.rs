//! JPEG encoding for the two export destinations.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{RgbImage, RgbaImage};
use snapbooth_common::config::ExportSettings;
use snapbooth_common::error::{BoothError, BoothResult};

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// A composed photo encoded for an on-screen download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadExport {
    /// `data:image/jpeg;base64,...`
    pub data_uri: String,
    /// Suggested filename for the browser or file dialog.
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// A composed photo encoded for upload to collage storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoBlob {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
}

impl PhotoBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode an RGBA raster as JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> BoothResult<Vec<u8>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(BoothError::context_unavailable("cannot encode an empty raster"));
    }
    let rgb: RgbImage = image.convert();
    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| BoothError::context_unavailable(format!("JPEG encoding failed: {e}")))?;
    Ok(bytes.into_inner())
}

/// Wrap JPEG bytes in a `data:` URI.
pub fn to_data_uri(jpeg: &[u8]) -> String {
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + jpeg.len() * 4 / 3 + 4);
    uri.push_str(DATA_URI_PREFIX);
    STANDARD.encode_string(jpeg, &mut uri);
    uri
}

/// Encode a composed raster for download.
pub fn export_for_download(
    composed: &RgbaImage,
    settings: &ExportSettings,
) -> BoothResult<DownloadExport> {
    let jpeg = encode_jpeg(composed, settings.jpeg_quality)?;
    tracing::debug!(bytes = jpeg.len(), "Encoded download JPEG");
    Ok(DownloadExport {
        data_uri: to_data_uri(&jpeg),
        filename: settings.download_filename.clone(),
        width: composed.width(),
        height: composed.height(),
    })
}

/// Encode a composed raster for upload.
pub fn export_for_upload(
    composed: &RgbaImage,
    settings: &ExportSettings,
) -> BoothResult<PhotoBlob> {
    let bytes = encode_jpeg(composed, settings.jpeg_quality)?;
    tracing::debug!(bytes = bytes.len(), "Encoded upload JPEG");
    Ok(PhotoBlob {
        bytes,
        filename: settings.upload_filename.clone(),
        content_type: JPEG_CONTENT_TYPE.to_string(),
        width: composed.width(),
        height: composed.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        })
    }

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let jpeg = encode_jpeg(&gradient(321, 123), 95).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (321, 123));
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let image = gradient(256, 256);
        let high = encode_jpeg(&image, 95).unwrap();
        let low = encode_jpeg(&image, 10).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_empty_raster_is_rejected() {
        let err = encode_jpeg(&RgbaImage::new(0, 10), 95).unwrap_err();
        assert!(matches!(err, BoothError::ContextUnavailable { .. }));
    }

    #[test]
    fn test_download_is_data_uri() {
        let export = export_for_download(&gradient(64, 48), &ExportSettings::default()).unwrap();
        assert!(export.data_uri.starts_with("data:image/jpeg;base64,/9j/"));
        assert_eq!(export.filename, "photobooth.jpg");
        assert_eq!((export.width, export.height), (64, 48));
    }

    #[test]
    fn test_upload_blob_metadata() {
        let blob = export_for_upload(&gradient(64, 48), &ExportSettings::default()).unwrap();
        assert_eq!(blob.filename, "photo.jpg");
        assert_eq!(blob.content_type, "image/jpeg");
        assert!(!blob.is_empty());
    }
}
