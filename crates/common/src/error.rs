//! Error types shared across SnapBooth crates.

use std::path::PathBuf;

/// Message surfaced when a rendering surface or a source image cannot be prepared.
pub const CANVAS_CONTEXT_MESSAGE: &str = "Failed to create canvas context";

/// Top-level error type for SnapBooth operations.
#[derive(Debug, thiserror::Error)]
pub enum BoothError {
    #[error("Camera unavailable: {message}")]
    CaptureUnavailable { message: String },

    #[error("Image decode failed: {message}")]
    ImageDecode { message: String },

    #[error("Upload failed: {message}")]
    Upload { message: String },

    #[error("Rendering context unavailable: {message}")]
    ContextUnavailable { message: String },

    #[error("An export is already in progress")]
    ExportInFlight,

    #[error("No photo has been captured")]
    NoPhoto,

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using BoothError.
pub type BoothResult<T> = Result<T, BoothError>;

impl BoothError {
    pub fn capture_unavailable(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable {
            message: msg.into(),
        }
    }

    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: msg.into(),
        }
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload {
            message: msg.into(),
        }
    }

    pub fn context_unavailable(msg: impl Into<String>) -> Self {
        Self::ContextUnavailable {
            message: msg.into(),
        }
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the editable session survives this error untouched.
    ///
    /// Failed captures and exports abort only the attempt; the user retries.
    /// `NoPhoto` means there was no session to keep.
    pub fn preserves_session(&self) -> bool {
        !matches!(self, Self::NoPhoto)
    }
}
