//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BoothError, BoothResult};

/// Global booth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Camera capture settings.
    pub capture: CaptureDefaults,

    /// Overlay sizing and gesture tuning.
    pub overlay: OverlayDefaults,

    /// Export encoding settings.
    pub export: ExportSettings,

    /// Optional TrueType font used for the caption. The built-in bitmap
    /// face is used when unset.
    pub font_path: Option<PathBuf>,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Camera capture parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Ideal capture width requested from the camera.
    pub ideal_width: u32,

    /// Ideal capture height requested from the camera.
    pub ideal_height: u32,

    /// Burn the caption into a quick-preview still at capture time.
    pub burn_in_text: bool,
}

/// Overlay defaults and gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayDefaults {
    /// Caption size in capture pixels after a reset.
    pub text_size: f64,

    /// Sticker size in capture pixels when a sticker is selected.
    pub sticker_size: f64,

    /// Size change per unit of wheel delta (sign is inverted).
    pub wheel_step: f64,

    /// Fraction of pointer travel applied to handle resizes.
    pub resize_sensitivity: f64,
}

/// Export encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// JPEG quality in `[1, 100]`.
    pub jpeg_quality: u8,

    /// Suggested filename for screen downloads.
    pub download_filename: String,

    /// Filename attached to uploaded blobs.
    pub upload_filename: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "snapbooth=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            ideal_width: 1920,
            ideal_height: 1080,
            burn_in_text: false,
        }
    }
}

impl Default for OverlayDefaults {
    fn default() -> Self {
        Self {
            text_size: 48.0,
            sticker_size: 100.0,
            wheel_step: 0.5,
            resize_sensitivity: 0.5,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            download_filename: "photobooth.jpg".to_string(),
            upload_filename: "photo.jpg".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl BoothConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> BoothResult<Self> {
        if !path.exists() {
            return Err(BoothError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BoothError::config(format!("{}: {e}", path.display())))
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("snapbooth").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_booth_behavior() {
        let config = BoothConfig::default();
        assert_eq!(config.overlay.text_size, 48.0);
        assert_eq!(config.overlay.sticker_size, 100.0);
        assert_eq!(config.export.jpeg_quality, 95);
        assert_eq!(config.export.download_filename, "photobooth.jpg");
        assert_eq!(config.export.upload_filename, "photo.jpg");
        assert!(!config.capture.burn_in_text);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: BoothConfig =
            serde_json::from_str(r#"{"export": {"jpeg_quality": 80}}"#).unwrap();
        assert_eq!(config.export.jpeg_quality, 80);
        assert_eq!(config.export.upload_filename, "photo.jpg");
        assert_eq!(config.overlay.wheel_step, 0.5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = BoothConfig::load_from(Path::new("/nonexistent/snapbooth.json"));
        assert!(matches!(result, Err(BoothError::FileNotFound { .. })));
    }
}
