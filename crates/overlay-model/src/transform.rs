//! Coordinate transforms between overlay space and pixel rasters.
//!
//! Overlay coordinates are percentages of the container: `(0, 0)` is the
//! top-left corner, `(100, 100)` the bottom-right. The same coordinate maps
//! onto the preview container, the live video, and the captured still.

use serde::{Deserialize, Serialize};

/// Upper bound of an overlay coordinate axis.
pub const PERCENT_MAX: f64 = 100.0;

/// A position relative to the container, in percent per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayCoordinate {
    /// Horizontal position [0, 100].
    pub x: f64,
    /// Vertical position [0, 100].
    pub y: f64,
}

impl OverlayCoordinate {
    /// Container center.
    pub const CENTER: OverlayCoordinate = OverlayCoordinate { x: 50.0, y: 50.0 };

    /// Create a coordinate, clamping both axes to `[0, 100]`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    /// Add a delta and clamp each axis independently.
    ///
    /// A delta that would cross a bound pins the axis at that bound.
    pub fn offset(&self, delta: CoordinateDelta) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }
}

impl Default for OverlayCoordinate {
    fn default() -> Self {
        Self::CENTER
    }
}

/// A relative displacement in percent per axis. Not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Dimensions of a pixel raster (preview container, video, or still).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map an overlay coordinate onto a target raster.
pub fn to_pixels(coord: OverlayCoordinate, target_width: u32, target_height: u32) -> (f64, f64) {
    (
        target_width as f64 * coord.x / PERCENT_MAX,
        target_height as f64 * coord.y / PERCENT_MAX,
    )
}

/// Map a pixel position in a target raster back to an overlay coordinate.
pub fn to_percent(px: f64, py: f64, target_width: u32, target_height: u32) -> OverlayCoordinate {
    OverlayCoordinate::new(
        px / target_width.max(1) as f64 * PERCENT_MAX,
        py / target_height.max(1) as f64 * PERCENT_MAX,
    )
}

/// Convert a pixel displacement in a target raster to a relative delta.
pub fn from_delta(
    delta_px: f64,
    delta_py: f64,
    target_width: u32,
    target_height: u32,
) -> CoordinateDelta {
    CoordinateDelta {
        dx: delta_px / target_width.max(1) as f64 * PERCENT_MAX,
        dy: delta_py / target_height.max(1) as f64 * PERCENT_MAX,
    }
}

/// Ratio of preview width to capture width.
///
/// Derive it on every use: the preview container can resize at any time
/// (orientation change, window resize).
pub fn scale_factor(capture_width: u32, preview_width: u32) -> f64 {
    preview_width as f64 / capture_width.max(1) as f64
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, PERCENT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixels_center() {
        let (px, py) = to_pixels(OverlayCoordinate::CENTER, 1920, 1080);
        assert!((px - 960.0).abs() < 1e-9);
        assert!((py - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_pixels_end_to_end_anchor() {
        let (px, py) = to_pixels(OverlayCoordinate::new(60.0, 70.0), 1280, 720);
        assert!((px - 768.0).abs() < 1e-9);
        assert!((py - 504.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_percent_inverts_to_pixels() {
        let coord = OverlayCoordinate::new(33.0, 81.5);
        let (px, py) = to_pixels(coord, 640, 480);
        let back = to_percent(px, py, 640, 480);
        assert!((back.x - coord.x).abs() < 1e-9);
        assert!((back.y - coord.y).abs() < 1e-9);
    }

    #[test]
    fn test_offset_clamps_instead_of_wrapping() {
        let coord = OverlayCoordinate::new(95.0, 3.0);
        let moved = coord.offset(CoordinateDelta { dx: 20.0, dy: -10.0 });
        assert_eq!(moved, OverlayCoordinate { x: 100.0, y: 0.0 });
    }

    #[test]
    fn test_from_delta_uses_target_dimensions() {
        let delta = from_delta(36.0, -64.0, 360, 640);
        assert!((delta.dx - 10.0).abs() < 1e-9);
        assert!((delta.dy + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sized_target_does_not_divide_by_zero() {
        let delta = from_delta(5.0, 5.0, 0, 0);
        assert!(delta.dx.is_finite());
        assert!(delta.dy.is_finite());
        assert!(scale_factor(0, 360).is_finite());
    }

    #[test]
    fn test_scale_factor_tracks_preview_width() {
        assert!((scale_factor(1920, 360) - 0.1875).abs() < 1e-12);
        assert!((scale_factor(1920, 480) - 0.25).abs() < 1e-12);
        // Same inputs, same output: nothing drifts between calls.
        assert_eq!(scale_factor(1920, 360), scale_factor(1920, 360));
    }

    #[test]
    fn test_nan_is_pinned_to_origin() {
        let coord = OverlayCoordinate::new(f64::NAN, 50.0);
        assert_eq!(coord.x, 0.0);
    }
}
