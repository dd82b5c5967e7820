//! Frame sources: anything that can hand over the current video frame.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_overlay_model::transform::FrameSize;

/// One decoded frame at the source's native resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub image: RgbaImage,
    /// Monotonic frame counter of the source.
    pub sequence: u64,
}

impl VideoFrame {
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.image.width(), self.image.height())
    }
}

/// A live (or simulated) video stream.
pub trait FrameSource {
    /// Human-readable source name for logs.
    fn name(&self) -> &str;

    /// Whether frames can currently be read.
    fn is_streaming(&self) -> bool;

    /// Native resolution of the stream, once known.
    fn resolution(&self) -> Option<FrameSize>;

    /// Read the current frame.
    fn grab_frame(&mut self) -> BoothResult<VideoFrame>;

    /// Stop the stream. Later reads are refused.
    fn stop(&mut self);
}

/// Serves the same decoded image file as every frame.
#[derive(Debug, Clone)]
pub struct StillImageSource {
    path: PathBuf,
    image: RgbaImage,
    sequence: u64,
    streaming: bool,
}

impl StillImageSource {
    pub fn open(path: &Path) -> BoothResult<Self> {
        if !path.exists() {
            return Err(BoothError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let image = image::open(path)
            .map_err(|e| BoothError::image_decode(format!("{}: {e}", path.display())))?
            .to_rgba8();
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Opened still image source"
        );
        Ok(Self::from_image(path.to_path_buf(), image))
    }

    pub fn from_image(path: PathBuf, image: RgbaImage) -> Self {
        Self {
            path,
            image,
            sequence: 0,
            streaming: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for StillImageSource {
    fn name(&self) -> &str {
        "still-image"
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn resolution(&self) -> Option<FrameSize> {
        Some(FrameSize::new(self.image.width(), self.image.height()))
    }

    fn grab_frame(&mut self) -> BoothResult<VideoFrame> {
        if !self.streaming {
            return Err(BoothError::capture_unavailable("still image source stopped"));
        }
        self.sequence += 1;
        Ok(VideoFrame {
            image: self.image.clone(),
            sequence: self.sequence,
        })
    }

    fn stop(&mut self) {
        self.streaming = false;
    }
}

/// Generates a test pattern; each frame moves a marker so frames differ.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    size: FrameSize,
    sequence: u64,
    streaming: bool,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: FrameSize::new(width, height),
            sequence: 0,
            streaming: true,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn resolution(&self) -> Option<FrameSize> {
        Some(self.size)
    }

    fn grab_frame(&mut self) -> BoothResult<VideoFrame> {
        if !self.streaming {
            return Err(BoothError::capture_unavailable("synthetic source stopped"));
        }
        if self.size.is_empty() {
            return Err(BoothError::capture_unavailable("synthetic source has no frame size"));
        }
        self.sequence += 1;
        Ok(VideoFrame {
            image: test_pattern(self.size.width, self.size.height, self.sequence),
            sequence: self.sequence,
        })
    }

    fn stop(&mut self) {
        self.streaming = false;
    }
}

/// Color-bar test pattern with a marker that advances with `frame`.
pub fn test_pattern(width: u32, height: u32, frame: u64) -> RgbaImage {
    const BARS: [[u8; 3]; 7] = [
        [192, 192, 192],
        [192, 192, 0],
        [0, 192, 192],
        [0, 192, 0],
        [192, 0, 192],
        [192, 0, 0],
        [0, 0, 192],
    ];

    let mut img = RgbaImage::from_pixel(width, height, Rgba([16, 16, 16, 255]));
    let bar_height = (height * 2 / 3).max(1);
    for (i, [r, g, b]) in BARS.iter().enumerate() {
        let x0 = width * i as u32 / BARS.len() as u32;
        let x1 = width * (i as u32 + 1) / BARS.len() as u32;
        if x1 > x0 {
            draw_filled_rect_mut(
                &mut img,
                Rect::at(x0 as i32, 0).of_size(x1 - x0, bar_height),
                Rgba([*r, *g, *b, 255]),
            );
        }
    }

    // Moving marker along the bottom band
    let radius = (height / 12).max(2) as i32;
    let travel = width.saturating_sub(2 * radius as u32).max(1) as u64;
    let cx = radius + ((frame * 16) % travel) as i32;
    let cy = (bar_height + (height - bar_height) / 2) as i32;
    draw_filled_circle_mut(&mut img, (cx, cy), radius, Rgba([240, 240, 240, 255]));

    img
}
