//! Webcam frame source backed by nokhwa.

use image::{DynamicImage, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use snapbooth_common::config::CaptureDefaults;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_overlay_model::transform::FrameSize;

use crate::source::{FrameSource, VideoFrame};

/// An open webcam stream.
pub struct NokhwaCamera {
    camera: Camera,
    size: FrameSize,
    sequence: u64,
    streaming: bool,
}

impl NokhwaCamera {
    /// Open camera `index`, asking for the format closest to the configured
    /// ideal resolution. The camera may settle on a different one.
    pub fn open(index: u32, defaults: &CaptureDefaults) -> BoothResult<Self> {
        let format = CameraFormat::new(
            Resolution::new(defaults.ideal_width, defaults.ideal_height),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| BoothError::capture_unavailable(format!("open camera {index}: {e}")))?;
        camera
            .open_stream()
            .map_err(|e| BoothError::capture_unavailable(format!("start stream: {e}")))?;

        let actual = camera.resolution();
        let size = FrameSize::new(actual.width(), actual.height());
        tracing::info!(
            index,
            width = size.width,
            height = size.height,
            "Camera stream opened"
        );

        Ok(Self {
            camera,
            size,
            sequence: 0,
            streaming: true,
        })
    }
}

impl FrameSource for NokhwaCamera {
    fn name(&self) -> &str {
        "camera"
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn resolution(&self) -> Option<FrameSize> {
        Some(self.size)
    }

    fn grab_frame(&mut self) -> BoothResult<VideoFrame> {
        if !self.streaming {
            return Err(BoothError::capture_unavailable("camera stream stopped"));
        }
        let buffer = self
            .camera
            .frame()
            .map_err(|e| BoothError::capture_unavailable(format!("fetch frame: {e}")))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| BoothError::capture_unavailable(format!("decode frame: {e}")))?;

        let (width, height) = decoded.dimensions();
        let rgb = RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| BoothError::capture_unavailable("frame buffer size mismatch"))?;

        self.sequence += 1;
        Ok(VideoFrame {
            image: DynamicImage::ImageRgb8(rgb).to_rgba8(),
            sequence: self.sequence,
        })
    }

    fn stop(&mut self) {
        if self.streaming {
            if let Err(e) = self.camera.stop_stream() {
                tracing::warn!(error = %e, "Failed to stop camera stream");
            }
            self.streaming = false;
        }
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.stop();
    }
}
