//! SnapBooth Capture Engine
//!
//! Freezes a frame from a live source into a [`CapturedPhoto`], the
//! native-resolution still that every export is composed on.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               CapturePipeline                 │
//! │  ┌─────────────┐                              │
//! │  │ FrameSource │── VideoFrame ──┐              │
//! │  │ (camera,    │                ▼              │
//! │  │  still,     │        ┌───────────────┐     │
//! │  │  synthetic) │        │ CapturedPhoto │     │
//! │  └─────────────┘        └───────┬───────┘     │
//! │                                 │ burn-in?    │
//! │                                 ▼             │
//! │                       quick-preview raster    │
//! └──────────────────────────────────────────────┘
//! ```

#[cfg(feature = "camera")]
pub mod camera;
pub mod pipeline;
pub mod source;

pub use pipeline::*;
pub use source::*;
