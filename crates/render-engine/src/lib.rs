//! SnapBooth Render Engine
//!
//! Composites a captured photo with its overlays at the photo's native
//! resolution and encodes the result for download or upload.
//!
//! # Pipeline
//!
//! ```text
//! CapturedPhoto ──┐
//!                 ├── Sticker (resized, centered on its anchor)
//! sticker image ──┘         │
//!                           ├── Caption (stroke, then fill)
//! OverlaySnapshot ──────────┘         │
//!                                     ▼
//!                               JPEG (quality 95)
//!                                │           │
//!                                ▼           ▼
//!                           data: URI    photo.jpg blob
//! ```
//!
//! The preview renderer runs the same overlay routine on a downscaled base,
//! so what the user sees is what gets exported.

pub mod compositor;
pub mod export;
pub mod text;

pub use compositor::*;
pub use export::*;
pub use text::*;
