//! SnapBooth Overlay Model
//!
//! Defines the overlay data contracts for a booth session:
//! - **Transform:** Mapping between relative overlay coordinates and pixels
//! - **Layers:** The caption (text) layer and the sticker layer
//! - **Model:** The editable overlay state and its invariants
//!
//! Overlay positions are stored as percentages `[0, 100]` of the container
//! so they survive any change between preview and capture resolution.
//! Sizes are stored in capture-space pixels.

pub mod layer;
pub mod model;
pub mod transform;

pub use layer::*;
pub use model::*;
pub use transform::*;
