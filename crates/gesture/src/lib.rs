//! SnapBooth Gesture Interpreter
//!
//! Turns raw pointer, touch, and wheel events into overlay intents:
//!
//! - **Move:** single pointer down on a layer body, then drag
//! - **Resize:** pointer down on a corner handle, dominant-axis drag
//! - **Pinch:** two-finger touch, scale by finger distance
//! - **Wheel:** immediate resize, no session
//!
//! Exactly one [`GestureSession`] can be active. Any pointer-up or
//! touch-end, wherever it lands, ends it.

pub mod event;
pub mod intent;
pub mod interpreter;
pub mod session;

pub use event::*;
pub use intent::*;
pub use interpreter::*;
pub use session::*;
