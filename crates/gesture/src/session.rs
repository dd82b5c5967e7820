//! Gesture session state.

use snapbooth_overlay_model::layer::LayerKind;

use crate::event::{Corner, PointerPos};

/// Discriminant of a [`GestureSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Move,
    Resize,
    Pinch,
}

/// One continuous pointer or touch interaction on a single layer.
///
/// Only the fields meaningful for each kind exist, so a session cannot be
/// "resizing and pinching" at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureSession {
    /// Dragging a layer body. Deltas are measured from the previous event.
    Move {
        layer: LayerKind,
        last_pointer: PointerPos,
    },

    /// Dragging a corner handle.
    Resize {
        layer: LayerKind,
        corner: Corner,
        anchor_pointer: PointerPos,
        anchor_size: f64,
    },

    /// Two-finger pinch.
    Pinch {
        layer: LayerKind,
        anchor_distance: f64,
        anchor_size: f64,
    },
}

impl GestureSession {
    pub fn kind(&self) -> SessionKind {
        match self {
            GestureSession::Move { .. } => SessionKind::Move,
            GestureSession::Resize { .. } => SessionKind::Resize,
            GestureSession::Pinch { .. } => SessionKind::Pinch,
        }
    }

    /// The layer this session mutates.
    pub fn layer(&self) -> LayerKind {
        match self {
            GestureSession::Move { layer, .. }
            | GestureSession::Resize { layer, .. }
            | GestureSession::Pinch { layer, .. } => *layer,
        }
    }
}
