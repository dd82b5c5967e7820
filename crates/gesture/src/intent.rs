//! Normalized overlay intents produced by the interpreter.

use snapbooth_overlay_model::layer::LayerKind;
use snapbooth_overlay_model::model::OverlayModel;

use crate::event::Corner;

/// An edit the interpreter asks the overlay model to perform.
///
/// Sizes are in capture pixels; move deltas are in preview pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureIntent {
    BeginMove { layer: LayerKind },
    Move { layer: LayerKind, dx: f64, dy: f64 },
    EndMove { layer: LayerKind },

    BeginResize { layer: LayerKind, corner: Corner },
    Resize { layer: LayerKind, size: f64 },
    EndResize { layer: LayerKind },

    BeginPinch { layer: LayerKind },
    PinchResize { layer: LayerKind, size: f64 },
    EndPinch { layer: LayerKind },

    /// Immediate resize from a wheel notch.
    WheelResize { layer: LayerKind, size: f64 },
}

impl GestureIntent {
    pub fn layer(&self) -> LayerKind {
        match self {
            GestureIntent::BeginMove { layer }
            | GestureIntent::Move { layer, .. }
            | GestureIntent::EndMove { layer }
            | GestureIntent::BeginResize { layer, .. }
            | GestureIntent::Resize { layer, .. }
            | GestureIntent::EndResize { layer }
            | GestureIntent::BeginPinch { layer }
            | GestureIntent::PinchResize { layer, .. }
            | GestureIntent::EndPinch { layer }
            | GestureIntent::WheelResize { layer, .. } => *layer,
        }
    }

    /// Apply this intent to the model. Returns true when the model changed.
    pub fn apply_to(&self, model: &mut OverlayModel) -> bool {
        match *self {
            GestureIntent::Move { layer, dx, dy } => model.apply_move_px(layer, dx, dy),
            GestureIntent::Resize { layer, size }
            | GestureIntent::PinchResize { layer, size }
            | GestureIntent::WheelResize { layer, size } => model.apply_resize(layer, size),
            _ => false,
        }
    }
}

/// Apply a batch of intents in order. Returns how many changed the model.
pub fn apply_intents(model: &mut OverlayModel, intents: &[GestureIntent]) -> usize {
    intents
        .iter()
        .filter(|intent| intent.apply_to(model))
        .count()
}
