//! Raw input events fed to the interpreter.
//!
//! Pointer positions are in preview container pixels. Hit testing is done
//! by the host, which knows where each overlay and handle is drawn, and is
//! reported with every press.

use serde::{Deserialize, Serialize};
use snapbooth_overlay_model::layer::LayerKind;

/// A pointer or touch position in preview pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &PointerPos) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Resize handle at a corner of an overlay's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Part of an overlay under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitRegion {
    Body,
    Handle(Corner),
}

/// The overlay part a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitTarget {
    pub layer: LayerKind,
    pub region: HitRegion,
}

impl HitTarget {
    pub fn body(layer: LayerKind) -> Self {
        Self {
            layer,
            region: HitRegion::Body,
        }
    }

    pub fn handle(layer: LayerKind, corner: Corner) -> Self {
        Self {
            layer,
            region: HitRegion::Handle(corner),
        }
    }
}

/// A raw input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse button or single pointer pressed.
    PointerDown {
        pos: PointerPos,
        /// What was hit, or `None` for empty space.
        target: Option<HitTarget>,
    },

    /// Pointer moved.
    PointerMove { pos: PointerPos },

    /// Pointer released, anywhere in the window.
    PointerUp,

    /// Touch contact started; `touches` lists every active contact.
    TouchStart {
        touches: Vec<PointerPos>,
        target: Option<HitTarget>,
    },

    /// Touch contacts moved.
    TouchMove { touches: Vec<PointerPos> },

    /// A touch contact lifted, anywhere in the window.
    TouchEnd,

    /// Wheel scrolled over an overlay.
    Wheel {
        /// Vertical wheel delta; negative scrolls up.
        delta_y: f64,
        target: Option<LayerKind>,
    },
}

impl InputEvent {
    pub fn down(x: f64, y: f64, target: Option<HitTarget>) -> Self {
        Self::PointerDown {
            pos: PointerPos::new(x, y),
            target,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::PointerMove {
            pos: PointerPos::new(x, y),
        }
    }

    /// Whether this event releases every pointer or contact.
    pub fn is_release(&self) -> bool {
        matches!(self, InputEvent::PointerUp | InputEvent::TouchEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = PointerPos::new(0.0, 0.0);
        let b = PointerPos::new(30.0, 40.0);
        assert!((a.distance_to(&b) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_json_shape() {
        let event = InputEvent::down(10.0, 20.0, Some(HitTarget::body(LayerKind::Sticker)));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"pointer_down\""));
        assert!(json.contains("\"layer\":\"sticker\""));

        let parsed: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_release_events() {
        assert!(InputEvent::PointerUp.is_release());
        assert!(InputEvent::TouchEnd.is_release());
        assert!(!InputEvent::moved(1.0, 1.0).is_release());
    }
}
