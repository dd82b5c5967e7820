//! The gesture state machine.

use snapbooth_common::config::OverlayDefaults;
use snapbooth_overlay_model::layer::LayerKind;
use snapbooth_overlay_model::model::OverlayModel;

use crate::event::{HitRegion, HitTarget, InputEvent, PointerPos};
use crate::intent::GestureIntent;
use crate::session::GestureSession;

/// Gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Size change per unit of wheel delta; scrolling up enlarges.
    pub wheel_step: f64,
    /// Fraction of pointer travel applied to handle resizes.
    pub resize_sensitivity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            wheel_step: 0.5,
            resize_sensitivity: 0.5,
        }
    }
}

impl From<&OverlayDefaults> for GestureConfig {
    fn from(defaults: &OverlayDefaults) -> Self {
        Self {
            wheel_step: defaults.wheel_step,
            resize_sensitivity: defaults.resize_sensitivity,
        }
    }
}

/// Interprets raw input into [`GestureIntent`]s, holding at most one session.
#[derive(Debug, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    session: Option<GestureSession>,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// The session in progress, if any.
    pub fn active_session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Feed one event. `model` is read for anchor sizes and layer presence.
    pub fn handle(&mut self, event: &InputEvent, model: &OverlayModel) -> Vec<GestureIntent> {
        let mut intents = Vec::new();

        match event {
            InputEvent::PointerDown { pos, target } => {
                self.press(*pos, *target, model, &mut intents);
            }
            InputEvent::PointerMove { pos } => {
                self.drag(*pos, &mut intents);
            }
            InputEvent::PointerUp | InputEvent::TouchEnd => {
                intents.extend(self.force_end());
            }
            InputEvent::TouchStart { touches, target } => match touches.as_slice() {
                [] => {}
                [single] => self.press(*single, *target, model, &mut intents),
                [first, second, ..] => {
                    self.begin_pinch(*first, *second, *target, model, &mut intents);
                }
            },
            InputEvent::TouchMove { touches } => match touches.as_slice() {
                [] => {}
                [single] => self.drag(*single, &mut intents),
                [first, second, ..] => self.pinch(*first, *second, &mut intents),
            },
            InputEvent::Wheel { delta_y, target } => {
                if let Some(layer) = target {
                    if let Some(size) = model.layer_size(*layer) {
                        intents.push(GestureIntent::WheelResize {
                            layer: *layer,
                            size: size + delta_y * -self.config.wheel_step,
                        });
                    }
                }
            }
        }

        intents
    }

    /// End the active session, returning its end intent.
    pub fn force_end(&mut self) -> Option<GestureIntent> {
        let session = self.session.take()?;
        tracing::trace!(kind = ?session.kind(), layer = ?session.layer(), "Gesture session ended");
        let layer = session.layer();
        Some(match session {
            GestureSession::Move { .. } => GestureIntent::EndMove { layer },
            GestureSession::Resize { .. } => GestureIntent::EndResize { layer },
            GestureSession::Pinch { .. } => GestureIntent::EndPinch { layer },
        })
    }

    /// Drop any session without emitting intents (photo discarded).
    pub fn cancel(&mut self) {
        self.session = None;
    }

    fn press(
        &mut self,
        pos: PointerPos,
        target: Option<HitTarget>,
        model: &OverlayModel,
        intents: &mut Vec<GestureIntent>,
    ) {
        intents.extend(self.force_end());

        let Some(target) = target else {
            return;
        };
        let Some(size) = model.layer_size(target.layer) else {
            return;
        };

        let layer = target.layer;
        match target.region {
            HitRegion::Body => {
                self.session = Some(GestureSession::Move {
                    layer,
                    last_pointer: pos,
                });
                intents.push(GestureIntent::BeginMove { layer });
            }
            HitRegion::Handle(corner) => {
                self.session = Some(GestureSession::Resize {
                    layer,
                    corner,
                    anchor_pointer: pos,
                    anchor_size: size,
                });
                intents.push(GestureIntent::BeginResize { layer, corner });
            }
        }
        tracing::trace!(?layer, region = ?target.region, "Gesture session started");
    }

    fn drag(&mut self, pos: PointerPos, intents: &mut Vec<GestureIntent>) {
        let sensitivity = self.config.resize_sensitivity;
        match self.session.as_mut() {
            Some(GestureSession::Move {
                layer,
                last_pointer,
            }) => {
                let dx = pos.x - last_pointer.x;
                let dy = pos.y - last_pointer.y;
                *last_pointer = pos;
                intents.push(GestureIntent::Move {
                    layer: *layer,
                    dx,
                    dy,
                });
            }
            Some(GestureSession::Resize {
                layer,
                anchor_pointer,
                anchor_size,
                ..
            }) => {
                let dx = pos.x - anchor_pointer.x;
                let dy = pos.y - anchor_pointer.y;
                let delta = dx.max(dy);
                let size = layer
                    .size_limits()
                    .clamp(*anchor_size + delta * sensitivity);
                intents.push(GestureIntent::Resize {
                    layer: *layer,
                    size,
                });
            }
            Some(GestureSession::Pinch { .. }) | None => {}
        }
    }

    fn begin_pinch(
        &mut self,
        first: PointerPos,
        second: PointerPos,
        target: Option<HitTarget>,
        model: &OverlayModel,
        intents: &mut Vec<GestureIntent>,
    ) {
        if self.session.is_some() {
            return;
        }
        let Some(layer) = target.map(|t| t.layer) else {
            return;
        };
        let Some(anchor_size) = model.layer_size(layer) else {
            return;
        };
        let anchor_distance = first.distance_to(&second);
        if anchor_distance <= f64::EPSILON {
            return;
        }

        self.session = Some(GestureSession::Pinch {
            layer,
            anchor_distance,
            anchor_size,
        });
        intents.push(GestureIntent::BeginPinch { layer });
        tracing::trace!(?layer, anchor_distance, "Pinch session started");
    }

    fn pinch(&mut self, first: PointerPos, second: PointerPos, intents: &mut Vec<GestureIntent>) {
        if let Some(GestureSession::Pinch {
            layer,
            anchor_distance,
            anchor_size,
        }) = self.session.as_ref()
        {
            let scale = first.distance_to(&second) / anchor_distance;
            intents.push(GestureIntent::PinchResize {
                layer: *layer,
                size: anchor_size * scale,
            });
        }
    }
}

/// Convenience for hosts that only deal with one layer kind at a time.
pub fn wheel_over(layer: LayerKind, delta_y: f64) -> InputEvent {
    InputEvent::Wheel {
        delta_y,
        target: Some(layer),
    }
}
