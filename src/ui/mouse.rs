// Pointer, wheel and trackpad gesture handling for CanvasApp

use crate::canvas::{Command, ROTATION_STEP_DEG};

use super::app::CanvasApp;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase};

/// Pixels per wheel line for line-based scroll deltas
const LINE_HEIGHT_PX: f32 = 20.;
/// Scale change per wheel pixel when Ctrl is held
const WHEEL_PINCH_RATE: f32 = 0.002;

impl CanvasApp {
    pub fn handle_mouse_click(&mut self, state: ElementState, button: MouseButton) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        match state {
            ElementState::Pressed => {
                let Some((x, y)) = self.cursor else {
                    return false;
                };
                let at = self.to_page(x, y);
                crate::debug_println!("Pointer down at page ({:.1}, {:.1})", at.x, at.y);
                self.apply(Command::PointerDown(at))
            }
            ElementState::Released => self.apply(Command::PointerUp),
        }
    }

    pub fn handle_mouse_move(&mut self, position: PhysicalPosition<f64>) -> bool {
        self.cursor = Some((position.x, position.y));
        if !self.canvas.is_dragging() {
            return false;
        }
        let at = self.to_page(position.x, position.y);
        self.apply(Command::PointerMove(at))
    }

    pub fn handle_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Ctrl+wheel pinches the selected fragment, Shift+wheel rotates it by
    /// one snap step per event.
    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) -> bool {
        let dy = match delta {
            MouseScrollDelta::LineDelta(x, y) => (if y != 0. { y } else { x }) * LINE_HEIGHT_PX,
            MouseScrollDelta::PixelDelta(pos) => (if pos.y != 0. { pos.y } else { pos.x }) as f32,
        };
        if dy == 0. {
            return false;
        }
        if self.modifiers.control_key() {
            self.apply(Command::Pinch((dy * WHEEL_PINCH_RATE).exp()))
        } else if self.modifiers.shift_key() {
            self.apply(Command::Rotate(ROTATION_STEP_DEG * dy.signum()))
        } else {
            false
        }
    }

    /// Trackpad pinch; `delta` is the incremental magnification.
    pub fn handle_pinch_gesture(&mut self, delta: f64) -> bool {
        self.apply(Command::Pinch(1. + delta as f32))
    }

    /// Trackpad rotation in degrees, counterclockwise positive. Small deltas
    /// accumulate until they are large enough to reach the next snap step.
    pub fn handle_rotation_gesture(&mut self, delta: f32, phase: TouchPhase) -> bool {
        if matches!(phase, TouchPhase::Started) {
            self.rotation_accum = 0.;
        }
        // Page rotation is clockwise positive
        self.rotation_accum -= delta;
        let mut changed = false;
        if self.rotation_accum.abs() >= ROTATION_STEP_DEG / 2. {
            changed = self.apply(Command::Rotate(self.rotation_accum));
            self.rotation_accum = 0.;
        }
        if matches!(phase, TouchPhase::Ended | TouchPhase::Cancelled) {
            self.rotation_accum = 0.;
        }
        changed
    }
}
