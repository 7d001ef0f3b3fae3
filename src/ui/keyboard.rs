// Keyboard input handling for CanvasApp

use crate::canvas::{Command, NudgeDirection};
use crate::samples;

use super::app::CanvasApp;
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{Key, NamedKey},
};

impl CanvasApp {
    /// Returns true when the canvas needs a repaint.
    pub fn handle_keyboard(&mut self, event: KeyEvent) -> bool {
        if event.state != ElementState::Pressed {
            return false;
        }

        // Ctrl+D: toggle debug_println! output (development builds only)
        #[cfg(feature = "debug-keys")]
        if self.modifiers.control_key() {
            if let Key::Character(ref c) = event.logical_key {
                if c.eq_ignore_ascii_case("d") {
                    use std::sync::atomic::Ordering;
                    let enabled = !crate::DEBUG_ENABLED.load(Ordering::Relaxed);
                    crate::DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
                    log::info!("Debug traces {}", if enabled { "on" } else { "off" });
                    return false;
                }
            }
        }

        let command = match event.logical_key {
            Key::Named(NamedKey::ArrowUp) => Command::Nudge(NudgeDirection::Up),
            Key::Named(NamedKey::ArrowDown) => Command::Nudge(NudgeDirection::Down),
            Key::Named(NamedKey::ArrowLeft) => Command::Nudge(NudgeDirection::Left),
            Key::Named(NamedKey::ArrowRight) => Command::Nudge(NudgeDirection::Right),
            Key::Named(NamedKey::Delete | NamedKey::Backspace) => Command::Delete,
            Key::Named(NamedKey::Escape) => Command::Select(None),
            Key::Character(ref c) if !self.modifiers.control_key() => {
                match c.to_ascii_lowercase().as_str() {
                    "n" => {
                        let descriptor = samples::sample(self.next_sample);
                        self.next_sample += 1;
                        Command::PlaceAtCentre(descriptor)
                    }
                    "f" => Command::SetFontSize(self.canvas.font_size().toggled()),
                    "b" => Command::SetBackdrop(self.canvas.backdrop().next()),
                    "g" => Command::SetGrid(!self.canvas.show_grid()),
                    _ => return false,
                }
            }
            _ => return false,
        };
        self.apply(command)
    }
}
