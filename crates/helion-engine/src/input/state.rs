use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Aggregated input state, updated by the runtime and read by the app.
#[derive(Debug, Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    /// Mouse-look delta accumulated this frame (only while captured).
    pointer_delta: (f32, f32),
    captured: bool,
    clicked: bool,
}

impl InputState {
    /// True while the key is held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Mouse-look delta accumulated since the last frame, in raw device
    /// units. Zero while the cursor is not captured.
    pub fn pointer_delta(&self) -> (f32, f32) {
        self.pointer_delta
    }

    /// Whether the runtime currently captures the cursor for mouse-look.
    pub fn cursor_captured(&self) -> bool {
        self.captured
    }

    /// True if the primary button was pressed this frame.
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    // ── runtime-facing mutation ───────────────────────────────────────────

    pub(crate) fn apply_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            self.pressed.insert(code);
                        }
                        ElementState::Released => {
                            self.pressed.remove(&code);
                        }
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.clicked = true;
            }
            // Releases are not delivered while unfocused; drop held state.
            WindowEvent::Focused(false) => {
                self.pressed.clear();
            }
            _ => {}
        }
    }

    pub(crate) fn apply_pointer_motion(&mut self, delta: (f64, f64)) {
        if self.captured {
            self.pointer_delta.0 += delta.0 as f32;
            self.pointer_delta.1 += delta.1 as f32;
        }
    }

    pub(crate) fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.pointer_delta = (0.0, 0.0);
        }
    }

    /// Clears per-frame deltas after the frame is consumed.
    pub(crate) fn end_frame(&mut self) {
        self.pointer_delta = (0.0, 0.0);
        self.clicked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_is_ignored_until_captured() {
        let mut input = InputState::default();
        input.apply_pointer_motion((4.0, 2.0));
        assert_eq!(input.pointer_delta(), (0.0, 0.0));

        input.set_captured(true);
        input.apply_pointer_motion((4.0, 2.0));
        input.apply_pointer_motion((1.0, -1.0));
        assert_eq!(input.pointer_delta(), (5.0, 1.0));
    }

    #[test]
    fn end_frame_clears_deltas_but_not_held_keys() {
        let mut input = InputState::default();
        input.set_captured(true);
        input.pressed.insert(KeyCode::KeyW);
        input.apply_pointer_motion((3.0, 3.0));

        input.end_frame();
        assert_eq!(input.pointer_delta(), (0.0, 0.0));
        assert!(input.key_held(KeyCode::KeyW));
    }

    #[test]
    fn releasing_capture_drops_pending_delta() {
        let mut input = InputState::default();
        input.set_captured(true);
        input.apply_pointer_motion((9.0, 9.0));
        input.set_captured(false);
        assert_eq!(input.pointer_delta(), (0.0, 0.0));
    }
}
