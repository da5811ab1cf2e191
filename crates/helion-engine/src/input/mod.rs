//! Keyboard + pointer state for the free camera.
//!
//! Deliberately thin: held keys are tracked as raw `winit` key codes and
//! mouse-look deltas are only accumulated while the cursor is captured.
//! Per-frame deltas are cleared by the runtime after each frame.

mod state;

pub use state::InputState;
pub use winit::keyboard::KeyCode;
