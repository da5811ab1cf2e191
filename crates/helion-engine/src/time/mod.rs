//! Time subsystem.
//!
//! - one `FrameClock` per render loop, ticked once per presented frame
//! - `FpsCounter` for an interval-averaged frame-rate readout

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
