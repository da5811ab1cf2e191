//! Helion engine crate.
//!
//! A real-time GPU ray tracer: scene registries with stable slot ids feed
//! packed storage buffers that are resynchronized only when dirty, and a
//! compute kernel traces into a resolution-capped storage target composited
//! onto the swapchain each frame.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod logging;
pub mod render;
pub mod scene;
