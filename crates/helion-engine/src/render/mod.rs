//! GPU side of the tracer.
//!
//! The frame driver consumes the `scene` registries and issues GPU work via
//! wgpu: registry mirrors are repacked only when dirty, the output storage
//! target tracks the computed resolution, and every frame ends with a
//! fullscreen composite onto the swapchain.

mod ctx;
mod sync;
mod target;
mod tracer;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use sync::GpuMirror;
pub use target::{OutputTarget, compute_target_size};
pub use tracer::{RayTracer, TracerSettings};
pub use uniforms::{FrameUniforms, TracerCamera};
