//! Core engine-facing contracts.
//!
//! Defines the stable interface between the runtime (platform loop) and the
//! application: a per-frame context and the `App` trait.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
