//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop, the window and its presentation surface, and
//! drives the application's frame callback at a fixed rate.

mod runtime;
mod surface;

pub use runtime::{Runtime, RuntimeConfig};
pub use surface::HostSurface;
