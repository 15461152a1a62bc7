//! Prism engine crate.
//!
//! Window runtime, wgpu device layer and the fixed-triangle frame renderer.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
