//! GPU device management.
//!
//! This module is responsible for:
//! - acquiring the wgpu Adapter/Device/Queue for a host surface
//! - negotiating surface format, present mode and alpha mode
//! - uploading vertex buffers and compiling render pipelines
//! - acquiring drawables and replaying recorded passes onto them

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{DeviceError, SurfaceErrorAction};
pub use frame::WgpuDrawable;
pub use gpu::WgpuDevice;
pub use init::GpuInit;

pub(crate) use surface::surface_error_action;
