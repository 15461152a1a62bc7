//! Frame rendering.
//!
//! [`FrameRenderer`] owns the triangle's GPU resources and records one render
//! pass per frame. It talks to the GPU through the [`GpuDevice`] trait so the
//! per-frame sequence can run against a recording device in tests.

mod backend;
mod config;
mod error;
mod pass;
mod renderer;

pub mod geometry;
pub mod shader;

pub use backend::{GpuDevice, PipelineDesc};
pub use config::RendererConfig;
pub use error::{BufferError, PipelineError, RenderError};
pub use pass::{
    ClearColor, ColorAttachment, DrawCommand, PrimitiveType, RenderPass, RenderPassEncoder,
};
pub use renderer::{FrameOutcome, FrameRenderer, RendererStatus};
pub use shader::{ShaderFunction, ShaderLibrary, ShaderStage};
