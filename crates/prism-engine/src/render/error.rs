use std::fmt;
use std::path::PathBuf;

use super::shader::ShaderStage;

/// Failure while creating an immutable vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The buffer would hold no data.
    Empty { label: &'static str },
    /// The contents exceed the device's maximum buffer size.
    TooLarge {
        label: &'static str,
        size: u64,
        max: u64,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Empty { label } => {
                write!(f, "vertex buffer `{label}` has no contents")
            }
            BufferError::TooLarge { label, size, max } => write!(
                f,
                "vertex buffer `{label}` is {size} bytes, device maximum is {max}"
            ),
        }
    }
}

impl std::error::Error for BufferError {}

/// Failure while loading the shader library or compiling the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    LibraryUnreadable { path: PathBuf, message: String },
    MissingEntryPoint { name: String, stage: ShaderStage },
    Compilation { label: String, message: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::LibraryUnreadable { path, message } => {
                write!(f, "failed to read shader library {}: {message}", path.display())
            }
            PipelineError::MissingEntryPoint { name, stage } => {
                write!(f, "shader library has no {stage} entry point named `{name}`")
            }
            PipelineError::Compilation { label, message } => {
                write!(f, "failed to compile pipeline `{label}`: {message}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Errors surfaced by [`FrameRenderer`](super::FrameRenderer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `draw` was called on a renderer that never acquired a device.
    NotReady,
    Buffer(BufferError),
    Pipeline(PipelineError),
    /// The presentation surface failed in a way that cannot be recovered.
    Surface(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotReady => write!(f, "renderer is not ready: no GPU device"),
            RenderError::Buffer(_) => write!(f, "vertex buffer creation failed"),
            RenderError::Pipeline(_) => write!(f, "render pipeline creation failed"),
            RenderError::Surface(msg) => write!(f, "presentation surface failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Buffer(e) => Some(e),
            RenderError::Pipeline(e) => Some(e),
            RenderError::NotReady | RenderError::Surface(_) => None,
        }
    }
}

impl From<BufferError> for RenderError {
    fn from(e: BufferError) -> Self {
        RenderError::Buffer(e)
    }
}

impl From<PipelineError> for RenderError {
    fn from(e: PipelineError) -> Self {
        RenderError::Pipeline(e)
    }
}
