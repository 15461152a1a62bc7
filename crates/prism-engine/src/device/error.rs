use std::fmt;

/// The GPU device could not be acquired.
///
/// Recoverable at startup: the renderer is left not ready and never draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No adapter is compatible with the window surface.
    NoAdapter(String),
    /// The adapter refused to create a logical device.
    RequestDevice(String),
    /// The surface reports no presentable formats for this adapter.
    IncompatibleSurface,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NoAdapter(msg) => write!(f, "no suitable GPU adapter: {msg}"),
            DeviceError::RequestDevice(msg) => write!(f, "failed to create GPU device: {msg}"),
            DeviceError::IncompatibleSurface => {
                write!(f, "surface has no formats supported by the adapter")
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
