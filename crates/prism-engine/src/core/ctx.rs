use crate::time::FrameTime;
use crate::window::HostSurface;

/// Per-frame context passed to `core::App::on_frame`.
///
/// `'a` is the duration of the callback invocation. The surface is the
/// runtime's; apps draw into it and must not keep it across frames.
pub struct FrameCtx<'a> {
    pub surface: &'a mut HostSurface,
    pub time: FrameTime,
}
