use super::error::{BufferError, PipelineError, RenderError};
use super::pass::{PrimitiveType, RenderPass};
use super::shader::ShaderFunction;

/// Description of the single render pipeline the renderer builds.
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'static str,
    pub vertex: ShaderFunction<'a>,
    pub fragment: ShaderFunction<'a>,
    /// Vertex buffer layouts, indexed by slot.
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'static>],
    pub color_format: wgpu::TextureFormat,
    pub primitive: PrimitiveType,
}

/// GPU device contract consumed by [`FrameRenderer`](super::FrameRenderer).
///
/// An implementor owns the device handle together with its command queue.
/// Every method is called from the frame loop thread.
pub trait GpuDevice {
    type Buffer;
    type Pipeline;
    /// Host-owned presentation surface.
    type Surface;
    /// Single-use handle to the image presented at the end of a frame.
    type Drawable;

    /// Pixel format of the images handed out by [`next_drawable`](Self::next_drawable).
    fn color_format(&self) -> wgpu::TextureFormat;

    /// Uploads immutable vertex data into device-local memory.
    fn create_vertex_buffer(
        &self,
        label: &'static str,
        contents: &[u8],
    ) -> Result<Self::Buffer, BufferError>;

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<Self::Pipeline, PipelineError>;

    /// Binds the device to the surface's presentation layer. Must be idempotent.
    fn attach(&self, surface: &mut Self::Surface);

    /// Acquires the next drawable. `Ok(None)` means no image is available this
    /// frame and the frame should be skipped.
    fn next_drawable(
        &self,
        surface: &mut Self::Surface,
    ) -> Result<Option<Self::Drawable>, RenderError>;

    /// Replays `pass` into a command buffer targeting `drawable`, commits it to
    /// the queue and presents the drawable.
    fn submit(
        &self,
        surface: &mut Self::Surface,
        drawable: Self::Drawable,
        pass: RenderPass<'_, Self::Pipeline, Self::Buffer>,
    );
}
