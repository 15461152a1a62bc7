/// The image presented at the end of one frame.
///
/// Short-lived: holding the surface texture prevents acquisition of the next
/// one, so it is consumed by [`WgpuDevice::submit`](super::WgpuDevice).
pub struct WgpuDrawable {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
