use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::render::{
    BufferError, ColorAttachment, DrawCommand, GpuDevice, PipelineDesc, PipelineError,
    RenderError, RenderPass,
};
use crate::window::HostSurface;

use super::frame::WgpuDrawable;
use super::surface::{self, AttachPlan};
use super::{DeviceError, GpuInit, SurfaceErrorAction};

/// wgpu-backed device: logical device and its command queue.
///
/// Surface parameters (format, present and alpha mode) are negotiated once
/// against the host surface at acquisition and reused on every attach.
pub struct WgpuDevice {
    /// Logical device.
    device: wgpu::Device,

    /// Command queue. One for the process lifetime.
    queue: wgpu::Queue,

    format: wgpu::TextureFormat,
    present_mode: wgpu::PresentMode,
    alpha_mode: wgpu::CompositeAlphaMode,
    desired_maximum_frame_latency: u32,
}

impl WgpuDevice {
    /// Acquires a device able to present to `host`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(host: &HostSurface, init: GpuInit) -> Result<Self, DeviceError> {
        let GpuInit {
            power_preference,
            surface_format,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let adapter = host
            .instance()
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(host.surface()),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| DeviceError::NoAdapter(e.to_string()))?;

        let info = adapter.get_info();
        log::info!("using adapter `{}` ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| DeviceError::RequestDevice(e.to_string()))?;

        let caps = host.surface().get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, surface_format)
            .ok_or(DeviceError::IncompatibleSurface)?;
        if format != surface_format {
            log::warn!("surface cannot present {surface_format:?}; using {format:?}");
        }

        Ok(Self {
            present_mode: surface::choose_present_mode(&caps.present_modes, present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps.alpha_modes, alpha_mode),
            device,
            queue,
            format,
            desired_maximum_frame_latency,
        })
    }

    /// Blocking form of [`new`](Self::new) for use inside the event loop.
    pub fn acquire(host: &HostSurface, init: GpuInit) -> Result<Self, DeviceError> {
        pollster::block_on(Self::new(host, init))
    }

    fn surface_config(&self, size: PhysicalSize<u32>) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: size.width,
            height: size.height,
            present_mode: self.present_mode,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        }
    }

    /// Runs `create` inside a validation error scope.
    ///
    /// Without a scope wgpu hands validation errors to the device's
    /// uncaptured-error handler, which panics on native backends.
    fn validated<T>(&self, label: &str, create: impl FnOnce() -> T) -> Result<T, PipelineError> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create();

        match pollster::block_on(scope.pop()) {
            None => Ok(value),
            Some(err) => Err(PipelineError::Compilation {
                label: label.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn shader_module(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule, PipelineError> {
        self.validated(label, || {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })
    }
}

impl GpuDevice for WgpuDevice {
    type Buffer = wgpu::Buffer;
    type Pipeline = wgpu::RenderPipeline;
    type Surface = HostSurface;
    type Drawable = WgpuDrawable;

    fn color_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn create_vertex_buffer(
        &self,
        label: &'static str,
        contents: &[u8],
    ) -> Result<wgpu::Buffer, BufferError> {
        if contents.is_empty() {
            return Err(BufferError::Empty { label });
        }

        let max = self.device.limits().max_buffer_size;
        let size = contents.len() as u64;
        if size > max {
            return Err(BufferError::TooLarge { label, size, max });
        }

        // VERTEX only: no COPY_DST, the contents never change after upload.
        Ok(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        }))
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<wgpu::RenderPipeline, PipelineError> {
        let vs_library = desc.vertex.library();
        let fs_library = desc.fragment.library();

        let vs_module = self.shader_module(desc.label, vs_library.source())?;
        let fs_module = if std::ptr::eq(vs_library, fs_library) {
            None
        } else {
            Some(self.shader_module(desc.label, fs_library.source())?)
        };
        let fs_module = fs_module.as_ref().unwrap_or(&vs_module);

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let descriptor = wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(desc.vertex.name()),
                compilation_options: Default::default(),
                buffers: desc.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: fs_module,
                entry_point: Some(desc.fragment.name()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.primitive.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        };
        let pipeline = self.validated(desc.label, || {
            self.device.create_render_pipeline(&descriptor)
        })?;

        log::debug!(
            "pipeline `{}` built: {} / {} -> {:?}",
            desc.label,
            desc.vertex.name(),
            desc.fragment.name(),
            desc.color_format
        );

        Ok(pipeline)
    }

    fn attach(&self, surface: &mut HostSurface) {
        match surface::plan_attach(surface.configured_size(), surface.inner_size()) {
            AttachPlan::Keep => {}
            AttachPlan::Configure(size) => {
                log::debug!("configuring surface at {}x{}", size.width, size.height);
                surface.configure(&self.device, self.surface_config(size));
            }
            AttachPlan::Unpresentable => log::trace!("surface has no area; not configured"),
        }
    }

    fn next_drawable(&self, surface: &mut HostSurface) -> Result<Option<WgpuDrawable>, RenderError> {
        // Acquiring from an unconfigured surface is a validation error in wgpu.
        if surface.configured_size().is_none() {
            return Ok(None);
        }

        let surface_texture = match surface.current_texture() {
            Ok(t) => t,
            Err(err) => {
                return match surface.handle_surface_error(&self.device, &err) {
                    SurfaceErrorAction::Fatal => Err(RenderError::Surface(err.to_string())),
                    action => {
                        log::debug!("surface error `{err}`: {action:?}");
                        Ok(None)
                    }
                };
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Some(WgpuDrawable { surface_texture, view }))
    }

    fn submit(
        &self,
        surface: &mut HostSurface,
        drawable: WgpuDrawable,
        pass: RenderPass<'_, wgpu::RenderPipeline, wgpu::Buffer>,
    ) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });

        // Render pass borrows the encoder; dropped before finish().
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(pass.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &drawable.view,
                    resolve_target: None,
                    ops: operations(&pass.color),
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for cmd in &pass.commands {
                match cmd {
                    DrawCommand::SetPipeline(pipeline) => rpass.set_pipeline(pipeline),
                    DrawCommand::SetVertexBuffer { slot, buffer } => {
                        rpass.set_vertex_buffer(*slot, buffer.slice(..))
                    }
                    DrawCommand::Draw {
                        vertex_start,
                        vertex_count,
                        instance_count,
                        ..
                    } => rpass.draw(
                        *vertex_start..vertex_start + vertex_count,
                        0..*instance_count,
                    ),
                }
            }
        }

        // wgpu requires the commit to precede presentation.
        surface.pre_present_notify();
        self.queue.submit(std::iter::once(encoder.finish()));

        let WgpuDrawable { surface_texture, view } = drawable;
        drop(view);
        surface_texture.present();
    }
}

fn operations(color: &ColorAttachment) -> wgpu::Operations<wgpu::Color> {
    let c = color.clear_color;
    wgpu::Operations {
        load: wgpu::LoadOp::Clear(wgpu::Color {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }),
        store: wgpu::StoreOp::Store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::geometry::{vertex_layouts, Position, TRIANGLE_POSITIONS};
    use crate::render::{ClearColor, PrimitiveType, ShaderLibrary, ShaderStage};

    const VALID: &str = "
        struct VertexIn {
            @location(0) position: vec4<f32>,
            @location(1) color: vec4<f32>,
        };

        @vertex
        fn vertex_main(input: VertexIn) -> @builtin(position) vec4<f32> {
            return input.position;
        }

        @fragment
        fn fragment_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0);
        }
    ";

    /// Device without a surface, or `None` on machines with no adapter.
    fn headless(max_buffer_size: Option<u64>) -> Option<WgpuDevice> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;

        let mut required_limits = adapter.limits();
        if let Some(max) = max_buffer_size {
            required_limits.max_buffer_size = max;
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("prism test device"),
            required_limits,
            ..Default::default()
        }))
        .ok()?;

        Some(WgpuDevice {
            device,
            queue,
            format: wgpu::TextureFormat::Bgra8Unorm,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            desired_maximum_frame_latency: 2,
        })
    }

    fn build(device: &WgpuDevice, library: &ShaderLibrary) -> Result<wgpu::RenderPipeline, PipelineError> {
        let layouts = vertex_layouts();
        let desc = PipelineDesc {
            label: "test pipeline",
            vertex: library.function("vertex_main", ShaderStage::Vertex).unwrap(),
            fragment: library.function("fragment_main", ShaderStage::Fragment).unwrap(),
            vertex_buffers: &layouts,
            color_format: device.color_format(),
            primitive: PrimitiveType::Triangle,
        };
        device.create_pipeline(&desc)
    }

    // ── pass operations ───────────────────────────────────────────────────

    #[test]
    fn cleared_attachment_maps_to_clear_and_store() {
        let ops = operations(&ColorAttachment::cleared(ClearColor::OPAQUE_BLACK));
        assert_eq!(
            ops.load,
            wgpu::LoadOp::Clear(wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 })
        );
        assert_eq!(ops.store, wgpu::StoreOp::Store);
    }

    // ── pipelines ─────────────────────────────────────────────────────────

    #[test]
    fn valid_library_builds_pipeline() {
        let Some(device) = headless(None) else { return };
        let library = ShaderLibrary::from_source("valid.wgsl", VALID);
        assert!(build(&device, &library).is_ok());
    }

    #[test]
    fn invalid_wgsl_is_a_compilation_error() {
        let Some(device) = headless(None) else { return };
        let library = ShaderLibrary::from_source(
            "broken.wgsl",
            "@vertex fn vertex_main( { @fragment fn fragment_main() {}",
        );

        let err = build(&device, &library).unwrap_err();
        assert!(
            matches!(&err, PipelineError::Compilation { label, .. } if label == "test pipeline"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn unfed_vertex_input_is_a_compilation_error() {
        let Some(device) = headless(None) else { return };
        let library = ShaderLibrary::from_source(
            "unfed.wgsl",
            "
            @vertex
            fn vertex_main(@location(5) p: vec4<f32>) -> @builtin(position) vec4<f32> {
                return p;
            }

            @fragment
            fn fragment_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
            ",
        );

        assert!(matches!(
            build(&device, &library),
            Err(PipelineError::Compilation { .. })
        ));
    }

    // ── buffers ───────────────────────────────────────────────────────────

    #[test]
    fn empty_vertex_buffer_is_rejected() {
        let Some(device) = headless(None) else { return };
        let err = device.create_vertex_buffer("empty vbo", &[]).unwrap_err();
        assert_eq!(err, BufferError::Empty { label: "empty vbo" });
    }

    #[test]
    fn oversized_vertex_buffer_is_rejected() {
        let limit = std::mem::size_of::<Position>() as u64;
        let Some(device) = headless(Some(limit)) else { return };

        let bytes = bytemuck::cast_slice(&TRIANGLE_POSITIONS);
        let err = device.create_vertex_buffer("position vbo", bytes).unwrap_err();
        assert_eq!(
            err,
            BufferError::TooLarge {
                label: "position vbo",
                size: bytes.len() as u64,
                max: limit,
            }
        );
    }

    #[test]
    fn triangle_positions_upload() {
        let Some(device) = headless(None) else { return };
        let bytes = bytemuck::cast_slice(&TRIANGLE_POSITIONS);
        let buffer = device.create_vertex_buffer("position vbo", bytes).unwrap();
        assert_eq!(buffer.size(), bytes.len() as u64);
        assert_eq!(buffer.usage(), wgpu::BufferUsages::VERTEX);
    }
}
