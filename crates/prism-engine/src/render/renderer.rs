use crate::device::DeviceError;

use super::backend::{GpuDevice, PipelineDesc};
use super::config::RendererConfig;
use super::error::RenderError;
use super::geometry::{
    vertex_layouts, COLOR_SLOT, POSITION_SLOT, TRIANGLE_COLORS, TRIANGLE_POSITIONS,
    TRIANGLE_VERTEX_COUNT,
};
use super::pass::{ClearColor, ColorAttachment, PrimitiveType, RenderPassEncoder};
use super::shader::{ShaderLibrary, ShaderStage};

/// Result of a single [`FrameRenderer::draw`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// One pass was recorded, committed and presented.
    Submitted,
    /// No drawable was available; nothing was recorded.
    Skipped,
}

/// Observable readiness of a renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RendererStatus<'a> {
    Ready,
    NotReady(&'a DeviceError),
}

struct Resources<D: GpuDevice> {
    device: D,
    position_buffer: D::Buffer,
    color_buffer: D::Buffer,
    pipeline: D::Pipeline,
}

enum State<D: GpuDevice> {
    NotReady(DeviceError),
    Ready(Resources<D>),
}

/// Draws the fixed triangle once per frame.
///
/// All GPU resources are created in [`initialize`](Self::initialize) and only
/// read afterwards. A renderer built without a device stays not ready for its
/// whole lifetime and rejects every draw.
pub struct FrameRenderer<D: GpuDevice> {
    state: State<D>,
    frames_submitted: u64,
}

impl<D: GpuDevice> FrameRenderer<D> {
    /// Builds buffers and pipeline on `device`, loading shaders from
    /// `config.shader_path`.
    ///
    /// An unavailable device is not an error here: it is logged and the
    /// renderer is returned in the not-ready state. Buffer and pipeline
    /// failures are returned as errors and should abort startup.
    pub fn initialize(
        device: Result<D, DeviceError>,
        config: &RendererConfig,
    ) -> Result<Self, RenderError> {
        let device = match device {
            Ok(d) => d,
            Err(err) => return Ok(Self::not_ready(err)),
        };

        let (position_buffer, color_buffer) = build_vertex_buffers(&device)?;

        let library = ShaderLibrary::load(&config.shader_path)?;
        let pipeline = build_pipeline(&device, &library, config)?;

        Ok(Self::ready(device, position_buffer, color_buffer, pipeline))
    }

    /// Like [`initialize`](Self::initialize) with an already loaded shader library.
    pub fn initialize_with_library(
        device: Result<D, DeviceError>,
        library: &ShaderLibrary,
        config: &RendererConfig,
    ) -> Result<Self, RenderError> {
        let device = match device {
            Ok(d) => d,
            Err(err) => return Ok(Self::not_ready(err)),
        };

        let (position_buffer, color_buffer) = build_vertex_buffers(&device)?;
        let pipeline = build_pipeline(&device, library, config)?;

        Ok(Self::ready(device, position_buffer, color_buffer, pipeline))
    }

    fn not_ready(err: DeviceError) -> Self {
        log::error!("GPU device unavailable, renderer will not draw: {err}");
        Self {
            state: State::NotReady(err),
            frames_submitted: 0,
        }
    }

    fn ready(
        device: D,
        position_buffer: D::Buffer,
        color_buffer: D::Buffer,
        pipeline: D::Pipeline,
    ) -> Self {
        log::info!("frame renderer ready ({:?})", device.color_format());
        Self {
            state: State::Ready(Resources {
                device,
                position_buffer,
                color_buffer,
                pipeline,
            }),
            frames_submitted: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn status(&self) -> RendererStatus<'_> {
        match &self.state {
            State::Ready(_) => RendererStatus::Ready,
            State::NotReady(err) => RendererStatus::NotReady(err),
        }
    }

    /// Total number of frames committed since initialization.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Records and submits one frame into `surface`.
    ///
    /// Order: pipeline, position buffer (slot 0), color buffer (slot 1), one
    /// triangle draw, end pass, commit and present.
    pub fn draw(&mut self, surface: &mut D::Surface) -> Result<FrameOutcome, RenderError> {
        let State::Ready(res) = &self.state else {
            return Err(RenderError::NotReady);
        };

        res.device.attach(surface);

        let Some(drawable) = res.device.next_drawable(surface)? else {
            log::trace!("no drawable available; frame skipped");
            return Ok(FrameOutcome::Skipped);
        };

        let mut encoder = RenderPassEncoder::begin(
            "prism triangle pass",
            ColorAttachment::cleared(ClearColor::OPAQUE_BLACK),
        );
        encoder.set_render_pipeline(&res.pipeline);
        encoder.set_vertex_buffer(POSITION_SLOT, &res.position_buffer);
        encoder.set_vertex_buffer(COLOR_SLOT, &res.color_buffer);
        encoder.draw_primitives(PrimitiveType::Triangle, 0, TRIANGLE_VERTEX_COUNT, 1);
        let pass = encoder.end_encoding();

        res.device.submit(surface, drawable, pass);

        if self.frames_submitted == 0 {
            log::debug!("first frame submitted");
        }
        self.frames_submitted += 1;

        Ok(FrameOutcome::Submitted)
    }
}

fn build_vertex_buffers<D: GpuDevice>(device: &D) -> Result<(D::Buffer, D::Buffer), RenderError> {
    let positions = device.create_vertex_buffer(
        "prism position vbo",
        bytemuck::cast_slice(&TRIANGLE_POSITIONS),
    )?;
    let colors =
        device.create_vertex_buffer("prism color vbo", bytemuck::cast_slice(&TRIANGLE_COLORS))?;

    Ok((positions, colors))
}

fn build_pipeline<D: GpuDevice>(
    device: &D,
    library: &ShaderLibrary,
    config: &RendererConfig,
) -> Result<D::Pipeline, RenderError> {
    let vertex = library.function(&config.vertex_entry, ShaderStage::Vertex)?;
    let fragment = library.function(&config.fragment_entry, ShaderStage::Fragment)?;
    let layouts = vertex_layouts();

    let desc = PipelineDesc {
        label: "prism triangle pipeline",
        vertex,
        fragment,
        vertex_buffers: &layouts,
        color_format: device.color_format(),
        primitive: PrimitiveType::Triangle,
    };

    Ok(device.create_pipeline(&desc)?)
}
