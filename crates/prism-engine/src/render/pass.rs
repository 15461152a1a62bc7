//! Backend-neutral render pass recording.
//!
//! A [`RenderPass`] is a plain list of commands against one color attachment.
//! The renderer records it through a [`RenderPassEncoder`]; the device replays
//! it onto real GPU commands (or, in tests, keeps it for inspection).

/// Clear value for a color attachment, in linear RGBA.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    pub const OPAQUE_BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// The pass's single color target. The texture itself is the frame's drawable.
///
/// The target is always cleared to `clear_color` on load and its contents
/// are stored at the end of the pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorAttachment {
    pub clear_color: ClearColor,
}

impl ColorAttachment {
    pub fn cleared(color: ClearColor) -> Self {
        Self { clear_color: color }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveType {
    /// Independent triangles, three vertices each.
    Triangle,
}

impl PrimitiveType {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveType::Triangle => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

#[derive(Debug)]
pub enum DrawCommand<'a, P, B> {
    SetPipeline(&'a P),
    SetVertexBuffer { slot: u32, buffer: &'a B },
    Draw {
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
    },
}

/// One recorded pass, bounded by [`RenderPassEncoder::begin`] and
/// [`RenderPassEncoder::end_encoding`].
#[derive(Debug)]
pub struct RenderPass<'a, P, B> {
    pub label: &'static str,
    pub color: ColorAttachment,
    pub commands: Vec<DrawCommand<'a, P, B>>,
}

pub struct RenderPassEncoder<'a, P, B> {
    pass: RenderPass<'a, P, B>,
}

impl<'a, P, B> RenderPassEncoder<'a, P, B> {
    pub fn begin(label: &'static str, color: ColorAttachment) -> Self {
        Self {
            pass: RenderPass {
                label,
                color,
                commands: Vec::with_capacity(4),
            },
        }
    }

    pub fn set_render_pipeline(&mut self, pipeline: &'a P) {
        self.pass.commands.push(DrawCommand::SetPipeline(pipeline));
    }

    pub fn set_vertex_buffer(&mut self, slot: u32, buffer: &'a B) {
        self.pass
            .commands
            .push(DrawCommand::SetVertexBuffer { slot, buffer });
    }

    pub fn draw_primitives(
        &mut self,
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
    ) {
        self.pass.commands.push(DrawCommand::Draw {
            primitive,
            vertex_start,
            vertex_count,
            instance_count,
        });
    }

    pub fn end_encoding(self) -> RenderPass<'a, P, B> {
        self.pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_keeps_command_order() {
        let (pipeline, vb0, vb1) = ("pipeline", "positions", "colors");

        let mut enc = RenderPassEncoder::begin("t", ColorAttachment::cleared(ClearColor::OPAQUE_BLACK));
        enc.set_render_pipeline(&pipeline);
        enc.set_vertex_buffer(0, &vb0);
        enc.set_vertex_buffer(1, &vb1);
        enc.draw_primitives(PrimitiveType::Triangle, 0, 3, 1);
        let pass = enc.end_encoding();

        assert_eq!(pass.commands.len(), 4);
        assert!(matches!(pass.commands[0], DrawCommand::SetPipeline(&"pipeline")));
        assert!(matches!(pass.commands[1], DrawCommand::SetVertexBuffer { slot: 0, buffer: &"positions" }));
        assert!(matches!(pass.commands[2], DrawCommand::SetVertexBuffer { slot: 1, buffer: &"colors" }));
        assert!(matches!(
            pass.commands[3],
            DrawCommand::Draw {
                primitive: PrimitiveType::Triangle,
                vertex_start: 0,
                vertex_count: 3,
                instance_count: 1,
            }
        ));
    }

    #[test]
    fn cleared_attachment_keeps_clear_color() {
        let c = ColorAttachment::cleared(ClearColor::OPAQUE_BLACK);
        assert_eq!(c.clear_color, ClearColor::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn triangle_maps_to_triangle_list() {
        assert_eq!(PrimitiveType::Triangle.topology(), wgpu::PrimitiveTopology::TriangleList);
    }
}
