//! Fixed triangle geometry.
//!
//! Positions and colors live in two separate, index-aligned vertex streams:
//! slot 0 carries clip-space positions, slot 1 carries RGBA colors.

use bytemuck::{Pod, Zeroable};

/// Number of vertices drawn per frame. Both streams hold exactly this many elements.
pub const TRIANGLE_VERTEX_COUNT: u32 = 3;

pub const POSITION_SLOT: u32 = 0;
pub const COLOR_SLOT: u32 = 1;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub xyzw: [f32; 4],
}

impl Position {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Position>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub rgba: [f32; 4],
}

impl Color {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Color>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const TRIANGLE_POSITIONS: [Position; TRIANGLE_VERTEX_COUNT as usize] = [
    Position { xyzw: [ 0.0,  0.5, 0.0, 1.0] },
    Position { xyzw: [-0.5, -0.5, 0.0, 1.0] },
    Position { xyzw: [ 0.5, -0.5, 0.0, 1.0] },
];

pub const TRIANGLE_COLORS: [Color; TRIANGLE_VERTEX_COUNT as usize] = [
    Color { rgba: [1.0, 0.0, 0.0, 1.0] },
    Color { rgba: [0.0, 1.0, 0.0, 1.0] },
    Color { rgba: [0.0, 0.0, 1.0, 1.0] },
];

/// Vertex buffer layouts in slot order, as expected by the geometry shader.
pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [Position::layout(), Color::layout()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_match_draw_vertex_count() {
        assert_eq!(TRIANGLE_POSITIONS.len(), TRIANGLE_VERTEX_COUNT as usize);
        assert_eq!(TRIANGLE_COLORS.len(), TRIANGLE_VERTEX_COUNT as usize);
    }

    #[test]
    fn streams_are_four_floats_per_element() {
        let pos: &[f32] = bytemuck::cast_slice(&TRIANGLE_POSITIONS);
        let col: &[f32] = bytemuck::cast_slice(&TRIANGLE_COLORS);
        assert_eq!(pos.len(), 3 * 4);
        assert_eq!(col.len(), 3 * 4);
    }

    #[test]
    fn positions_are_homogeneous_with_unit_w() {
        for p in TRIANGLE_POSITIONS {
            assert_eq!(p.xyzw[3], 1.0);
            assert_eq!(p.xyzw[2], 0.0);
        }
    }

    #[test]
    fn colors_are_opaque_primaries() {
        let rgb: Vec<[f32; 3]> = TRIANGLE_COLORS
            .iter()
            .map(|c| [c.rgba[0], c.rgba[1], c.rgba[2]])
            .collect();
        assert_eq!(rgb, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(TRIANGLE_COLORS.iter().all(|c| c.rgba[3] == 1.0));
    }

    #[test]
    fn layouts_follow_slot_order() {
        let [pos, col] = vertex_layouts();
        assert_eq!(pos.array_stride, 16);
        assert_eq!(col.array_stride, 16);
        assert_eq!(pos.attributes[0].shader_location, POSITION_SLOT);
        assert_eq!(col.attributes[0].shader_location, COLOR_SLOT);
    }
}
