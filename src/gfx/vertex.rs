//! # Vertex Data Structures
//!
//! The single piece of static geometry in the app: one square, drawn once
//! per cell by the instanced render routine.

/// Half-extent of the cell square; anything under 1.0 leaves a gap between cells.
pub const CELL_EXTENT: f32 = 0.8;

/// A 2D vertex in cell-local coordinates, where the cell spans [-1, 1].
///
/// `#[repr(C)]` keeps the layout identical to the `@location(0) vec2<f32>`
/// vertex input of the cell shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    pub position: [f32; 2],
}

/// Two counter-clockwise triangles forming the cell square
pub const CELL_QUAD: [Vertex2D; 6] = [
    Vertex2D { position: [-CELL_EXTENT, -CELL_EXTENT] },
    Vertex2D { position: [CELL_EXTENT, -CELL_EXTENT] },
    Vertex2D { position: [CELL_EXTENT, CELL_EXTENT] },
    Vertex2D { position: [-CELL_EXTENT, -CELL_EXTENT] },
    Vertex2D { position: [CELL_EXTENT, CELL_EXTENT] },
    Vertex2D { position: [-CELL_EXTENT, CELL_EXTENT] },
];

impl Vertex2D {
    /// Vertex buffer layout: attribute 0 is the position (Float32x2).
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex2D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}
