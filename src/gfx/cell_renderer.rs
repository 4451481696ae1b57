//! Instanced cell rendering
//!
//! One draw call covers the whole grid: `width * height` instances of the
//! six-vertex cell square. The vertex shader turns the instance index into a
//! grid coordinate, looks the cell up in the current generation buffer and
//! scales the square by its state, so dead cells collapse to a point.

use wgpu::util::DeviceExt;

use super::vertex::{Vertex2D, CELL_QUAD};
use crate::config::GridDimensions;
use crate::simulation::{bindings::GridBindings, grid::Slot};
use crate::wgpu_utils::compile_wgsl;

/// Background behind dead cells
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.4,
    a: 1.0,
};

pub struct CellRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instance_count: u32,
}

impl CellRenderer {
    pub fn new(
        device: &wgpu::Device,
        bindings: &GridBindings,
        dimensions: GridDimensions,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = compile_wgsl(device, "Cell Shader", CELL_SHADER);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cell Vertex Buffer"),
            contents: bytemuck::cast_slice(&CELL_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Cell Pipeline Layout"),
                bind_group_layouts: &[bindings.layout()],
                push_constant_ranges: &[],
            });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cell Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex2D::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            vertex_count: CELL_QUAD.len() as u32,
            instance_count: dimensions.width * dimensions.height,
        }
    }

    /// Records a pass that clears `view` and draws generation `current`
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        bindings: &GridBindings,
        current: Slot,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cell Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bindings.reading(current), &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..self.instance_count);
    }
}

/// Clip-space rectangle `(min, max)` of instance `index` at full size.
///
/// Same arithmetic as `vs_main` with the vertex at the cell corners (-1, 1).
pub fn cell_clip_rect(index: u32, dims: GridDimensions) -> ([f32; 2], [f32; 2]) {
    let size = [dims.width as f32, dims.height as f32];
    let cell = [(index % dims.width) as f32, (index / dims.width) as f32];
    let corner = |local: f32, axis: usize| {
        (local + 1.0) / size[axis] - 1.0 + cell[axis] / size[axis] * 2.0
    };
    (
        [corner(-1.0, 0), corner(-1.0, 1)],
        [corner(1.0, 0), corner(1.0, 1)],
    )
}

// Instanced cell shader
const CELL_SHADER: &str = r#"
struct GridParams {
    size: vec2<u32>,
    _padding: vec2<u32>,
}

@group(0) @binding(0) var<uniform> grid: GridParams;
@group(0) @binding(1) var<storage, read> cell_state: array<u32>;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @builtin(instance_index) instance: u32,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) cell: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    let size = vec2<f32>(grid.size);
    let cell = vec2<f32>(
        f32(input.instance % grid.size.x),
        f32(input.instance / grid.size.x),
    );
    let state = f32(cell_state[input.instance]);

    // Dead cells scale to a single point and cover no pixels.
    let cell_offset = cell / size * 2.0;
    let grid_position = (input.position * state + 1.0) / size - 1.0 + cell_offset;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(grid_position, 0.0, 1.0);
    out.cell = cell;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let c = input.cell / vec2<f32>(grid.size);
    return vec4<f32>(c, 1.0 - c.x, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_first_and_last_cells_touch_the_viewport_corners() {
        let dims = GridDimensions::new(4, 2);
        let (min, _) = cell_clip_rect(0, dims);
        assert!((min[0] + 1.0).abs() < EPSILON && (min[1] + 1.0).abs() < EPSILON);

        let (_, max) = cell_clip_rect(7, dims);
        assert!((max[0] - 1.0).abs() < EPSILON && (max[1] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cells_tile_without_overlap() {
        let dims = GridDimensions::square(8);
        for index in 0..(dims.width - 1) {
            let (min, max) = cell_clip_rect(index, dims);
            let (next_min, _) = cell_clip_rect(index + 1, dims);
            assert!((max[0] - next_min[0]).abs() < EPSILON);
            assert!((min[1] - next_min[1]).abs() < EPSILON);
        }
        let (min, max) = cell_clip_rect(9, dims);
        assert!((max[0] - min[0] - 2.0 / 8.0).abs() < EPSILON);
        assert!((max[1] - min[1] - 2.0 / 8.0).abs() < EPSILON);
        // Index 9 on an 8-wide grid is column 1, row 1.
        assert!((min[0] - (-1.0 + 0.25)).abs() < EPSILON);
        assert!((min[1] - (-1.0 + 0.25)).abs() < EPSILON);
    }

    #[test]
    fn test_shader_reads_the_shared_bindings() {
        assert!(CELL_SHADER.contains("@group(0) @binding(0) var<uniform> grid"));
        assert!(CELL_SHADER.contains("@group(0) @binding(1) var<storage, read> cell_state"));
    }
}
