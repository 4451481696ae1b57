//! Simulation Kernel
//!
//! One compute invocation per cell, grouped into square tiles of
//! `tile_size x tile_size`. The tile size is baked into the WGSL source as a
//! module constant, so `@workgroup_size` and the host's dispatch count come
//! from the same configuration value.

use super::bindings::GridBindings;
use super::grid::Slot;
use crate::config::GridDimensions;
use crate::wgpu_utils::compile_wgsl;

pub struct LifeKernel {
    pipeline: wgpu::ComputePipeline,
    dispatch_size: (u32, u32),
}

impl LifeKernel {
    pub fn new(
        device: &wgpu::Device,
        bindings: &GridBindings,
        dimensions: GridDimensions,
        tile_size: u32,
    ) -> Self {
        let source = kernel_source(tile_size);
        let shader = compile_wgsl(device, "Life Kernel Shader", &source);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Life Kernel Pipeline Layout"),
            bind_group_layouts: &[bindings.layout()],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Life Kernel Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("compute_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let dispatch_size = dimensions.tiles(tile_size);
        log::info!(
            "Life kernel ready: {}x{} tiles of {}x{} cells",
            dispatch_size.0,
            dispatch_size.1,
            tile_size,
            tile_size
        );

        Self {
            pipeline,
            dispatch_size,
        }
    }

    /// Records one generation step reading `read` and writing its partner
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, bindings: &GridBindings, read: Slot) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Life Kernel Pass"),
            timestamp_writes: None,
        });

        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, bindings.reading(read), &[]);
        compute_pass.dispatch_workgroups(self.dispatch_size.0, self.dispatch_size.1, 1);
    }
}

/// Kernel WGSL with the tile size prepended as `WORKGROUP_SIZE`
pub fn kernel_source(tile_size: u32) -> String {
    format!(
        "const WORKGROUP_SIZE: u32 = {}u;\n{}",
        tile_size, LIFE_KERNEL_SHADER
    )
}

// Conway's Game of Life on a torus
const LIFE_KERNEL_SHADER: &str = r#"
struct GridParams {
    size: vec2<u32>,
    _padding: vec2<u32>,
}

@group(0) @binding(0) var<uniform> grid: GridParams;
@group(0) @binding(1) var<storage, read> cell_state_in: array<u32>;
@group(0) @binding(2) var<storage, read_write> cell_state_out: array<u32>;

// Moves `coord` by -1, 0 or 1 along an axis of length `dim`, wrapping at both ends.
fn wrap_axis(coord: u32, delta: i32, dim: u32) -> u32 {
    if (delta < 0) {
        return (coord + dim - 1u) % dim;
    }
    return (coord + u32(delta)) % dim;
}

fn cell_active(x: u32, y: u32) -> u32 {
    return cell_state_in[y * grid.size.x + x];
}

@compute @workgroup_size(WORKGROUP_SIZE, WORKGROUP_SIZE)
fn compute_main(@builtin(global_invocation_id) cell: vec3<u32>) {
    // Tiles hanging over the grid edge
    if (cell.x >= grid.size.x || cell.y >= grid.size.y) {
        return;
    }

    var live_neighbors = 0u;
    for (var dy: i32 = -1; dy <= 1; dy++) {
        for (var dx: i32 = -1; dx <= 1; dx++) {
            if (dx == 0 && dy == 0) {
                continue;
            }
            let nx = wrap_axis(cell.x, dx, grid.size.x);
            let ny = wrap_axis(cell.y, dy, grid.size.y);
            live_neighbors += cell_active(nx, ny);
        }
    }

    let index = cell.y * grid.size.x + cell.x;
    switch live_neighbors {
        case 2u: {
            cell_state_out[index] = cell_state_in[index];
        }
        case 3u: {
            cell_state_out[index] = 1u;
        }
        default: {
            cell_state_out[index] = 0u;
        }
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_carries_tile_size() {
        let source = kernel_source(16);
        assert!(source.starts_with("const WORKGROUP_SIZE: u32 = 16u;"));
        assert!(source.contains("@workgroup_size(WORKGROUP_SIZE, WORKGROUP_SIZE)"));
    }

    #[test]
    fn test_source_binding_contract() {
        let source = kernel_source(8);
        assert!(source.contains("@group(0) @binding(0) var<uniform> grid"));
        assert!(source.contains("@group(0) @binding(1) var<storage, read> cell_state_in"));
        assert!(source.contains("@group(0) @binding(2) var<storage, read_write> cell_state_out"));
    }
}
