//! Grid dimensions as seen by the GPU programs

use crate::config::GridDimensions;
use crate::wgpu_utils::UniformBuffer;

/// Mirrors `GridParams` in both WGSL programs
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridUniform {
    pub size: [u32; 2],
    pub _padding: [u32; 2],
}

impl From<GridDimensions> for GridUniform {
    fn from(dims: GridDimensions) -> Self {
        Self {
            size: [dims.width, dims.height],
            _padding: [0; 2],
        }
    }
}

/// Uniform buffer written once at startup and bound read-only at binding 0
pub struct GridParams {
    dimensions: GridDimensions,
    buffer: UniformBuffer<GridUniform>,
}

impl GridParams {
    pub fn new(device: &wgpu::Device, dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            buffer: UniformBuffer::new_with_data(device, &GridUniform::from(dimensions)),
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.binding_resource()
    }
}
