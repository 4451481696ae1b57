// src/wgpu_utils/binding_types.rs
//! Binding types for the buffers the grid programs share

fn buffer_binding(ty: wgpu::BufferBindingType) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

pub fn uniform() -> wgpu::BindingType {
    buffer_binding(wgpu::BufferBindingType::Uniform)
}

pub fn storage_buffer_read_only() -> wgpu::BindingType {
    buffer_binding(wgpu::BufferBindingType::Storage { read_only: true })
}

pub fn storage_buffer_read_write() -> wgpu::BindingType {
    buffer_binding(wgpu::BufferBindingType::Storage { read_only: false })
}

/// Layout entry for a non-array binding
pub fn entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    ty: wgpu::BindingType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty,
        count: None,
    }
}
