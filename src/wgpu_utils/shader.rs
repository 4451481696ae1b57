//! WGSL compilation helper

/// Compiles WGSL source text into a shader module.
///
/// Validation errors surface through wgpu's uncaptured error handler, the same
/// as every other pipeline object creation.
pub fn compile_wgsl(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    log::debug!("Compiling shader '{}' ({} bytes)", label, source.len());
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
