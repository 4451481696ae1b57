//! Errors raised while acquiring or driving the GPU

use crate::wgpu_utils::ReadbackError;

/// Error type for GPU operations.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("Failed to create a presentation surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("Surface is not supported by adapter '{adapter}'")]
    UnsupportedSurface { adapter: String },

    #[error("GPU ran out of memory while acquiring a frame")]
    OutOfMemory,

    #[error("Generation readback failed: {0}")]
    Readback(#[from] ReadbackError),
}
