// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Typed buffer wrappers, layout-entry helpers and shader compilation.

pub mod binding_types;
pub mod buffers;
pub mod shader;

// Re-export main types
pub use binding_types::*;
pub use buffers::{read_texture_rgba8, ReadbackError, StorageArray, UniformBuffer};
pub use shader::compile_wgsl;
