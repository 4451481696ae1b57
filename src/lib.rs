// src/lib.rs
//! Toroidal Life
//!
//! Conway's Game of Life on a wrap-around grid, computed and drawn entirely
//! on the GPU with wgpu and winit.

pub mod app;
pub mod config;
pub mod gfx;
pub mod simulation;
pub mod timer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{AppError, LifeApp};
pub use config::{GridDimensions, LifeConfig};
pub use simulation::Seed;

/// Opens the window and runs the simulation with `config` until it closes
pub fn run(config: LifeConfig) -> Result<(), AppError> {
    LifeApp::new(config)?.run()
}
