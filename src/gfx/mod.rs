//! # Graphics Module
//!
//! Device acquisition, the cell geometry, the instanced cell renderer and the
//! two frame backends: a window surface for the app and an offscreen target
//! for headless runs.

pub mod cell_renderer;
pub mod context;
pub mod error;
pub mod offscreen;
pub mod surface;
pub mod vertex;

pub use cell_renderer::CellRenderer;
pub use context::GpuContext;
pub use error::GpuError;
pub use offscreen::OffscreenBackend;
pub use surface::{PresentSurface, SurfaceBackend};
