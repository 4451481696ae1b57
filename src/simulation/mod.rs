//! Simulation system
//!
//! The ping-pong generation buffers, the bindings shared by the compute and
//! render stages, the tiled Life kernel and the driver that alternates the
//! buffer roles each tick. [`rules`] is a host-side mirror of the kernel
//! used for verification.

pub mod bindings;
pub mod driver;
pub mod grid;
pub mod kernel;
pub mod pipeline;
pub mod rules;
pub mod seed;
pub mod uniforms;

pub use driver::{FrameBackend, FrameDriver, FrameLoop, TickOutcome};
pub use grid::{GridError, GridStore, Slot};
pub use pipeline::{LifePipeline, SetupError};
pub use seed::Seed;
