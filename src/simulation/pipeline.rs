//! GPU resources for one run: parameters, the ping-pong pair, the shared
//! bindings, the kernel and the cell renderer.

use super::bindings::GridBindings;
use super::grid::{GridError, GridStore, Slot};
use super::kernel::LifeKernel;
use super::seed::initial_generations;
use super::uniforms::GridParams;
use crate::config::{ConfigError, GridDimensions, LifeConfig};
use crate::gfx::cell_renderer::CellRenderer;
use crate::wgpu_utils::ReadbackError;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid initial generation: {0}")]
    Grid(#[from] GridError),
}

pub struct LifePipeline {
    params: GridParams,
    store: GridStore,
    bindings: GridBindings,
    kernel: LifeKernel,
    renderer: CellRenderer,
}

impl LifePipeline {
    /// Validates `config`, seeds both generations from it and builds every
    /// GPU object the frame loop needs.
    pub fn new(
        device: &wgpu::Device,
        config: &LifeConfig,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let initial = initial_generations(config.pattern, config.dimensions, config.seed);
        log::info!(
            "Seeded {}x{} grid with {} pattern",
            config.dimensions.width,
            config.dimensions.height,
            config.pattern.as_str()
        );
        Self::build(device, config, &initial, target_format)
    }

    /// Like [`LifePipeline::new`] but with explicit contents for slots A and B
    pub fn with_generations(
        device: &wgpu::Device,
        config: &LifeConfig,
        initial: &[Vec<u32>; 2],
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        Self::build(device, config, initial, target_format)
    }

    fn build(
        device: &wgpu::Device,
        config: &LifeConfig,
        initial: &[Vec<u32>; 2],
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, SetupError> {
        let dimensions = config.dimensions;

        let params = GridParams::new(device, dimensions);
        let store = GridStore::new(device, dimensions, initial)?;
        let bindings = GridBindings::new(device, &params, &store);
        let kernel = LifeKernel::new(device, &bindings, dimensions, config.tile_size);
        let renderer = CellRenderer::new(device, &bindings, dimensions, target_format);

        Ok(Self {
            params,
            store,
            bindings,
            kernel,
            renderer,
        })
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.params.dimensions()
    }

    /// Records the compute pass for `read -> read.other()`
    pub fn encode_step(&self, encoder: &mut wgpu::CommandEncoder, read: Slot) {
        self.kernel.encode(encoder, &self.bindings, read);
    }

    /// Records the render pass drawing generation `current` into `view`
    pub fn encode_draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        current: Slot,
    ) {
        self.renderer.encode(encoder, view, &self.bindings, current);
    }

    /// Overwrites one slot; takes effect for work submitted afterwards
    pub fn upload_generation(
        &self,
        queue: &wgpu::Queue,
        slot: Slot,
        cells: &[u32],
    ) -> Result<(), GridError> {
        self.store.upload(queue, slot, cells)
    }

    pub fn read_generation(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: Slot,
    ) -> Result<Vec<u32>, ReadbackError> {
        self.store.read(device, queue, slot)
    }
}
