//! Headless frame backend
//!
//! Renders into an owned texture instead of a window so the full tick
//! (compute pass, render pass, submit) can run in tests.

use std::convert::Infallible;

use super::context::GpuContext;
use super::error::GpuError;
use crate::config::{GridDimensions, LifeConfig};
use crate::simulation::{
    driver::FrameBackend,
    grid::Slot,
    pipeline::{LifePipeline, SetupError},
};
use crate::wgpu_utils::read_texture_rgba8;

pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Side of one cell in the target built by [`OffscreenBackend::from_config`]
pub const CELL_PIXELS: u32 = 8;

/// Largest target side, the downlevel `max_texture_dimension_2d`
const MAX_TARGET_SIDE: u32 = 2048;

pub struct OffscreenBackend {
    context: GpuContext,
    pipeline: LifePipeline,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    submissions: u64,
}

impl OffscreenBackend {
    pub fn new(
        context: GpuContext,
        pipeline: LifePipeline,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = context.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            context,
            pipeline,
            texture,
            view,
            submissions: 0,
        }
    }

    /// Builds the pipeline from `config` and wraps it in a backend whose
    /// target gives every cell `CELL_PIXELS` square pixels
    pub fn from_config(context: GpuContext, config: &LifeConfig) -> Result<Self, SetupError> {
        let pipeline = LifePipeline::new(context.device(), config, OFFSCREEN_FORMAT)?;
        Ok(Self::fitted(context, pipeline))
    }

    /// Like [`OffscreenBackend::from_config`] with explicit slot contents
    pub fn with_generations(
        context: GpuContext,
        config: &LifeConfig,
        initial: &[Vec<u32>; 2],
    ) -> Result<Self, SetupError> {
        let pipeline =
            LifePipeline::with_generations(context.device(), config, initial, OFFSCREEN_FORMAT)?;
        Ok(Self::fitted(context, pipeline))
    }

    fn fitted(context: GpuContext, pipeline: LifePipeline) -> Self {
        let (width, height) = target_size(pipeline.dimensions());
        Self::new(context, pipeline, width, height)
    }

    pub fn pipeline(&self) -> &LifePipeline {
        &self.pipeline
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    pub fn read_generation(&self, slot: Slot) -> Result<Vec<u32>, GpuError> {
        Ok(self
            .pipeline
            .read_generation(self.context.device(), self.context.queue(), slot)?)
    }

    /// Target size in pixels
    pub fn size(&self) -> (u32, u32) {
        let size = self.texture.size();
        (size.width, size.height)
    }

    /// Last presented frame, row-major from the top-left pixel
    pub fn read_pixels(&self) -> Result<Vec<[u8; 4]>, GpuError> {
        Ok(read_texture_rgba8(
            self.context.device(),
            self.context.queue(),
            &self.texture,
        )?)
    }
}

fn target_size(dimensions: GridDimensions) -> (u32, u32) {
    let side = |cells: u32| cells.saturating_mul(CELL_PIXELS).min(MAX_TARGET_SIDE);
    (side(dimensions.width), side(dimensions.height))
}

impl FrameBackend for OffscreenBackend {
    type Frame = wgpu::CommandEncoder;
    type Error = Infallible;

    fn begin_frame(&mut self) -> Result<Option<wgpu::CommandEncoder>, Infallible> {
        let encoder = self
            .context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Tick Encoder"),
            });
        Ok(Some(encoder))
    }

    fn simulate(&mut self, encoder: &mut wgpu::CommandEncoder, read: Slot, _write: Slot) {
        self.pipeline.encode_step(encoder, read);
    }

    fn render(&mut self, encoder: &mut wgpu::CommandEncoder, current: Slot) {
        self.pipeline.encode_draw(encoder, &self.view, current);
    }

    fn present(&mut self, encoder: wgpu::CommandEncoder) {
        self.context
            .queue()
            .submit(std::iter::once(encoder.finish()));
        self.submissions += 1;
    }
}
