//! Windowed frame backend
//!
//! Each tick acquires the swapchain texture, records the kernel and the cell
//! draw into one encoder, submits once and presents.

use super::context::GpuContext;
use super::error::GpuError;
use crate::simulation::{driver::FrameBackend, grid::Slot, pipeline::LifePipeline};

/// A configured presentation surface
pub struct PresentSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl PresentSurface {
    pub fn new(
        context: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let surface_capabilities = surface.get_capabilities(context.adapter());
        let Some(&fallback_format) = surface_capabilities.formats.first() else {
            return Err(GpuError::UnsupportedSurface {
                adapter: context.adapter().get_info().name,
            });
        };
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(fallback_format);
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(context.device(), &config);
        log::info!("Surface configured: {:?} {}x{}", format, config.width, config.height);

        Ok(Self { surface, config })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
    }

    fn reconfigure(&self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
    }
}

pub struct SurfaceFrame {
    encoder: wgpu::CommandEncoder,
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

pub struct SurfaceBackend {
    context: GpuContext,
    surface: PresentSurface,
    pipeline: LifePipeline,
}

impl SurfaceBackend {
    pub fn new(context: GpuContext, surface: PresentSurface, pipeline: LifePipeline) -> Self {
        Self {
            context,
            surface,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &LifePipeline {
        &self.pipeline
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(self.context.device(), width, height);
    }

    /// Blocking readback of one generation
    pub fn read_generation(&self, slot: Slot) -> Result<Vec<u32>, GpuError> {
        Ok(self
            .pipeline
            .read_generation(self.context.device(), self.context.queue(), slot)?)
    }
}

impl FrameBackend for SurfaceBackend {
    type Frame = SurfaceFrame;
    type Error = GpuError;

    fn begin_frame(&mut self) -> Result<Option<SurfaceFrame>, GpuError> {
        let texture = match self.surface.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring and skipping tick");
                self.surface.reconfigure(self.context.device());
                return Ok(None);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(GpuError::OutOfMemory),
            Err(err) => {
                log::warn!("Skipping tick: {}", err);
                return Ok(None);
            }
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tick Encoder"),
            });

        Ok(Some(SurfaceFrame {
            encoder,
            texture,
            view,
        }))
    }

    fn simulate(&mut self, frame: &mut SurfaceFrame, read: Slot, _write: Slot) {
        self.pipeline.encode_step(&mut frame.encoder, read);
    }

    fn render(&mut self, frame: &mut SurfaceFrame, current: Slot) {
        self.pipeline
            .encode_draw(&mut frame.encoder, &frame.view, current);
    }

    fn present(&mut self, frame: SurfaceFrame) {
        let SurfaceFrame {
            encoder,
            texture,
            view,
        } = frame;
        drop(view);
        self.context
            .queue()
            .submit(std::iter::once(encoder.finish()));
        texture.present();
    }
}
