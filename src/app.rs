use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::LifeConfig;
use crate::gfx::{GpuContext, GpuError, PresentSurface, SurfaceBackend};
use crate::simulation::{rules, FrameLoop, LifePipeline, SetupError, TickOutcome};
use crate::timer::IntervalTimer;

/// Logical size of the square window
pub const WINDOW_SIZE: u32 = 512;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

pub struct LifeApp {
    event_loop: EventLoop<()>,
    state: AppState,
}

struct AppState {
    config: LifeConfig,
    window: Option<Arc<Window>>,
    frame_loop: Option<FrameLoop<SurfaceBackend>>,
    timer: IntervalTimer,
    tick_due: bool,
    error: Option<AppError>,
}

impl LifeApp {
    pub fn new(config: LifeConfig) -> Result<Self, AppError> {
        config.validate().map_err(SetupError::from)?;
        let event_loop = EventLoop::new()?;
        let timer = IntervalTimer::new(config.tick_period, Instant::now());

        Ok(Self {
            event_loop,
            state: AppState {
                config,
                window: None,
                frame_loop: None,
                timer,
                tick_due: false,
                error: None,
            },
        })
    }

    /// Runs until the window closes. Errors raised inside the loop end it
    /// and are returned here.
    pub fn run(self) -> Result<(), AppError> {
        let LifeApp {
            event_loop,
            mut state,
        } = self;
        event_loop.set_control_flow(ControlFlow::WaitUntil(state.timer.deadline()));
        event_loop.run_app(&mut state)?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

async fn create_backend(
    window: Arc<Window>,
    config: &LifeConfig,
) -> Result<SurfaceBackend, AppError> {
    let instance = GpuContext::create_instance();
    let surface = instance
        .create_surface(window.clone())
        .map_err(GpuError::from)?;
    let context = GpuContext::new(&instance, Some(&surface)).await?;

    let PhysicalSize { width, height } = window.inner_size();
    let surface = PresentSurface::new(&context, surface, width, height)?;
    let pipeline = LifePipeline::new(context.device(), config, surface.format())?;

    Ok(SurfaceBackend::new(context, surface, pipeline))
}

/// Whether the live-cell census runs after `generation`
fn census_due(interval: Option<u64>, generation: u64) -> bool {
    interval.is_some_and(|every| every > 0 && generation % every == 0)
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return;
        };

        let outcome = match frame_loop.tick() {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(event_loop, err.into()),
        };

        if let TickOutcome::Advanced {
            generation,
            current,
        } = outcome
        {
            if census_due(self.config.census_interval, generation) {
                match frame_loop.backend().read_generation(current) {
                    Ok(cells) => log::info!(
                        "Generation {}: {} live cells",
                        generation,
                        rules::population(&cells)
                    ),
                    Err(err) => log::warn!("Census readback failed: {}", err),
                }
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Toroidal Life")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        match pollster::block_on(create_backend(window.clone(), &self.config)) {
            Ok(backend) => {
                self.frame_loop = Some(FrameLoop::new(backend));
                self.timer = IntervalTimer::new(self.config.tick_period, Instant::now());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(frame_loop) = self.frame_loop.as_mut() {
                    frame_loop.backend_mut().resize(width, height);
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if std::mem::take(&mut self.tick_due) {
                    self.tick(event_loop);
                } else if let Some(frame_loop) = self.frame_loop.as_mut() {
                    if let Err(err) = frame_loop.redraw() {
                        self.fail(event_loop, err.into());
                    }
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.timer.poll(Instant::now()) {
            self.tick_due = true;
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.timer.deadline()));
    }
}
