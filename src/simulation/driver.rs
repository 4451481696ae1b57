//! Frame Driver
//!
//! Owns the step counter and nothing else. Each tick it asks the backend for
//! a frame, records the kernel reading slot `step % 2`, advances the counter,
//! records the draw of the slot just written and presents. The backend trait
//! keeps the sequencing testable without a GPU.

use super::grid::Slot;

/// GPU side of a tick. Calls arrive in the order
/// `begin_frame`, `simulate`, `render`, `present`.
pub trait FrameBackend {
    type Frame;
    type Error;

    /// Acquires whatever the tick records into. `Ok(None)` skips the tick
    /// without touching the step counter.
    fn begin_frame(&mut self) -> Result<Option<Self::Frame>, Self::Error>;

    /// Records the kernel reading `read` and writing `write`
    fn simulate(&mut self, frame: &mut Self::Frame, read: Slot, write: Slot);

    /// Records the draw of generation `current`
    fn render(&mut self, frame: &mut Self::Frame, current: Slot);

    /// Submits everything recorded and shows the result
    fn present(&mut self, frame: Self::Frame);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One generation computed and drawn
    Advanced { generation: u64, current: Slot },
    /// No frame was available; nothing was recorded
    Skipped,
}

#[derive(Debug, Default)]
pub struct FrameDriver {
    step: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed ticks, which is also the generation currently displayed
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Slot holding the newest generation: rendered last tick, read next tick
    pub fn current_slot(&self) -> Slot {
        Slot::from_step(self.step)
    }

    pub fn tick<B: FrameBackend>(&mut self, backend: &mut B) -> Result<TickOutcome, B::Error> {
        let Some(mut frame) = backend.begin_frame()? else {
            return Ok(TickOutcome::Skipped);
        };

        let read = Slot::from_step(self.step);
        let write = read.other();
        backend.simulate(&mut frame, read, write);

        self.step += 1;
        let current = Slot::from_step(self.step);
        debug_assert_eq!(current, write);
        backend.render(&mut frame, current);
        backend.present(frame);

        log::debug!("Generation {} drawn from {:?}", self.step, current);
        Ok(TickOutcome::Advanced {
            generation: self.step,
            current,
        })
    }

    /// Draws the newest generation again without stepping, for exposes and
    /// resizes between ticks. Returns whether a frame was presented.
    pub fn redraw<B: FrameBackend>(&self, backend: &mut B) -> Result<bool, B::Error> {
        let Some(mut frame) = backend.begin_frame()? else {
            return Ok(false);
        };
        backend.render(&mut frame, self.current_slot());
        backend.present(frame);
        Ok(true)
    }
}

/// A driver bound to its backend, exposing the zero-argument tick the timer calls
pub struct FrameLoop<B> {
    driver: FrameDriver,
    backend: B,
}

impl<B: FrameBackend> FrameLoop<B> {
    pub fn new(backend: B) -> Self {
        Self {
            driver: FrameDriver::new(),
            backend,
        }
    }

    pub fn tick(&mut self) -> Result<TickOutcome, B::Error> {
        self.driver.tick(&mut self.backend)
    }

    pub fn redraw(&mut self) -> Result<bool, B::Error> {
        self.driver.redraw(&mut self.backend)
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
