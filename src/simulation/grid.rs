//! Grid State Store
//!
//! Two equally sized storage buffers of `u32` state flags, one per [`Slot`].
//! Which slot is read and which is written on a given tick is decided by the
//! frame driver; the store only hands out buffers by slot.

use crate::config::GridDimensions;
use crate::wgpu_utils::{ReadbackError, StorageArray};

/// One of the two physical generation buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::A, Slot::B];

    /// Slot read by the kernel on tick `step` (and rendered after tick `step - 1`)
    pub fn from_step(step: u64) -> Self {
        if step % 2 == 0 {
            Slot::A
        } else {
            Slot::B
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::A => "Cell State A",
            Slot::B => "Cell State B",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("generation for slot {slot:?} has {actual} cells, grid needs {expected}")]
    LengthMismatch {
        slot: Slot,
        expected: usize,
        actual: usize,
    },
}

/// The ping-pong pair
pub struct GridStore {
    dimensions: GridDimensions,
    buffers: [StorageArray<u32>; 2],
}

impl GridStore {
    /// Allocates both buffers, seeding slot A with `initial[0]` and slot B
    /// with `initial[1]`.
    pub fn new(
        device: &wgpu::Device,
        dimensions: GridDimensions,
        initial: &[Vec<u32>; 2],
    ) -> Result<Self, GridError> {
        for slot in Slot::ALL {
            check_len(dimensions, slot, &initial[slot.index()])?;
        }

        let buffers = Slot::ALL
            .map(|slot| StorageArray::new_with_data(device, slot.label(), &initial[slot.index()]));

        log::info!(
            "Allocated generation buffers: 2 x {} cells ({} bytes each)",
            dimensions.cell_count(),
            buffers[0].size_bytes()
        );

        Ok(Self {
            dimensions,
            buffers,
        })
    }

    pub fn get(&self, slot: Slot) -> &StorageArray<u32> {
        &self.buffers[slot.index()]
    }

    /// Replaces the contents of one slot
    pub fn upload(&self, queue: &wgpu::Queue, slot: Slot, cells: &[u32]) -> Result<(), GridError> {
        check_len(self.dimensions, slot, cells)?;
        self.get(slot).write(queue, cells);
        Ok(())
    }

    /// Blocking readback of one slot, after all submitted work has finished
    pub fn read(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: Slot,
    ) -> Result<Vec<u32>, ReadbackError> {
        self.get(slot).read_back(device, queue)
    }
}

fn check_len(dimensions: GridDimensions, slot: Slot, cells: &[u32]) -> Result<(), GridError> {
    let expected = dimensions.cell_count();
    if cells.len() != expected {
        return Err(GridError::LengthMismatch {
            slot,
            expected,
            actual: cells.len(),
        });
    }
    Ok(())
}
