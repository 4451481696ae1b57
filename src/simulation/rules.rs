//! Host-side mirror of the kernel's cell math
//!
//! The functions here follow `LIFE_KERNEL_SHADER` line for line: toroidal
//! neighbor lookup, the B3/S23 transition and a whole-grid step. They exist so
//! GPU readback can be checked against a known answer; the running app never
//! steps the grid on the CPU.

use crate::config::GridDimensions;

pub const DEAD: u32 = 0;
pub const ALIVE: u32 = 1;

/// Offsets of the Moore neighborhood, row by row, centre excluded
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Moves `coord` by `delta` (one of -1, 0, 1) on an axis of length `dim`,
/// wrapping at both ends. Unsigned throughout, as in the shader.
pub fn wrap(coord: u32, delta: i32, dim: u32) -> u32 {
    match delta {
        -1 => (coord + dim - 1) % dim,
        1 => (coord + 1) % dim,
        _ => coord % dim,
    }
}

/// Flat indices of the eight neighbors of `(x, y)`
pub fn neighbor_indices(x: u32, y: u32, dims: GridDimensions) -> [usize; 8] {
    NEIGHBOR_OFFSETS.map(|(dx, dy)| {
        dims.index(wrap(x, dx, dims.width), wrap(y, dy, dims.height))
    })
}

/// Conway transition: stasis on 2, birth or survival on 3, death otherwise
pub fn next_state(state: u32, live_neighbors: u32) -> u32 {
    match live_neighbors {
        2 => state,
        3 => ALIVE,
        _ => DEAD,
    }
}

/// Computes generation N+1 from generation N
pub fn step(cells: &[u32], dims: GridDimensions) -> Vec<u32> {
    debug_assert_eq!(cells.len(), dims.cell_count());
    let mut next = vec![DEAD; cells.len()];
    for y in 0..dims.height {
        for x in 0..dims.width {
            let live: u32 = neighbor_indices(x, y, dims)
                .iter()
                .map(|&i| cells[i])
                .sum();
            let index = dims.index(x, y);
            next[index] = next_state(cells[index], live);
        }
    }
    next
}

/// Number of live cells in a generation
pub fn population(cells: &[u32]) -> usize {
    cells.iter().filter(|&&cell| cell != DEAD).count()
}
