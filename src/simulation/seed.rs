//! Initial generations
//!
//! Buffer A takes the configured [`Seed`], buffer B takes an alternating
//! even/odd pattern. The only requirement on the pair is that it differs, so
//! the first rendered frame visibly changes.

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::rules::{ALIVE, DEAD};
use crate::config::GridDimensions;

const GLIDER: &[(u32, u32)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

const BLINKER: &[(u32, u32)] = &[(0, 0), (1, 0), (2, 0)];

const BLOCK: &[(u32, u32)] = &[(0, 0), (1, 0), (0, 1), (1, 1)];

const GOSPER_GUN: &[(u32, u32)] = &[
    (24, 0),
    (22, 1),
    (24, 1),
    (12, 2),
    (13, 2),
    (20, 2),
    (21, 2),
    (34, 2),
    (35, 2),
    (11, 3),
    (15, 3),
    (20, 3),
    (21, 3),
    (34, 3),
    (35, 3),
    (0, 4),
    (1, 4),
    (10, 4),
    (16, 4),
    (20, 4),
    (21, 4),
    (0, 5),
    (1, 5),
    (10, 5),
    (14, 5),
    (16, 5),
    (17, 5),
    (22, 5),
    (24, 5),
    (10, 6),
    (16, 6),
    (24, 6),
    (11, 7),
    (15, 7),
    (12, 8),
    (13, 8),
];

/// Content of the first generation buffer
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Seed {
    /// Every cell independently alive with probability `density`
    Scattered { density: f64 },
    /// Cells at even flat indices alive
    Alternating,
    Glider,
    Blinker,
    Block,
    GosperGun,
    Empty,
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Scattered { density: 0.4 }
    }
}

impl Seed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seed::Scattered { .. } => "Scattered",
            Seed::Alternating => "Alternating",
            Seed::Glider => "Glider",
            Seed::Blinker => "Blinker",
            Seed::Block => "Block",
            Seed::GosperGun => "Gosper Gun",
            Seed::Empty => "Empty",
        }
    }

    fn shape(&self) -> Option<&'static [(u32, u32)]> {
        match self {
            Seed::Glider => Some(GLIDER),
            Seed::Blinker => Some(BLINKER),
            Seed::Block => Some(BLOCK),
            Seed::GosperGun => Some(GOSPER_GUN),
            _ => None,
        }
    }

    /// Builds one generation from this seed
    pub fn generate<R: Rng>(&self, dims: GridDimensions, rng: &mut R) -> Vec<u32> {
        match self {
            Seed::Scattered { density } => {
                let p = if density.is_finite() {
                    density.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (0..dims.cell_count())
                    .map(|_| if rng.random_bool(p) { ALIVE } else { DEAD })
                    .collect()
            }
            Seed::Alternating => alternating(dims),
            Seed::Empty => vec![DEAD; dims.cell_count()],
            shaped => place_centered(shaped.shape().unwrap_or_default(), dims),
        }
    }
}

/// Even flat indices alive, odd ones dead
pub fn alternating(dims: GridDimensions) -> Vec<u32> {
    (0..dims.cell_count())
        .map(|i| if i % 2 == 0 { ALIVE } else { DEAD })
        .collect()
}

/// Stamps `shape` around the grid centre; cells past an edge wrap around.
pub fn place_centered(shape: &[(u32, u32)], dims: GridDimensions) -> Vec<u32> {
    let mut cells = vec![DEAD; dims.cell_count()];
    let shape_width = shape.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let shape_height = shape.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
    let origin_x = (dims.width / 2 + dims.width - (shape_width / 2) % dims.width) % dims.width;
    let origin_y = (dims.height / 2 + dims.height - (shape_height / 2) % dims.height) % dims.height;

    for &(dx, dy) in shape {
        let x = (origin_x + dx % dims.width) % dims.width;
        let y = (origin_y + dy % dims.height) % dims.height;
        cells[dims.index(x, y)] = ALIVE;
    }
    cells
}

/// Builds the `[A, B]` pair uploaded at startup.
///
/// If A happens to equal the alternating pattern, B becomes A's complement
/// so the two buffers still start out different.
pub fn initial_generations(pattern: Seed, dims: GridDimensions, seed: Option<u64>) -> [Vec<u32>; 2] {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let first = pattern.generate(dims, &mut rng);
    let mut second = alternating(dims);
    if first == second {
        second = first.iter().map(|&cell| ALIVE - cell).collect();
    }
    [first, second]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rules::population;

    #[test]
    fn test_scattered_density_is_roughly_honoured() {
        let dims = GridDimensions::square(128);
        let mut rng = StdRng::seed_from_u64(7);
        let cells = Seed::Scattered { density: 0.4 }.generate(dims, &mut rng);
        let ratio = population(&cells) as f64 / dims.cell_count() as f64;
        assert!((0.37..0.43).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_scattered_is_reproducible_with_a_seed() {
        let dims = GridDimensions::square(32);
        let [a, _] = initial_generations(Seed::default(), dims, Some(42));
        let [b, _] = initial_generations(Seed::default(), dims, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternating_marks_even_indices() {
        let cells = alternating(GridDimensions::new(3, 2));
        assert_eq!(cells, vec![1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_buffers_start_distinct() {
        let dims = GridDimensions::new(4, 4);
        for pattern in [
            Seed::default(),
            Seed::Alternating,
            Seed::Glider,
            Seed::Blinker,
            Seed::Block,
            Seed::GosperGun,
            Seed::Empty,
        ] {
            let [a, b] = initial_generations(pattern, dims, Some(1));
            assert_ne!(a, b, "{}", pattern.as_str());
        }
    }

    #[test]
    fn test_patterns_keep_their_population() {
        let dims = GridDimensions::square(64);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(population(&Seed::Glider.generate(dims, &mut rng)), 5);
        assert_eq!(population(&Seed::Blinker.generate(dims, &mut rng)), 3);
        assert_eq!(population(&Seed::Block.generate(dims, &mut rng)), 4);
        assert_eq!(population(&Seed::GosperGun.generate(dims, &mut rng)), 36);
        assert_eq!(population(&Seed::Empty.generate(dims, &mut rng)), 0);
    }

    #[test]
    fn test_blinker_is_centred() {
        let dims = GridDimensions::square(8);
        let cells = place_centered(BLINKER, dims);
        let live: Vec<usize> = (0..cells.len()).filter(|&i| cells[i] == ALIVE).collect();
        assert_eq!(live, vec![dims.index(3, 4), dims.index(4, 4), dims.index(5, 4)]);
    }

    #[test]
    fn test_oversized_pattern_wraps() {
        let dims = GridDimensions::square(16);
        let cells = place_centered(GOSPER_GUN, dims);
        assert_eq!(cells.len(), dims.cell_count());
        assert!(population(&cells) > 0);
    }
}
