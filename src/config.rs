//! Run configuration
//!
//! Grid size and tile size are shared between the host and the WGSL programs,
//! so both the kernel's `@workgroup_size` and the dispatch count are derived
//! from the values held here.

use std::time::Duration;

use crate::simulation::seed::Seed;

/// Default side length of the square grid, in cells
pub const GRID_SIZE: u32 = 128;

/// Default side length of one compute tile (workgroup), in cells
pub const WORKGROUP_SIZE: u32 = 8;

/// Default interval between generations
pub const TICK_PERIOD_MS: u64 = 200;

/// Upper bound on `tile_size * tile_size`, matching
/// `max_compute_invocations_per_workgroup` of the downlevel limits we request.
pub const MAX_WORKGROUP_INVOCATIONS: u32 = 256;

/// `max_compute_workgroups_per_dimension` of the downlevel limits
pub const MAX_WORKGROUPS_PER_DIMENSION: u32 = 65535;

/// `max_storage_buffer_binding_size` of the downlevel limits, in bytes
pub const MAX_STORAGE_BUFFER_BYTES: u64 = 1 << 27;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("tile size must be non-zero")]
    EmptyTile,

    #[error("tile size {tile} needs {invocations} invocations per workgroup, limit is {limit}")]
    TileTooLarge {
        tile: u32,
        invocations: u32,
        limit: u32,
    },

    #[error("grid of {width}x{height} cells does not fit a u32 instance count")]
    GridTooLarge { width: u32, height: u32 },

    #[error("dispatch of {tiles_x}x{tiles_y} workgroups exceeds {limit} per dimension")]
    TooManyTiles {
        tiles_x: u32,
        tiles_y: u32,
        limit: u32,
    },

    #[error("generation buffer needs {bytes} bytes, storage binding limit is {limit}")]
    BufferTooLarge { bytes: u64, limit: u64 },

    #[error("census interval must be at least one generation")]
    EmptyCensusInterval,
}

/// Immutable width and height of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Number of cells, which is also the element count of each generation buffer
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size in bytes of one generation buffer of `u32` flags
    pub fn buffer_size(&self) -> u64 {
        self.cell_count() as u64 * std::mem::size_of::<u32>() as u64
    }

    /// Flat index of `(x, y)`, row-major
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Number of tiles needed to cover the grid on each axis
    pub fn tiles(&self, tile_size: u32) -> (u32, u32) {
        (
            self.width.div_ceil(tile_size),
            self.height.div_ceil(tile_size),
        )
    }
}

/// Everything the app needs to build and drive a run
#[derive(Debug, Clone)]
pub struct LifeConfig {
    pub dimensions: GridDimensions,
    pub tile_size: u32,
    pub tick_period: Duration,
    /// Initial content of the first generation buffer
    pub pattern: Seed,
    /// RNG seed for scattered patterns; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Log a live-cell census every n generations
    pub census_interval: Option<u64>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            dimensions: GridDimensions::square(GRID_SIZE),
            tile_size: WORKGROUP_SIZE,
            tick_period: Duration::from_millis(TICK_PERIOD_MS),
            pattern: Seed::default(),
            seed: None,
            census_interval: None,
        }
    }
}

impl LifeConfig {
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = GridDimensions::new(width, height);
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    pub fn with_pattern(mut self, pattern: Seed) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_census_interval(mut self, generations: u64) -> Self {
        self.census_interval = Some(generations.max(1));
        self
    }

    /// Checks the configuration against what the GPU programs can express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridDimensions { width, height } = self.dimensions;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        if width.checked_mul(height).is_none() {
            return Err(ConfigError::GridTooLarge { width, height });
        }
        if self.tile_size == 0 {
            return Err(ConfigError::EmptyTile);
        }
        let invocations = self.tile_size.saturating_mul(self.tile_size);
        if invocations > MAX_WORKGROUP_INVOCATIONS {
            return Err(ConfigError::TileTooLarge {
                tile: self.tile_size,
                invocations,
                limit: MAX_WORKGROUP_INVOCATIONS,
            });
        }
        let (tiles_x, tiles_y) = self.dimensions.tiles(self.tile_size);
        if tiles_x > MAX_WORKGROUPS_PER_DIMENSION || tiles_y > MAX_WORKGROUPS_PER_DIMENSION {
            return Err(ConfigError::TooManyTiles {
                tiles_x,
                tiles_y,
                limit: MAX_WORKGROUPS_PER_DIMENSION,
            });
        }
        let bytes = self.dimensions.buffer_size();
        if bytes > MAX_STORAGE_BUFFER_BYTES {
            return Err(ConfigError::BufferTooLarge {
                bytes,
                limit: MAX_STORAGE_BUFFER_BYTES,
            });
        }
        if self.census_interval == Some(0) {
            return Err(ConfigError::EmptyCensusInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LifeConfig::default();
        assert_eq!(config.dimensions, GridDimensions::square(128));
        assert_eq!(config.tile_size, 8);
        assert_eq!(config.tick_period, Duration::from_millis(200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tiles_round_up() {
        let dims = GridDimensions::new(128, 100);
        assert_eq!(dims.tiles(8), (16, 13));
        assert_eq!(GridDimensions::square(1).tiles(8), (1, 1));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert_eq!(
            LifeConfig::default().with_dimensions(0, 4).validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            LifeConfig::default().with_tile_size(0).validate(),
            Err(ConfigError::EmptyTile)
        );
        assert!(matches!(
            LifeConfig::default().with_tile_size(17).validate(),
            Err(ConfigError::TileTooLarge { invocations: 289, .. })
        ));
        assert!(LifeConfig::default().with_tile_size(16).validate().is_ok());
    }

    #[test]
    fn test_rejects_dispatch_past_workgroup_limit() {
        assert_eq!(
            LifeConfig::default().with_dimensions(600_000, 1).validate(),
            Err(ConfigError::TooManyTiles {
                tiles_x: 75_000,
                tiles_y: 1,
                limit: 65_535
            })
        );
        // 65535 tiles of 8 is still dispatchable
        assert!(LifeConfig::default()
            .with_dimensions(65_535 * 8, 1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_buffer_past_binding_limit() {
        assert_eq!(
            LifeConfig::default().with_dimensions(6000, 6000).validate(),
            Err(ConfigError::BufferTooLarge {
                bytes: 144_000_000,
                limit: 1 << 27
            })
        );
        assert_eq!(GridDimensions::square(4096).buffer_size(), 1 << 26);
        assert!(LifeConfig::default()
            .with_dimensions(4096, 8192)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_zero_census_interval() {
        let config = LifeConfig {
            census_interval: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyCensusInterval));
        assert_eq!(
            LifeConfig::default().with_census_interval(0).census_interval,
            Some(1)
        );
    }

    #[test]
    fn test_row_major_index() {
        let dims = GridDimensions::new(4, 3);
        assert_eq!(dims.cell_count(), 12);
        assert_eq!(dims.index(0, 0), 0);
        assert_eq!(dims.index(3, 0), 3);
        assert_eq!(dims.index(1, 2), 9);
    }
}
