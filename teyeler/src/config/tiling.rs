//! Engine configuration.

use thiserror::Error;

use crate::coord::{AxisOrder, CoordError, Corner, TileShape};
use crate::executor::DEFAULT_WORKERS;
use crate::pyramid::MAX_LEVELS;
use crate::tile::TileFormat;

/// Default bound on tiles waiting for a writer thread.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Invalid engine configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid tile shape: {0}")]
    InvalidTileShape(#[from] CoordError),

    #[error("At least one writer thread is required")]
    ZeroWorkers,

    #[error("At least one pyramid level is required")]
    ZeroLevels,

    #[error("At most {MAX_LEVELS} pyramid levels are supported, got {0}")]
    TooManyLevels(u32),

    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
}

/// Everything the tiler needs to know besides the input and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingConfig {
    pub tile_shape: TileShape,
    pub corner: Corner,
    pub order: AxisOrder,
    /// `None` derives the count from the image size.
    pub levels: Option<u32>,
    /// Writer threads.
    pub workers: usize,
    /// `None` leaves the write queue unbounded.
    pub queue_capacity: Option<usize>,
    pub format: TileFormat,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            tile_shape: TileShape::default(),
            corner: Corner::default(),
            order: AxisOrder::default(),
            levels: None,
            workers: DEFAULT_WORKERS,
            queue_capacity: Some(DEFAULT_QUEUE_CAPACITY),
            format: TileFormat::default(),
        }
    }
}

impl TilingConfig {
    pub fn with_tile_shape(mut self, tile_shape: TileShape) -> Self {
        self.tile_shape = tile_shape;
        self
    }

    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }

    pub fn with_order(mut self, order: AxisOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_levels(mut self, levels: Option<u32>) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// `0` or `None` means unbounded.
    pub fn with_queue_capacity(mut self, capacity: Option<usize>) -> Self {
        self.queue_capacity = capacity.filter(|&c| c > 0);
        self
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    /// Checks the values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        match self.levels {
            Some(0) => return Err(ConfigError::ZeroLevels),
            Some(n) if n > MAX_LEVELS => return Err(ConfigError::TooManyLevels(n)),
            _ => {}
        }
        if let TileFormat::Jpeg { quality } = self.format {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::InvalidQuality(quality));
            }
        }
        Ok(())
    }
}
