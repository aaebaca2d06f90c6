//! The zoom pyramid.
//!
//! Level numbering follows the usual map-viewer convention: level 0 is the
//! coarsest level, where the whole image fits in as few tiles as possible,
//! and the highest level is the source at full resolution. Each level is a
//! 2× nearest-neighbour downsample of the level above it.
//!
//! [`PyramidWalker`] produces tiles lazily, highest level first, keeping a
//! single level's raster in memory. [`PyramidPlan`] describes the same walk
//! from shapes alone, so totals are known before any pixel is touched.

mod plan;
mod walker;

use thiserror::Error;

use crate::raster::RasterError;

pub use plan::{level_count, LevelPlan, PyramidPlan};
pub use walker::PyramidWalker;

/// Upper bound on an explicit level count.
///
/// A `u32`-sized image fits a 1×1 tile after 33 levels; past that every level
/// is another single-pixel tile.
pub const MAX_LEVELS: u32 = 64;

/// Errors that can occur while planning or walking a pyramid.
#[derive(Debug, Error)]
pub enum PyramidError {
    #[error("A pyramid needs at least one level")]
    ZeroLevels,

    #[error("A pyramid has at most {MAX_LEVELS} levels, got {0}")]
    TooManyLevels(u32),

    #[error("Raster operation failed: {0}")]
    Raster(#[from] RasterError),
}
