//! Level counts and per-level shapes.

use super::{PyramidError, MAX_LEVELS};
use crate::coord::{GridShape, TileShape};

/// Number of levels needed for the coarsest level to fit in one tile.
///
/// For each axis, `k` is the smallest non-negative integer with
/// `tile · 2^k ≥ dim`; the result is `1 + max(k_rows, k_cols)`. An image
/// that already fits in one tile gets a single level.
///
/// ```
/// use teyeler::coord::TileShape;
/// use teyeler::pyramid::level_count;
///
/// let tile = TileShape::square(256).unwrap();
/// assert_eq!(level_count((512, 512), tile), 2);
/// assert_eq!(level_count((100, 1000), tile), 3);
/// assert_eq!(level_count((10, 10), tile), 1);
/// ```
pub fn level_count((rows, cols): (u32, u32), tile_shape: TileShape) -> u32 {
    1 + doublings(rows, tile_shape.height()).max(doublings(cols, tile_shape.width()))
}

fn doublings(dim: u32, tile: u32) -> u32 {
    let mut span = u64::from(tile);
    let mut k = 0;
    while span < u64::from(dim) {
        span *= 2;
        k += 1;
    }
    k
}

/// Shapes of one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPlan {
    pub level: u32,
    /// Raster shape on entering the level, before padding.
    pub image_shape: (u32, u32),
    /// Raster shape once padded to whole tiles.
    pub padded_shape: (u32, u32),
    pub grid: GridShape,
}

impl LevelPlan {
    pub fn tile_count(&self) -> u64 {
        self.grid.tile_count()
    }

    /// True when the level's raster has to be padded.
    pub fn needs_padding(&self) -> bool {
        self.image_shape != self.padded_shape
    }
}

/// Every level a walk over an image of a given shape will produce.
///
/// Levels are stored highest first, the order the walk visits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidPlan {
    tile_shape: TileShape,
    levels: Vec<LevelPlan>,
}

impl PyramidPlan {
    /// Plans a pyramid for an image of `raster_shape` pixels.
    ///
    /// `levels` of `None` uses [`level_count`]. `Some(0)` and counts above
    /// [`MAX_LEVELS`] are rejected.
    pub fn new(
        raster_shape: (u32, u32),
        tile_shape: TileShape,
        levels: Option<u32>,
    ) -> Result<Self, PyramidError> {
        let count = resolve_levels(raster_shape, tile_shape, levels)?;

        let (mut rows, mut cols) = raster_shape;
        let mut plans = Vec::new();
        for level in (0..count).rev() {
            let grid = tile_shape.grid_for(rows, cols);
            let padded_shape = (grid.rows * tile_shape.height(), grid.cols * tile_shape.width());
            plans.push(LevelPlan {
                level,
                image_shape: (rows, cols),
                padded_shape,
                grid,
            });
            rows = padded_shape.0.div_ceil(2);
            cols = padded_shape.1.div_ceil(2);
        }

        Ok(Self {
            tile_shape,
            levels: plans,
        })
    }

    pub fn tile_shape(&self) -> TileShape {
        self.tile_shape
    }

    /// Number of levels.
    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Levels from full resolution down to level 0.
    pub fn levels(&self) -> &[LevelPlan] {
        &self.levels
    }

    pub fn level(&self, level: u32) -> Option<&LevelPlan> {
        self.levels.iter().find(|plan| plan.level == level)
    }

    /// Tiles across all levels.
    pub fn total_tiles(&self) -> u64 {
        self.levels.iter().map(LevelPlan::tile_count).sum()
    }
}

pub(super) fn resolve_levels(
    raster_shape: (u32, u32),
    tile_shape: TileShape,
    levels: Option<u32>,
) -> Result<u32, PyramidError> {
    match levels {
        Some(0) => Err(PyramidError::ZeroLevels),
        Some(n) if n > MAX_LEVELS => Err(PyramidError::TooManyLevels(n)),
        Some(n) => Ok(n),
        None => Ok(level_count(raster_shape, tile_shape)),
    }
}
