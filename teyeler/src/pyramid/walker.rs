//! Lazy, level-by-level tile production.

use std::sync::Arc;

use super::plan::{resolve_levels, PyramidPlan};
use super::PyramidError;
use crate::coord::{AxisOrder, Corner, TileShape};
use crate::log::Logger;
use crate::raster::{downsample, Raster};
use crate::tile::{Tile, TileGrid};
use crate::{log_debug, log_info};

/// Iterator over every tile of a pyramid, highest level first.
///
/// Each level is padded to whole tiles and cut in scan order; once a level
/// is exhausted the raster is replaced by its downsample and the walk moves
/// one level down. Only the current level's raster is held.
///
/// ```
/// use std::sync::Arc;
/// use teyeler::coord::{AxisOrder, Corner, TileShape};
/// use teyeler::log::NoOpLogger;
/// use teyeler::pyramid::PyramidWalker;
/// use teyeler::raster::Raster;
///
/// let raster = Raster::new(8, 8, 3).unwrap();
/// let walker = PyramidWalker::new(
///     TileShape::square(2).unwrap(),
///     raster,
///     None,
///     Corner::SouthWest,
///     AxisOrder::ColumnMajor,
///     Arc::new(NoOpLogger),
/// )
/// .unwrap();
/// assert_eq!(walker.levels(), 3);
/// assert_eq!(walker.count(), 21);
/// ```
pub struct PyramidWalker {
    tile_shape: TileShape,
    corner: Corner,
    order: AxisOrder,
    logger: Arc<dyn Logger>,
    raster: Raster,
    levels: u32,
    level: u32,
    /// Grid of the current level, once its raster has been padded.
    grid: Option<TileGrid>,
    next: usize,
    remaining: u64,
    finished: bool,
}

impl PyramidWalker {
    /// Prepares a walk over `raster`.
    ///
    /// `levels` of `None` picks the count at which level 0 fits in a single
    /// tile. An explicit `Some(0)` fails with [`PyramidError::ZeroLevels`] and
    /// a count above [`super::MAX_LEVELS`] with [`PyramidError::TooManyLevels`].
    pub fn new(
        tile_shape: TileShape,
        raster: Raster,
        levels: Option<u32>,
        corner: Corner,
        order: AxisOrder,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, PyramidError> {
        let shape = (raster.rows(), raster.cols());
        let levels = resolve_levels(shape, tile_shape, levels)?;
        let remaining = PyramidPlan::new(shape, tile_shape, Some(levels))?.total_tiles();

        log_info!(
            logger,
            "Tiling {}x{} image into {} levels of {} tiles",
            shape.0,
            shape.1,
            levels,
            tile_shape
        );

        Ok(Self {
            tile_shape,
            corner,
            order,
            logger,
            raster,
            levels,
            level: levels - 1,
            grid: None,
            next: 0,
            remaining,
            finished: false,
        })
    }

    /// Total number of levels in the walk.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Level currently being tiled.
    pub fn current_level(&self) -> u32 {
        self.level
    }

    fn enter_level(&mut self) -> Result<TileGrid, PyramidError> {
        let grid = TileGrid::new(
            self.tile_shape,
            self.raster.rows(),
            self.raster.cols(),
            self.corner,
            self.order,
        );
        grid.fit(&mut self.raster, self.logger.as_ref())?;
        log_debug!(
            self.logger,
            "Level {}: {} tiles ({}x{} grid)",
            self.level,
            grid.len(),
            grid.shape().rows,
            grid.shape().cols
        );
        self.grid = Some(grid);
        self.next = 0;
        Ok(grid)
    }
}

impl Iterator for PyramidWalker {
    type Item = Result<Tile, PyramidError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            let grid = match self.grid {
                Some(grid) => grid,
                None => match self.enter_level() {
                    Ok(grid) => grid,
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                },
            };

            if self.next < grid.len() {
                let extracted = grid.cut(&self.raster, self.next);
                self.next += 1;
                self.remaining = self.remaining.saturating_sub(1);
                let address = extracted.position.at_level(self.level);
                return Some(Ok(Tile::new(extracted.raster, address)));
            }

            if self.level == 0 {
                self.finished = true;
                return None;
            }
            self.raster = downsample(&self.raster, self.logger.as_ref());
            self.level -= 1;
            self.grid = None;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (0, Some(remaining))
    }
}

impl std::fmt::Debug for PyramidWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyramidWalker")
            .field("tile_shape", &self.tile_shape)
            .field("levels", &self.levels)
            .field("level", &self.level)
            .field("next", &self.next)
            .field("finished", &self.finished)
            .finish()
    }
}
