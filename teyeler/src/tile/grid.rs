//! Partitioning a raster into tiles.

use crate::coord::{to_basis, AxisOrder, Corner, GridShape, TilePosition, TileShape};
use crate::log::Logger;
use crate::log_warn;
use crate::raster::{pad, Raster, RasterError};

/// A tile cut from a raster, before it is given a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTile {
    pub raster: Raster,
    pub position: TilePosition,
}

/// The tiling of a raster whose dimensions are whole multiples of the
/// tile shape.
///
/// Cells are indexed in row-major scan order of image space; positions are
/// reported in the `(corner, order)` basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    tile_shape: TileShape,
    shape: GridShape,
    corner: Corner,
    order: AxisOrder,
}

impl TileGrid {
    /// Grid for an image of `rows × cols` pixels. Partial edge tiles are
    /// counted, so the grid covers `rows × cols` once padded.
    pub fn new(
        tile_shape: TileShape,
        rows: u32,
        cols: u32,
        corner: Corner,
        order: AxisOrder,
    ) -> Self {
        Self {
            tile_shape,
            shape: tile_shape.grid_for(rows, cols),
            corner,
            order,
        }
    }

    pub fn tile_shape(&self) -> TileShape {
        self.tile_shape
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.shape.tile_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel shape the raster must have before tiles can be cut.
    pub fn padded_shape(&self) -> (u32, u32) {
        (
            self.shape.rows * self.tile_shape.height(),
            self.shape.cols * self.tile_shape.width(),
        )
    }

    /// Image-space `(row, col)` of the `index`-th cell in scan order.
    pub fn cell(&self, index: usize) -> (u32, u32) {
        let cols = self.shape.cols as usize;
        ((index / cols) as u32, (index % cols) as u32)
    }

    /// Basis-converted position of an image-space cell.
    pub fn position(&self, (row, col): (u32, u32)) -> TilePosition {
        to_basis(self.order, self.corner, self.shape, (row, col))
    }

    /// Copies the `index`-th tile out of `raster`.
    ///
    /// `raster` must have the grid's padded shape and `index < len()`.
    pub(crate) fn cut(&self, raster: &Raster, index: usize) -> ExtractedTile {
        let (row, col) = self.cell(index);
        let height = self.tile_shape.height();
        let width = self.tile_shape.width();
        ExtractedTile {
            raster: raster.copy_region(row * height, col * width, height, width),
            position: self.position((row, col)),
        }
    }

    /// Pads `raster` to the grid's padded shape if it is not there already.
    pub(crate) fn fit(&self, raster: &mut Raster, logger: &dyn Logger) -> Result<(), RasterError> {
        if self.tile_shape.divides(raster.rows(), raster.cols()) {
            return Ok(());
        }
        log_warn!(
            logger,
            "Image shape is not divisible by tile shape. Image will be padded."
        );
        pad(self.corner, self.padded_shape(), raster, None, logger)
    }
}

/// Cuts `raster` into `tile_shape` tiles.
///
/// If the raster does not split evenly it is first padded in place up to
/// whole tiles, anchored at `corner`, so the caller's raster may grow.
/// Tiles come out in row-major scan order of the image, each with its
/// position in the `(corner, order)` basis.
///
/// ```
/// use std::sync::Arc;
/// use teyeler::coord::{AxisOrder, Corner, TileShape};
/// use teyeler::log::NoOpLogger;
/// use teyeler::raster::Raster;
/// use teyeler::tile::extract_tiles;
///
/// let mut raster = Raster::new(5, 5, 1).unwrap();
/// let shape = TileShape::square(2).unwrap();
/// let tiles: Vec<_> = extract_tiles(
///     shape,
///     &mut raster,
///     Corner::SouthWest,
///     AxisOrder::ColumnMajor,
///     &NoOpLogger,
/// )
/// .unwrap()
/// .collect();
/// assert_eq!(tiles.len(), 9);
/// assert_eq!(raster.shape(), (6, 6, 1));
/// ```
pub fn extract_tiles<'a>(
    tile_shape: TileShape,
    raster: &'a mut Raster,
    corner: Corner,
    order: AxisOrder,
    logger: &dyn Logger,
) -> Result<TileIter<'a>, RasterError> {
    let grid = TileGrid::new(tile_shape, raster.rows(), raster.cols(), corner, order);
    grid.fit(raster, logger)?;
    Ok(TileIter {
        raster,
        grid,
        next: 0,
    })
}

/// Iterator over the tiles of a padded raster.
#[derive(Debug)]
pub struct TileIter<'a> {
    raster: &'a Raster,
    grid: TileGrid,
    next: usize,
}

impl TileIter<'_> {
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }
}

impl Iterator for TileIter<'_> {
    type Item = ExtractedTile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.grid.len() {
            return None;
        }
        let tile = self.grid.cut(self.raster, self.next);
        self.next += 1;
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileIter<'_> {}
