//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Errors raised while building coordinate types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// A tile dimension was zero.
    #[error("Invalid tile shape {height}x{width}: both dimensions must be > 0")]
    InvalidTileShape { height: u32, width: u32 },

    /// Unrecognised corner name.
    #[error("Unknown corner '{0}' (expected south-west, north-west, south-east or north-east)")]
    UnknownCorner(String),

    /// Unrecognised axis order name.
    #[error("Unknown axis order '{0}' (expected column-major or row-major)")]
    UnknownOrder(String),
}

/// Which image corner holds tile (0, 0).
///
/// The same corner anchors the image content when a level has to be padded
/// up to a whole number of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Corner {
    /// TMS convention.
    #[default]
    SouthWest,
    NorthWest,
    SouthEast,
    NorthEast,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::SouthWest,
        Corner::NorthWest,
        Corner::SouthEast,
        Corner::NorthEast,
    ];

    /// True for the two corners on the bottom edge of the image.
    #[inline]
    pub fn is_south(self) -> bool {
        matches!(self, Corner::SouthWest | Corner::SouthEast)
    }

    /// True for the two corners on the right edge of the image.
    #[inline]
    pub fn is_east(self) -> bool {
        matches!(self, Corner::SouthEast | Corner::NorthEast)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::SouthWest => "south-west",
            Corner::NorthWest => "north-west",
            Corner::SouthEast => "south-east",
            Corner::NorthEast => "north-east",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "south-west" | "southwest" | "sw" => Ok(Corner::SouthWest),
            "north-west" | "northwest" | "nw" => Ok(Corner::NorthWest),
            "south-east" | "southeast" | "se" => Ok(Corner::SouthEast),
            "north-east" | "northeast" | "ne" => Ok(Corner::NorthEast),
            _ => Err(CoordError::UnknownCorner(s.to_string())),
        }
    }
}

/// Order of the two components of an emitted tile coordinate.
///
/// With `ColumnMajor` coordinates read `(column, row)`, with `RowMajor`
/// they read `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisOrder {
    #[default]
    ColumnMajor,
    RowMajor,
}

impl AxisOrder {
    pub const ALL: [AxisOrder; 2] = [AxisOrder::ColumnMajor, AxisOrder::RowMajor];

    pub fn as_str(self) -> &'static str {
        match self {
            AxisOrder::ColumnMajor => "column-major",
            AxisOrder::RowMajor => "row-major",
        }
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisOrder {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "column-major" | "col-major" | "columnmajor" | "colmajor" => Ok(AxisOrder::ColumnMajor),
            "row-major" | "rowmajor" => Ok(AxisOrder::RowMajor),
            _ => Err(CoordError::UnknownOrder(s.to_string())),
        }
    }
}

/// Tile size in pixels, `(height, width)`. Both dimensions are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileShape {
    height: u32,
    width: u32,
}

impl TileShape {
    pub fn new(height: u32, width: u32) -> Result<Self, CoordError> {
        if height == 0 || width == 0 {
            return Err(CoordError::InvalidTileShape { height, width });
        }
        Ok(Self { height, width })
    }

    /// Square tile of `size × size` pixels.
    pub fn square(size: u32) -> Result<Self, CoordError> {
        Self::new(size, size)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid needed to cover an image of `rows × cols` pixels.
    pub fn grid_for(&self, rows: u32, cols: u32) -> GridShape {
        GridShape {
            rows: rows.div_ceil(self.height),
            cols: cols.div_ceil(self.width),
        }
    }

    /// True when `rows × cols` splits into whole tiles on both axes.
    pub fn divides(&self, rows: u32, cols: u32) -> bool {
        rows % self.height == 0 && cols % self.width == 0
    }
}

impl Default for TileShape {
    fn default() -> Self {
        Self {
            height: DEFAULT_TILE_SIZE,
            width: DEFAULT_TILE_SIZE,
        }
    }
}

impl fmt::Display for TileShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// Extent of a tile grid, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Number of tiles in the grid.
    pub fn tile_count(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }
}

/// Grid index of a tile after basis conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePosition {
    pub major: u32,
    pub minor: u32,
}

impl TilePosition {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Attach a pyramid level.
    pub fn at_level(self, level: u32) -> TileAddress {
        TileAddress {
            level,
            major: self.major,
            minor: self.minor,
        }
    }
}

/// Full address of a tile in the pyramid.
///
/// Level 0 is the coarsest level; the highest level is the source image at
/// full resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    pub level: u32,
    pub major: u32,
    pub minor: u32,
}

impl TileAddress {
    pub fn new(level: u32, major: u32, minor: u32) -> Self {
        Self {
            level,
            major,
            minor,
        }
    }

    pub fn position(&self) -> TilePosition {
        TilePosition::new(self.major, self.minor)
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.major, self.minor)
    }
}
