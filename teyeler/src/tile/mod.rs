//! Tiles: extraction from a raster, encoding, and persistence.
//!
//! - [`extract_tiles`] / [`TileGrid`]: cut a raster into owned tiles
//! - [`TileEncoder`] / [`ImageTileEncoder`]: turn a tile into file bytes
//! - [`TileWriter`] / [`DiskTileWriter`]: store an encoded tile
//! - [`WriteTileJob`]: one tile write, runnable on the worker pool

mod encoder;
mod grid;
mod job;
mod types;
mod writer;

pub use encoder::{EncodeError, ImageTileEncoder, TileEncoder, TileFormat, DEFAULT_JPEG_QUALITY};
pub use grid::{extract_tiles, ExtractedTile, TileGrid, TileIter};
pub use job::WriteTileJob;
pub use types::Tile;
pub use writer::{tile_path, DiskTileWriter, TileWriter, WriteError};
