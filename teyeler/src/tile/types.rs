//! The tile value type.

use crate::coord::TileAddress;
use crate::raster::Raster;

/// An owned tile raster and its place in the pyramid.
///
/// The pixels are always a private copy, so a tile can be handed to a
/// writer thread while the producer keeps working on the source raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    raster: Raster,
    address: TileAddress,
}

impl Tile {
    pub fn new(raster: Raster, address: TileAddress) -> Self {
        Self { raster, address }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn address(&self) -> TileAddress {
        self.address
    }

    pub fn level(&self) -> u32 {
        self.address.level
    }

    pub fn into_parts(self) -> (Raster, TileAddress) {
        (self.raster, self.address)
    }
}
