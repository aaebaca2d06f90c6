//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::PoolError;
use crate::pyramid::PyramidError;
use crate::raster::DecodeError;

/// Fatal errors from a tiling run.
///
/// Failures to write individual tiles are not fatal; they are reported in
/// [`crate::tiler::TilingReport`].
#[derive(Debug, Error)]
pub enum TilerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Pyramid generation failed: {0}")]
    Pyramid(#[from] PyramidError),

    #[error("Tile writer pool failed: {0}")]
    Pool(#[from] PoolError),
}
