//! Persisting encoded tiles.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::encoder::{EncodeError, TileEncoder};
use super::types::Tile;
use crate::coord::TileAddress;
use crate::log::{Logger, NoOpLogger};
use crate::log_debug;

/// Errors that can occur while writing one tile.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to encode tile {address}: {source}")]
    Encode {
        address: TileAddress,
        #[source]
        source: EncodeError,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write tile {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Stores a tile somewhere and reports where.
///
/// Implementations must be `Send + Sync` to be shared by the writer
/// threads. Distinct tiles always have distinct addresses, so concurrent
/// calls never target the same destination.
pub trait TileWriter: Send + Sync {
    fn write(&self, tile: &Tile) -> Result<PathBuf, WriteError>;
}

/// Location of a tile under `root`: `<root>/<level>/<major>/<minor>.<ext>`.
///
/// ```
/// use std::path::Path;
/// use teyeler::coord::TileAddress;
/// use teyeler::tile::tile_path;
///
/// let path = tile_path(Path::new("out"), TileAddress::new(3, 5, 2), "png");
/// assert_eq!(path, Path::new("out/3/5/2.png"));
/// ```
pub fn tile_path(root: &Path, address: TileAddress, extension: &str) -> PathBuf {
    root.join(address.level.to_string())
        .join(address.major.to_string())
        .join(format!("{}.{}", address.minor, extension))
}

/// Writes tiles as image files in a directory tree.
pub struct DiskTileWriter {
    root: PathBuf,
    encoder: Arc<dyn TileEncoder>,
    logger: Arc<dyn Logger>,
}

impl DiskTileWriter {
    pub fn new(root: impl Into<PathBuf>, encoder: Arc<dyn TileEncoder>) -> Self {
        Self {
            root: root.into(),
            encoder,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `address` is written.
    pub fn path_for(&self, address: TileAddress) -> PathBuf {
        tile_path(&self.root, address, self.encoder.extension())
    }
}

impl TileWriter for DiskTileWriter {
    fn write(&self, tile: &Tile) -> Result<PathBuf, WriteError> {
        let address = tile.address();
        let path = self.path_for(address);

        let bytes = self
            .encoder
            .encode(tile.raster())
            .map_err(|source| WriteError::Encode { address, source })?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| WriteError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        log_debug!(self.logger, "Saving tile {} to {}", address, path.display());
        fs::write(&path, bytes).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl std::fmt::Debug for DiskTileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskTileWriter")
            .field("root", &self.root)
            .field("encoder", &self.encoder.name())
            .finish()
    }
}
