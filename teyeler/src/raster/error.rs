//! Error types for raster operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or reshaping a [`super::Raster`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Zero-sized raster or a buffer whose length does not match its shape.
    #[error("Invalid raster dimensions {rows}x{cols}x{channels} for a buffer of {len} bytes")]
    InvalidDimensions {
        rows: u32,
        cols: u32,
        channels: u8,
        len: usize,
    },

    /// Channel count outside 1..=4.
    #[error("Unsupported channel count {0} (expected 1 to 4)")]
    UnsupportedChannels(u8),

    /// Padding target is smaller than the raster on at least one axis.
    #[error("Target shape {target_rows}x{target_cols} is smaller than raster {rows}x{cols}")]
    InvalidShape {
        rows: u32,
        cols: u32,
        target_rows: u32,
        target_cols: u32,
    },

    /// Fill value does not provide one sample per channel.
    #[error("Fill value has {actual} samples but the raster has {expected} channels")]
    FillMismatch { expected: usize, actual: usize },

    /// Requested region extends past the raster edge.
    #[error("Region {height}x{width} at ({row}, {col}) is outside a {rows}x{cols} raster")]
    OutOfBounds {
        row: u32,
        col: u32,
        height: u32,
        width: u32,
        rows: u32,
        cols: u32,
    },
}

/// The input image could not be turned into a raster.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or its format could not be decoded.
    #[error("Failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The decoded image has no usable pixels.
    #[error("Image {} is not a usable raster: {source}", .path.display())]
    Raster { path: PathBuf, source: RasterError },
}

impl DecodeError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            DecodeError::Image { path, .. } | DecodeError::Raster { path, .. } => path,
        }
    }
}
