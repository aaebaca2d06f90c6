//! In-memory rasters.
//!
//! A [`Raster`] is a `rows × cols × channels` block of 8-bit samples stored
//! row-major with interleaved channels, the same layout the `image` crate
//! uses. The pyramid walker owns one working raster per level. It is padded
//! in place ([`pad`]) and replaced by a half-resolution copy
//! ([`downsample`]) between levels.

mod downsample;
mod error;
mod io;
mod pad;

pub use downsample::downsample;
pub use error::{DecodeError, RasterError};
pub use io::decode_image;
pub use pad::pad;

/// Maximum supported channel count (RGBA).
pub const MAX_CHANNELS: u8 = 4;

/// Owned 8-bit raster with a trailing channel axis.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    rows: u32,
    cols: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Raster {
    /// Creates a zero-filled raster.
    pub fn new(rows: u32, cols: u32, channels: u8) -> Result<Self, RasterError> {
        let len = Self::buffer_len(rows, cols, channels)?;
        Ok(Self {
            rows,
            cols,
            channels,
            data: vec![0; len],
        })
    }

    /// Creates a raster with every pixel set to `pixel`.
    ///
    /// The channel count is taken from `pixel.len()`.
    pub fn filled(rows: u32, cols: u32, pixel: &[u8]) -> Result<Self, RasterError> {
        let channels = u8::try_from(pixel.len())
            .map_err(|_| RasterError::UnsupportedChannels(u8::MAX))?;
        let len = Self::buffer_len(rows, cols, channels)?;
        Ok(Self {
            rows,
            cols,
            channels,
            data: pixel.repeat(len / pixel.len()),
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_raw(
        rows: u32,
        cols: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let len = Self::buffer_len(rows, cols, channels)?;
        if data.len() != len {
            return Err(RasterError::InvalidDimensions {
                rows,
                cols,
                channels,
                len: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    fn buffer_len(rows: u32, cols: u32, channels: u8) -> Result<usize, RasterError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(RasterError::UnsupportedChannels(channels));
        }
        if rows == 0 || cols == 0 {
            return Err(RasterError::InvalidDimensions {
                rows,
                cols,
                channels,
                len: 0,
            });
        }
        Ok(rows as usize * cols as usize * channels as usize)
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// `(rows, cols, channels)`.
    #[inline]
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.rows, self.cols, self.channels)
    }

    /// Bytes per pixel row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.cols as usize * self.channels as usize
    }

    #[inline]
    fn offset(&self, row: u32, col: u32) -> usize {
        row as usize * self.stride() + col as usize * self.channels as usize
    }

    /// Samples of one pixel. Panics if `(row, col)` is out of range.
    #[inline]
    pub fn pixel(&self, row: u32, col: u32) -> &[u8] {
        assert!(row < self.rows && col < self.cols, "pixel out of range");
        let start = self.offset(row, col);
        &self.data[start..start + self.channels as usize]
    }

    /// Mutable samples of one pixel. Panics if `(row, col)` is out of range.
    #[inline]
    pub fn pixel_mut(&mut self, row: u32, col: u32) -> &mut [u8] {
        assert!(row < self.rows && col < self.cols, "pixel out of range");
        let start = self.offset(row, col);
        let channels = self.channels as usize;
        &mut self.data[start..start + channels]
    }

    /// One full row of samples.
    pub fn row(&self, row: u32) -> &[u8] {
        let start = row as usize * self.stride();
        &self.data[start..start + self.stride()]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copies a `height × width` region starting at `(row, col)` into a new,
    /// independently owned raster.
    pub fn crop(&self, row: u32, col: u32, height: u32, width: u32) -> Result<Raster, RasterError> {
        let fits = height > 0
            && width > 0
            && row.checked_add(height).is_some_and(|end| end <= self.rows)
            && col.checked_add(width).is_some_and(|end| end <= self.cols);
        if !fits {
            return Err(RasterError::OutOfBounds {
                row,
                col,
                height,
                width,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.copy_region(row, col, height, width))
    }

    /// Copies a region already known to lie inside the raster.
    pub(crate) fn copy_region(&self, row: u32, col: u32, height: u32, width: u32) -> Raster {
        let channels = self.channels as usize;
        let span = width as usize * channels;
        let mut data = Vec::with_capacity(height as usize * span);
        for r in row..row + height {
            let start = self.offset(r, col);
            data.extend_from_slice(&self.data[start..start + span]);
        }
        Raster {
            rows: height,
            cols: width,
            channels: self.channels,
            data,
        }
    }

    /// Reshapes the raster to `rows × cols`, keeping the channel count.
    ///
    /// Only the length of the backing buffer changes; callers are responsible
    /// for moving samples into place. New bytes are zero.
    pub(crate) fn resize_buffer(&mut self, rows: u32, cols: u32) {
        self.rows = rows;
        self.cols = cols;
        let len = rows as usize * cols as usize * self.channels as usize;
        self.data.resize(len, 0);
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("channels", &self.channels)
            .finish()
    }
}
