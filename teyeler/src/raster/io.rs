//! Conversions between [`Raster`] and the `image` crate.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Pixel};

use super::{DecodeError, Raster, RasterError};

/// Reads and decodes the image at `path` into an RGBA raster.
///
/// Every input is normalised to four channels so that padding, tiling and
/// encoding behave the same whatever the source format was.
pub fn decode_image(path: impl AsRef<Path>) -> Result<Raster, DecodeError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Raster::try_from(image.to_rgba8()).map_err(|source| DecodeError::Raster {
        path: path.to_path_buf(),
        source,
    })
}

impl<P> TryFrom<ImageBuffer<P, Vec<u8>>> for Raster
where
    P: Pixel<Subpixel = u8>,
{
    type Error = RasterError;

    fn try_from(buffer: ImageBuffer<P, Vec<u8>>) -> Result<Self, Self::Error> {
        let (width, height) = buffer.dimensions();
        Raster::from_raw(height, width, P::CHANNEL_COUNT, buffer.into_raw())
    }
}

impl Raster {
    /// Converts any decoded image, keeping 8-bit gray, gray+alpha, RGB and
    /// RGBA layouts as they are and converting everything else to RGBA.
    pub fn from_dynamic(image: DynamicImage) -> Result<Raster, RasterError> {
        match image {
            DynamicImage::ImageLuma8(buffer) => Raster::try_from(buffer),
            DynamicImage::ImageLumaA8(buffer) => Raster::try_from(buffer),
            DynamicImage::ImageRgb8(buffer) => Raster::try_from(buffer),
            DynamicImage::ImageRgba8(buffer) => Raster::try_from(buffer),
            other => Raster::try_from(other.to_rgba8()),
        }
    }

    /// Copies the raster into a [`DynamicImage`] with a matching color type.
    pub fn to_dynamic(&self) -> Result<DynamicImage, RasterError> {
        let (rows, cols, channels) = self.shape();
        let data = self.as_bytes().to_vec();
        let invalid = || RasterError::InvalidDimensions {
            rows,
            cols,
            channels,
            len: self.as_bytes().len(),
        };
        let image = match channels {
            1 => ImageBuffer::from_raw(cols, rows, data).map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::from_raw(cols, rows, data).map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::from_raw(cols, rows, data).map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::from_raw(cols, rows, data).map(DynamicImage::ImageRgba8),
            other => return Err(RasterError::UnsupportedChannels(other)),
        };
        image.ok_or_else(invalid)
    }
}
