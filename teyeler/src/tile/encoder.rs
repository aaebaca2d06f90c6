//! Tile encoding into image file formats.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use thiserror::Error;

use crate::raster::{Raster, RasterError};

/// JPEG quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur while encoding a tile.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Unknown tile format '{0}' (expected png, jpeg or webp)")]
    UnknownFormat(String),

    #[error("Tile raster cannot be encoded: {0}")]
    Raster(#[from] RasterError),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Output file format for tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileFormat {
    #[default]
    Png,
    /// Lossy; any alpha channel is dropped.
    Jpeg { quality: u8 },
    /// Lossless WebP.
    WebP,
}

impl TileFormat {
    /// JPEG with the given quality (1..=100).
    pub fn jpeg(quality: u8) -> Result<Self, EncodeError> {
        if !(1..=100).contains(&quality) {
            return Err(EncodeError::InvalidQuality(quality));
        }
        Ok(TileFormat::Jpeg { quality })
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg { .. } => "jpg",
            TileFormat::WebP => "webp",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileFormat::Png => "PNG",
            TileFormat::Jpeg { .. } => "JPEG",
            TileFormat::WebP => "WebP",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileFormat::Jpeg { quality } => write!(f, "jpeg (quality {})", quality),
            other => f.write_str(other.extension()),
        }
    }
}

/// Parses `png`, `jpeg`/`jpg` (default quality) and `webp`.
impl FromStr for TileFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpeg" | "jpg" => Ok(TileFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            "webp" => Ok(TileFormat::WebP),
            _ => Err(EncodeError::UnknownFormat(s.to_string())),
        }
    }
}

/// Turns a tile raster into the bytes of an image file.
///
/// Implementations must be `Send + Sync`; one encoder is shared by every
/// writer thread.
pub trait TileEncoder: Send + Sync {
    fn encode(&self, raster: &Raster) -> Result<Vec<u8>, EncodeError>;

    /// File extension for encoded tiles, without the dot.
    fn extension(&self) -> &str;

    /// Human-readable encoder name for logs.
    fn name(&self) -> &str;
}

/// [`TileEncoder`] backed by the `image` crate codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTileEncoder {
    format: TileFormat,
}

impl ImageTileEncoder {
    pub fn new(format: TileFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }
}

impl TileEncoder for ImageTileEncoder {
    fn encode(&self, raster: &Raster) -> Result<Vec<u8>, EncodeError> {
        let image = raster.to_dynamic()?;
        let mut bytes = Cursor::new(Vec::new());
        match self.format {
            TileFormat::Png => image.write_to(&mut bytes, ImageFormat::Png)?,
            TileFormat::Jpeg { quality } => {
                let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
                without_alpha(image).write_with_encoder(encoder)?;
            }
            TileFormat::WebP => {
                let encoder = WebPEncoder::new_lossless(&mut bytes);
                as_color(image).write_with_encoder(encoder)?;
            }
        }
        Ok(bytes.into_inner())
    }

    fn extension(&self) -> &str {
        self.format.extension()
    }

    fn name(&self) -> &str {
        self.format.name()
    }
}

fn without_alpha(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::La8 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::Rgba8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image,
    }
}

// WebP only carries RGB and RGBA.
fn as_color(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::La8 => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn gradient(rows: u32, cols: u32) -> Raster {
        let mut raster = Raster::new(rows, cols, 4).unwrap();
        for r in 0..rows {
            for c in 0..cols {
                raster
                    .pixel_mut(r, c)
                    .copy_from_slice(&[(r * 16) as u8, (c * 16) as u8, 7, 255]);
            }
        }
        raster
    }

    #[test]
    fn test_png_is_lossless() {
        let raster = gradient(8, 12);
        let bytes = ImageTileEncoder::new(TileFormat::Png).encode(&raster).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(Raster::from_dynamic(decoded).unwrap(), raster);
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let raster = gradient(16, 16);
        let encoder = ImageTileEncoder::new(TileFormat::jpeg(80).unwrap());
        let bytes = encoder.encode(&raster).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color().channel_count(), 3);
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn test_webp_gray_is_promoted() {
        let raster = Raster::filled(4, 4, &[128]).unwrap();
        let bytes = ImageTileEncoder::new(TileFormat::WebP).encode(&raster).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0 == [128, 128, 128]));
    }

    #[test]
    fn test_jpeg_quality_bounds() {
        assert!(matches!(TileFormat::jpeg(0), Err(EncodeError::InvalidQuality(0))));
        assert!(matches!(TileFormat::jpeg(101), Err(EncodeError::InvalidQuality(101))));
        assert_eq!(TileFormat::jpeg(100).unwrap(), TileFormat::Jpeg { quality: 100 });
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("PNG".parse::<TileFormat>().unwrap(), TileFormat::Png);
        assert_eq!(
            "jpg".parse::<TileFormat>().unwrap(),
            TileFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY
            }
        );
        assert_eq!("webp".parse::<TileFormat>().unwrap(), TileFormat::WebP);
        assert!(matches!(
            "tiff".parse::<TileFormat>(),
            Err(EncodeError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_encoder_as_trait_object() {
        let encoder: Arc<dyn TileEncoder> = Arc::new(ImageTileEncoder::new(TileFormat::WebP));
        assert_eq!(encoder.extension(), "webp");
        assert_eq!(encoder.name(), "WebP");
    }
}
