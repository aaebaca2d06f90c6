//! Nearest-neighbour 2× decimation.

use crate::log::Logger;
use crate::log_info;

use super::Raster;

/// Returns a half-resolution copy of `raster`.
///
/// Each spatial dimension becomes `ceil(dim / 2)` and output pixel `(r, c)`
/// is input pixel `(2r, 2c)`. No interpolation is done, so the result is
/// exactly reproducible and never introduces colours absent from the input.
/// The channel axis is untouched.
pub fn downsample(raster: &Raster, logger: &dyn Logger) -> Raster {
    let (rows, cols, channels) = raster.shape();
    let out_rows = rows.div_ceil(2);
    let out_cols = cols.div_ceil(2);

    log_info!(
        logger,
        "Zooming image from {}x{} to {}x{}",
        rows,
        cols,
        out_rows,
        out_cols
    );

    let channels_usize = channels as usize;
    let mut data = Vec::with_capacity(out_rows as usize * out_cols as usize * channels_usize);
    for row in 0..out_rows {
        let line = raster.row(row * 2);
        for pixel in line.chunks_exact(channels_usize).step_by(2) {
            data.extend_from_slice(pixel);
        }
    }

    Raster {
        rows: out_rows,
        cols: out_cols,
        channels,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NoOpLogger;

    #[test]
    fn test_downsample_4x4x3() {
        let data = (0..48).map(|v| v as u8).collect();
        let raster = Raster::from_raw(4, 4, 3, data).unwrap();
        let half = downsample(&raster, &NoOpLogger);

        assert_eq!(half.shape(), (2, 2, 3));
        assert_eq!(half.pixel(0, 0), raster.pixel(0, 0));
        assert_eq!(half.pixel(0, 1), raster.pixel(0, 2));
        assert_eq!(half.pixel(1, 0), raster.pixel(2, 0));
        assert_eq!(half.pixel(1, 1), raster.pixel(2, 2));
    }

    #[test]
    fn test_downsample_is_deterministic() {
        let data = (0..(6 * 10 * 4)).map(|v| (v * 7 % 251) as u8).collect();
        let raster = Raster::from_raw(6, 10, 4, data).unwrap();
        let a = downsample(&raster, &NoOpLogger);
        let b = downsample(&raster, &NoOpLogger);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_downsample_odd_dimensions_round_up() {
        let raster = Raster::new(5, 3, 1).unwrap();
        assert_eq!(downsample(&raster, &NoOpLogger).shape(), (3, 2, 1));
    }

    #[test]
    fn test_downsample_single_pixel() {
        let raster = Raster::filled(1, 1, &[42]).unwrap();
        let half = downsample(&raster, &NoOpLogger);
        assert_eq!(half.shape(), (1, 1, 1));
        assert_eq!(half.pixel(0, 0), &[42]);
    }
}
