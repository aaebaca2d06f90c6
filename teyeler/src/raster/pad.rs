//! In-place padding anchored at a corner.

use crate::coord::Corner;
use crate::log::Logger;
use crate::log_info;

use super::{Raster, RasterError};

/// Grows `raster` to `target_rows × target_cols`, keeping its content
/// anchored at `corner`.
///
/// Existing pixels keep their values and move into the sub-region nearest to
/// `corner`; every new border pixel is set to `fill` (all zeros when `None`).
/// The backing buffer is grown and rows are moved from the last to the first,
/// so no row is overwritten before it has been copied.
///
/// # Errors
///
/// - [`RasterError::InvalidShape`] if a target dimension is smaller than the
///   current one. The raster is left untouched.
/// - [`RasterError::FillMismatch`] if `fill` does not hold one sample per
///   channel.
pub fn pad(
    corner: Corner,
    (target_rows, target_cols): (u32, u32),
    raster: &mut Raster,
    fill: Option<&[u8]>,
    logger: &dyn Logger,
) -> Result<(), RasterError> {
    let (old_rows, old_cols, channels) = raster.shape();
    if target_rows < old_rows || target_cols < old_cols {
        return Err(RasterError::InvalidShape {
            rows: old_rows,
            cols: old_cols,
            target_rows,
            target_cols,
        });
    }

    let channels = channels as usize;
    let zero = [0u8; super::MAX_CHANNELS as usize];
    let fill = fill.unwrap_or(&zero[..channels]);
    if fill.len() != channels {
        return Err(RasterError::FillMismatch {
            expected: channels,
            actual: fill.len(),
        });
    }

    if (target_rows, target_cols) == (old_rows, old_cols) {
        return Ok(());
    }

    log_info!(
        logger,
        "Padding image from {}x{} to {}x{}",
        old_rows,
        old_cols,
        target_rows,
        target_cols
    );

    let top = if corner.is_south() {
        (target_rows - old_rows) as usize
    } else {
        0
    };
    let left = if corner.is_east() {
        (target_cols - old_cols) as usize
    } else {
        0
    };

    let old_stride = old_cols as usize * channels;
    raster.resize_buffer(target_rows, target_cols);
    let new_stride = raster.stride();
    let data = raster.data_mut();

    // Destinations never precede their sources, so walking backwards keeps
    // every not-yet-moved row intact.
    for row in (0..old_rows as usize).rev() {
        let src = row * old_stride;
        let dst = (row + top) * new_stride + left * channels;
        data.copy_within(src..src + old_stride, dst);
    }

    let content_rows = top..top + old_rows as usize;
    let content_cols = left..left + old_cols as usize;
    for row in 0..target_rows as usize {
        let line = &mut data[row * new_stride..(row + 1) * new_stride];
        for (col, pixel) in line.chunks_exact_mut(channels).enumerate() {
            if !content_rows.contains(&row) || !content_cols.contains(&col) {
                pixel.copy_from_slice(fill);
            }
        }
    }

    Ok(())
}
