//! Settings read from the INI config file.
//!
//! Each struct is one `[section]`. Every field is optional: a value left
//! out of the file leaves the corresponding [`TilingConfig`] value alone.

use super::tiling::{ConfigError, TilingConfig};
use crate::coord::{AxisOrder, Corner, TileShape};
use crate::tile::TileFormat;

/// Contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub tiling: TilingSettings,
    pub output: OutputSettings,
    pub writer: WriterSettings,
}

/// `levels = auto` or a positive count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSetting {
    Auto,
    Count(u32),
}

/// `[tiling]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilingSettings {
    pub tile_height: Option<u32>,
    pub tile_width: Option<u32>,
    pub corner: Option<Corner>,
    pub order: Option<AxisOrder>,
    pub levels: Option<LevelSetting>,
}

/// `[output]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: Option<TileFormat>,
    /// Only used when the resulting format is JPEG.
    pub jpeg_quality: Option<u8>,
}

/// `[writer]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterSettings {
    pub threads: Option<usize>,
    /// `0` means unbounded.
    pub queue_capacity: Option<usize>,
}

impl ConfigFile {
    /// Overlays the file's settings on `base`.
    pub fn apply(&self, base: TilingConfig) -> Result<TilingConfig, ConfigError> {
        let mut config = base;
        let tiling = &self.tiling;

        if tiling.tile_height.is_some() || tiling.tile_width.is_some() {
            let height = tiling.tile_height.unwrap_or(config.tile_shape.height());
            let width = tiling.tile_width.unwrap_or(config.tile_shape.width());
            config.tile_shape = TileShape::new(height, width)?;
        }
        if let Some(corner) = tiling.corner {
            config.corner = corner;
        }
        if let Some(order) = tiling.order {
            config.order = order;
        }
        match tiling.levels {
            Some(LevelSetting::Auto) => config.levels = None,
            Some(LevelSetting::Count(n)) => config.levels = Some(n),
            None => {}
        }

        if let Some(format) = self.output.format {
            config.format = format;
        }
        if let (TileFormat::Jpeg { .. }, Some(quality)) =
            (config.format, self.output.jpeg_quality)
        {
            config.format = TileFormat::Jpeg { quality };
        }

        if let Some(threads) = self.writer.threads {
            config.workers = threads;
        }
        if let Some(capacity) = self.writer.queue_capacity {
            config = config.with_queue_capacity(Some(capacity));
        }

        config.validate()?;
        Ok(config)
    }
}
