//! Command-line arguments and their resolution into a `TilingConfig`.
//!
//! Precedence: command line, then the `--config` file, then defaults.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use teyeler::config::{ConfigFile, TilingConfig};
use teyeler::coord::{AxisOrder, Corner, TileShape};
use teyeler::tile::{TileFormat, DEFAULT_JPEG_QUALITY};
use tracing::Level;

use crate::error::CliError;

/// Origin corner selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CornerArg {
    /// Origin at the bottom left (TMS)
    SouthWest,
    /// Origin at the top left (XYZ / Google)
    NorthWest,
    SouthEast,
    NorthEast,
}

impl From<CornerArg> for Corner {
    fn from(arg: CornerArg) -> Self {
        match arg {
            CornerArg::SouthWest => Corner::SouthWest,
            CornerArg::NorthWest => Corner::NorthWest,
            CornerArg::SouthEast => Corner::SouthEast,
            CornerArg::NorthEast => Corner::NorthEast,
        }
    }
}

/// Coordinate order selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OrderArg {
    /// Directories are columns, files are rows
    ColumnMajor,
    /// Directories are rows, files are columns
    RowMajor,
}

impl From<OrderArg> for AxisOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::ColumnMajor => AxisOrder::ColumnMajor,
            OrderArg::RowMajor => AxisOrder::RowMajor,
        }
    }
}

/// Tile file format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Lossless PNG
    Png,
    /// Lossy JPEG, alpha is dropped (see --quality)
    Jpeg,
    /// Lossless WebP
    Webp,
}

#[derive(Debug, Parser)]
#[command(name = "teyeler", version)]
#[command(about = "Cut an image into a multi-resolution tile pyramid", long_about = None)]
pub struct Args {
    /// Path to the input image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory; tiles are written as <level>/<major>/<minor>.<ext>
    #[arg(short, long)]
    pub output: PathBuf,

    /// Tile dimensions in pixels [default: 256 256]
    #[arg(long, num_args = 2, value_names = ["HEIGHT", "WIDTH"])]
    pub shape: Option<Vec<u32>>,

    /// Number of zoom levels. If set to n, 2^(n-1) px in the input image
    /// correspond to 1 px at level 0. By default, the smallest value that
    /// fits the entire image on a single tile at level 0.
    #[arg(long)]
    pub levels: Option<u32>,

    /// Number of threads used for encoding and file I/O [default: 8]
    #[arg(long)]
    pub threads: Option<usize>,

    /// Image corner that becomes tile (0, 0) [default: south-west]
    #[arg(long, value_enum)]
    pub corner: Option<CornerArg>,

    /// Order of the two tile coordinates [default: column-major]
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Tile file format [default: png]
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// JPEG quality, 1-100 [default: 90]
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Maximum number of tiles waiting to be written; 0 = unbounded [default: 256]
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// INI file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write log messages to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, conflicts_with = "silent")]
    pub verbose: bool,

    /// Suppress all log messages that are not warnings or errors
    #[arg(long)]
    pub silent: bool,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Log level selected by `-v` / `--silent`.
    pub fn log_level(&self) -> Level {
        if self.silent {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.silent && !self.no_progress
    }

    /// Builds the engine configuration from defaults, the config file and
    /// the command line, in increasing order of precedence.
    pub fn resolve_config(&self) -> Result<TilingConfig, CliError> {
        let file = match &self.config {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::default(),
        };
        let base = file
            .apply(TilingConfig::default())
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.apply_overrides(base)
    }

    fn apply_overrides(&self, mut config: TilingConfig) -> Result<TilingConfig, CliError> {
        if let Some(shape) = &self.shape {
            let (height, width) = match shape.as_slice() {
                [height, width] => (*height, *width),
                _ => return Err(CliError::Config("--shape takes HEIGHT WIDTH".to_string())),
            };
            config.tile_shape =
                TileShape::new(height, width).map_err(|e| CliError::Config(e.to_string()))?;
        }
        if let Some(levels) = self.levels {
            config.levels = Some(levels);
        }
        if let Some(threads) = self.threads {
            config.workers = threads;
        }
        if let Some(corner) = self.corner {
            config.corner = corner.into();
        }
        if let Some(order) = self.order {
            config.order = order.into();
        }

        let current_quality = match config.format {
            TileFormat::Jpeg { quality } => Some(quality),
            _ => None,
        };
        if let Some(format) = self.format {
            config.format = match format {
                FormatArg::Png => TileFormat::Png,
                FormatArg::Webp => TileFormat::WebP,
                FormatArg::Jpeg => TileFormat::Jpeg {
                    quality: current_quality.unwrap_or(DEFAULT_JPEG_QUALITY),
                },
            };
        }
        if let (TileFormat::Jpeg { .. }, Some(quality)) = (config.format, self.quality) {
            config.format = TileFormat::Jpeg { quality };
        }

        if let Some(capacity) = self.queue_capacity {
            config = config.with_queue_capacity(Some(capacity));
        }

        config
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }
}
