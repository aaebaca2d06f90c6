//! Teyeler - image tile pyramids for map-style viewers
//!
//! Converts a single raster image into a multi-resolution pyramid of
//! fixed-size tiles, stored as `<root>/<level>/<major>/<minor>.<ext>`.
//! Level 0 is the coarsest level; every level above it doubles the
//! resolution, up to the source image at the highest level.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use teyeler::config::TilingConfig;
//! use teyeler::log::TracingLogger;
//! use teyeler::tile::{DiskTileWriter, ImageTileEncoder};
//! use teyeler::tiler::Tiler;
//!
//! let config = TilingConfig::default();
//! let encoder = Arc::new(ImageTileEncoder::new(config.format));
//! let writer = Arc::new(DiskTileWriter::new("tiles", encoder));
//! let tiler = Tiler::new(config, writer, Arc::new(TracingLogger::new()));
//!
//! let report = tiler.run_file(Path::new("map.png")).unwrap();
//! assert!(report.is_success());
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod executor;
pub mod log;
pub mod logging;
pub mod pyramid;
pub mod raster;
pub mod tile;
pub mod tiler;

pub use error::TilerError;

/// Crate version, as set in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
