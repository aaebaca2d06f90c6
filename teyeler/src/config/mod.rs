//! Configuration.
//!
//! - [`TilingConfig`]: the values the engine consumes, with defaults and
//!   `with_*` builders
//! - [`ConfigFile`]: an optional INI file whose settings are overlaid on a
//!   `TilingConfig`
//!
//! ```
//! use teyeler::config::TilingConfig;
//! use teyeler::coord::Corner;
//!
//! let config = TilingConfig::default()
//!     .with_corner(Corner::NorthWest)
//!     .with_workers(4);
//! assert!(config.validate().is_ok());
//! ```

mod file;
mod parser;
mod settings;
mod tiling;

pub use file::ConfigFileError;
pub use settings::{ConfigFile, LevelSetting, OutputSettings, TilingSettings, WriterSettings};
pub use tiling::{ConfigError, TilingConfig, DEFAULT_QUEUE_CAPACITY};
