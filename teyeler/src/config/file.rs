//! Loading the config file from disk.

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Errors that can occur while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Malformed INI text
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ini::ParseError),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from `path`.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Parse(e) => ConfigFileError::ParseError(e),
            e => ConfigFileError::ReadError(e),
        })?;
        super::parser::parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text)?;
        super::parser::parse_ini(&ini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelSetting;
    use crate::coord::Corner;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("teyeler.ini");
        std::fs::write(
            &config_path,
            "[tiling]\ncorner = north-east\nlevels = 4\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.tiling.corner, Some(Corner::NorthEast));
        assert_eq!(config.tiling.levels, Some(LevelSetting::Count(4)));
    }

    #[test]
    fn test_malformed_ini() {
        let result = ConfigFile::parse("[tiling\ncorner = south-west\n");
        assert!(matches!(result, Err(ConfigFileError::ParseError(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.ini");
        std::fs::write(&config_path, "[tiling\ncorner = south-west\n").unwrap();

        let result = ConfigFile::load_from(&config_path);
        assert!(matches!(result, Err(ConfigFileError::ParseError(_))));
    }
}
