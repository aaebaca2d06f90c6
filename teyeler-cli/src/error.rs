//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use teyeler::config::ConfigFileError;
use teyeler::logging::LoggingError;
use teyeler::raster::DecodeError;
use teyeler::TilerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(LoggingError),
    /// Invalid settings from the command line or config file
    Config(String),
    /// Config file could not be read or parsed
    ConfigFile(ConfigFileError),
    /// Tiling run failed
    Tiling(TilerError),
    /// Run finished but some tiles were not written
    IncompleteOutput { failed: usize, total: u64 },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Tiling(TilerError::Decode(DecodeError::Image { .. })) => {
                eprintln!();
                eprintln!("Make sure the input path points to a PNG, JPEG, WebP, TIFF,");
                eprintln!("BMP or GIF image that can be opened.");
            }
            CliError::IncompleteOutput { .. } => {
                eprintln!();
                eprintln!("Check that the output directory is writable and has free space.");
                eprintln!("Rerunning overwrites tiles that were already written.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Tiling(e) => write!(f, "{}", e),
            CliError::IncompleteOutput { failed, total } => {
                write!(f, "{} of {} tiles could not be written", failed, total)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::ConfigFile(e) => Some(e),
            CliError::Tiling(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<TilerError> for CliError {
    fn from(e: TilerError) -> Self {
        CliError::Tiling(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::LoggingInit(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_output_message() {
        let err = CliError::IncompleteOutput {
            failed: 3,
            total: 21,
        };
        assert_eq!(err.to_string(), "3 of 21 tiles could not be written");
    }

    #[test]
    fn test_config_message() {
        let err = CliError::Config("--shape takes HEIGHT WIDTH".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: --shape takes HEIGHT WIDTH"
        );
    }
}
