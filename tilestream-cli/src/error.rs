//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;
use tilestream::config::ConfigFileError;
use tilestream::source::TileSourceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration file could not be loaded
    Config {
        path: PathBuf,
        error: ConfigFileError,
    },
    /// No dataset with the requested id
    UnknownDataset(String),
    /// Source creation or tile load failed
    Source(TileSourceError),
    /// Background loads stopped reporting before the walk finished
    WalkInterrupted { outstanding: usize },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::UnknownDataset(_) => {
                eprintln!();
                eprintln!("Run 'tilestream datasets' to list the configured datasets.");
            }
            CliError::Config { .. } => {
                eprintln!();
                eprintln!("Datasets are configured in [dataset.<id>] sections, e.g.:");
                eprintln!("  [dataset.mola]");
                eprintln!("  type = float32");
                eprintln!("  files = /data/mola.db");
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
            CliError::Config { path, error } => {
                write!(f, "Failed to load '{}': {}", path.display(), error)
            }
            CliError::UnknownDataset(id) => write!(f, "Unknown dataset '{}'", id),
            CliError::Source(e) => write!(f, "Tile source error: {}", e),
            CliError::WalkInterrupted { outstanding } => write!(
                f,
                "Tile source stopped with {} request(s) outstanding",
                outstanding
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config { error, .. } => Some(error),
            CliError::Source(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TileSourceError> for CliError {
    fn from(e: TileSourceError) -> Self {
        CliError::Source(e)
    }
}
