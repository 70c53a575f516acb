//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing logic.

use crate::tile::TileDataType;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Cache settings
    pub cache: CacheSettings,
    /// Network source settings
    pub network: NetworkSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Configured datasets, in file order
    pub datasets: Vec<DatasetSettings>,
}

impl ConfigFile {
    /// Dataset with the given id.
    pub fn dataset(&self, id: &str) -> Option<&DatasetSettings> {
        self.datasets.iter().find(|d| d.id == id)
    }
}

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Root directory for tiles fetched by network sources
    pub directory: PathBuf,
}

/// Network source configuration.
#[derive(Debug, Clone)]
pub struct NetworkSettings {
    /// Worker threads per network source
    pub threads: usize,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Directory the log file is written to
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}

/// One `[dataset.<id>]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSettings {
    /// Identifier after the dot in the section name
    pub id: String,
    /// Display name
    pub name: String,
    /// Attribution
    pub copyright: String,
    /// Element type of the tiles
    pub data_type: TileDataType,
    /// Where the tiles come from
    pub source: DatasetSource,
}

/// Backing store of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// Tile database files: one, or three for RGB
    File { files: Vec<PathBuf> },
    /// Web map service
    Wms {
        /// URL template
        url: String,
        /// Layer name
        layers: String,
        /// Style name, may be empty
        styles: String,
        /// Deepest level the service provides
        max_level: u32,
    },
}

impl DatasetSource {
    /// Name used for the `source` key.
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetSource::File { .. } => "file",
            DatasetSource::Wms { .. } => "wms",
        }
    }
}
