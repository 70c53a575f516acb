//! Configuration file for tilestream.
//!
//! Settings are read from an INI file (by default `~/.tilestream/config.ini`):
//!
//! ```ini
//! [cache]
//! directory = ~/.cache/tilestream
//!
//! [network]
//! threads = 8
//! timeout = 30
//!
//! [logging]
//! directory = logs
//! file = tilestream.log
//!
//! [dataset.mola]
//! name = MOLA DEM
//! source = file
//! type = float32
//! files = /data/mola.db
//! ```
//!
//! Every `[dataset.<id>]` section describes one tile source.

mod defaults;
mod file;
mod parser;
mod settings;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use parser::DATASET_SECTION_PREFIX;
pub use settings::{
    CacheSettings, ConfigFile, DatasetSettings, DatasetSource, LoggingSettings, NetworkSettings,
};
