//! Common helpers shared across CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilestream::config::{config_file_path, ConfigFile};
use tilestream::source::{TileSource, TileSourceFactory};

use crate::error::CliError;

/// Load the configuration from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    ConfigFile::load_from(&path).map_err(|error| CliError::Config { path, error })
}

/// Create the source of the dataset named `id`.
pub fn open_dataset(config: &ConfigFile, id: &str) -> Result<Arc<dyn TileSource>, CliError> {
    let dataset = config
        .dataset(id)
        .ok_or_else(|| CliError::UnknownDataset(id.to_string()))?;
    let factory = TileSourceFactory::from_config(config);
    Ok(factory.create(dataset)?)
}
