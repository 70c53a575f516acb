//! Source factory for centralized tile source creation.
//!
//! Turns configured datasets into ready-to-use `Arc<dyn TileSource>`
//! instances so callers never match on the backing store themselves.

use super::types::{SourceInfo, TileSource, TileSourceError};
use crate::config::{ConfigFile, DatasetSettings, DatasetSource, NetworkSettings};
use crate::db::DbTileSource;
use crate::remote::{CacheLock, NetworkSourceConfig, NetworkTileSource, ReqwestClient, UrlTemplate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Factory for creating tile source instances.
///
/// Every network source created by one factory shares the same
/// [`CacheLock`], so one factory should be used per process.
///
/// # Example
///
/// ```ignore
/// use tilestream::config::ConfigFile;
/// use tilestream::source::TileSourceFactory;
///
/// let config = ConfigFile::load()?;
/// let factory = TileSourceFactory::from_config(&config);
/// let source = factory.create(config.dataset("mola").unwrap())?;
/// source.init()?;
/// ```
#[derive(Debug, Clone)]
pub struct TileSourceFactory {
    cache_dir: PathBuf,
    network: NetworkSettings,
    cache_lock: CacheLock,
}

impl TileSourceFactory {
    /// Create a factory with explicit cache and network settings.
    pub fn new(cache_dir: PathBuf, network: NetworkSettings) -> Self {
        Self {
            cache_dir,
            network,
            cache_lock: CacheLock::new(),
        }
    }

    /// Create a factory from the `[cache]` and `[network]` sections.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self::new(config.cache.directory.clone(), config.network.clone())
    }

    /// Lock guarding the cache directory of network sources.
    pub fn cache_lock(&self) -> &CacheLock {
        &self.cache_lock
    }

    /// Create the source for one dataset.
    ///
    /// Database sources still need [`TileSource::init`] before
    /// asynchronous loads are served.
    ///
    /// # Errors
    ///
    /// Fails if a database file cannot be opened, or if the HTTP client or
    /// worker pool of a network source cannot be created.
    pub fn create(
        &self,
        dataset: &DatasetSettings,
    ) -> Result<Arc<dyn TileSource>, TileSourceError> {
        let info = SourceInfo::new(&dataset.name, &dataset.copyright);

        let source: Arc<dyn TileSource> = match &dataset.source {
            DatasetSource::File { files } => {
                Arc::new(DbTileSource::open(info, dataset.data_type, files.as_slice())?)
            }
            DatasetSource::Wms {
                url,
                layers,
                styles,
                max_level,
            } => {
                let client = ReqwestClient::with_timeout(self.network.timeout)?;
                let config = NetworkSourceConfig {
                    url: UrlTemplate::new(url, layers, styles),
                    data_type: dataset.data_type,
                    max_level: *max_level,
                    cache_dir: self.cache_dir.clone(),
                    threads: self.network.threads,
                };
                Arc::new(NetworkTileSource::new(
                    info,
                    client,
                    config,
                    self.cache_lock.clone(),
                )?)
            }
        };

        info!(
            dataset = %dataset.id,
            source = dataset.source.kind(),
            data_type = %dataset.data_type,
            "created tile source"
        );
        Ok(source)
    }

    /// Create sources for every configured dataset, in file order.
    pub fn create_all(
        &self,
        config: &ConfigFile,
    ) -> Result<Vec<(String, Arc<dyn TileSource>)>, TileSourceError> {
        config
            .datasets
            .iter()
            .map(|dataset| Ok((dataset.id.clone(), self.create(dataset)?)))
            .collect()
    }
}
