//! Network-backed tile source.

use super::cache::{cache_path, read_cached, write_cached_or_warn, CacheLock};
use super::decode::decode_tile;
use super::error::FetchError;
use super::http::HttpClient;
use super::request::UrlTemplate;
use crate::addressing::TileId;
use crate::pool::WorkerPool;
use crate::source::{OnLoadCallback, SourceInfo, TileSource, TileSourceError};
use crate::tile::{TileDataType, TileNode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Deepest level served when none is configured.
pub const DEFAULT_MAX_LEVEL: u32 = 10;

/// Settings of a network source.
#[derive(Debug, Clone)]
pub struct NetworkSourceConfig {
    /// Request URL template
    pub url: UrlTemplate,
    /// Element type of the served tiles
    pub data_type: TileDataType,
    /// Deepest level the service provides
    pub max_level: u32,
    /// Root of the local tile cache
    pub cache_dir: PathBuf,
    /// Worker pool size
    pub threads: usize,
}

/// Fetch, cache and decode logic shared with worker threads.
struct Fetcher<C> {
    client: C,
    config: NetworkSourceConfig,
    cache_lock: CacheLock,
}

impl<C: HttpClient> Fetcher<C> {
    fn check_level(&self, tile: TileId) -> Result<(), FetchError> {
        if tile.level() > self.config.max_level {
            return Err(FetchError::LevelTooDeep {
                level: tile.level(),
                max_level: self.config.max_level,
            });
        }
        Ok(())
    }

    /// Payload of `tile`, from the cache if present, else from the service.
    fn payload(&self, tile: TileId) -> Result<Vec<u8>, FetchError> {
        self.check_level(tile)?;

        let path = cache_path(
            &self.config.cache_dir,
            self.config.url.layers(),
            tile,
            self.config.data_type,
        );
        if let Some(bytes) = read_cached(&self.cache_lock, &path)? {
            return Ok(bytes);
        }

        let url = self.config.url.url(tile);
        debug!(tile = %tile, url = %url, "fetching tile");
        let bytes = self.client.get(&url)?;
        write_cached_or_warn(&self.cache_lock, &path, &bytes);
        Ok(bytes)
    }

    fn load(&self, tile: TileId) -> Result<TileNode, TileSourceError> {
        let bytes = self.payload(tile)?;
        let data = decode_tile(tile, self.config.data_type, &bytes)?;
        Ok(TileNode::new(data, tile.level() < self.config.max_level))
    }
}

/// Tile source fetching tiles from a web map service.
///
/// Loads run on an owned [`WorkerPool`], so asynchronous requests are
/// served newest first. Fetched payloads are kept in a local cache
/// directory guarded by a [`CacheLock`] shared between sources.
pub struct NetworkTileSource<C> {
    info: SourceInfo,
    fetcher: Arc<Fetcher<C>>,
    pool: WorkerPool,
}

impl<C: HttpClient + 'static> NetworkTileSource<C> {
    /// Create a source and start its worker pool.
    pub fn new(
        info: SourceInfo,
        client: C,
        config: NetworkSourceConfig,
        cache_lock: CacheLock,
    ) -> Result<Self, TileSourceError> {
        let pool = WorkerPool::new(config.threads)?;
        debug!(
            source = %info.name,
            layers = config.url.layers(),
            max_level = config.max_level,
            "created network tile source"
        );
        Ok(Self {
            info,
            fetcher: Arc::new(Fetcher {
                client,
                config,
                cache_lock,
            }),
            pool,
        })
    }

    /// Deepest level the service provides.
    pub fn max_level(&self) -> u32 {
        self.fetcher.config.max_level
    }

    /// Populate the cache for a tile without decoding it.
    pub fn prefetch(&self, level: u32, patch_idx: i64) -> Result<(), TileSourceError> {
        let tile = TileId::checked(level, patch_idx)?;
        self.fetcher.payload(tile)?;
        Ok(())
    }
}

impl<C: HttpClient + 'static> TileSource for NetworkTileSource<C> {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn data_type(&self) -> TileDataType {
        self.fetcher.config.data_type
    }

    fn load_tile(&self, level: u32, patch_idx: i64) -> Result<TileNode, TileSourceError> {
        let tile = TileId::checked(level, patch_idx)?;
        self.fetcher.load(tile)
    }

    fn load_tile_async(
        &self,
        level: u32,
        patch_idx: i64,
        callback: OnLoadCallback,
    ) -> Result<(), TileSourceError> {
        let tile = TileId::checked(level, patch_idx)?;
        let fetcher = Arc::clone(&self.fetcher);
        let info = self.info.clone();

        self.pool.enqueue(move || {
            let result = fetcher.load(tile);
            if let Err(e) = &result {
                warn!(source = %info.name, tile = %tile, error = %e, "tile load failed");
            }
            callback(&info, tile, result);
        })?;
        Ok(())
    }

    fn pending_requests(&self) -> usize {
        self.pool.pending_task_count()
    }

    fn init(&self) -> Result<(), TileSourceError> {
        Ok(())
    }

    fn fini(&self) {}
}

impl<C> Drop for NetworkTileSource<C> {
    fn drop(&mut self) {
        let discarded = self.pool.clear_pending();
        if discarded > 0 {
            debug!(source = %self.info.name, discarded, "discarding queued tile requests");
        }
        self.pool.stop();
    }
}
