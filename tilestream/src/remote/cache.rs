//! Local disk cache for fetched tiles.

use super::error::FetchError;
use crate::addressing::{base_coord, TileId};
use crate::tile::TileDataType;
use parking_lot::{Mutex, MutexGuard};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{trace, warn};

/// Shared lock serialising all cache directory access.
///
/// Several network sources may write into overlapping cache paths, so one
/// lock is created per process and handed to every source. Cloning shares
/// the same lock.
#[derive(Debug, Clone, Default)]
pub struct CacheLock(Arc<Mutex<()>>);

impl CacheLock {
    /// Create a new, independent lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the cache is available.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.0.lock()
    }

    /// Whether two handles share the same lock.
    pub fn same_as(&self, other: &CacheLock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// File extension of cached payloads.
pub fn cache_extension(data_type: TileDataType) -> &'static str {
    match data_type {
        TileDataType::Float32 => "f32",
        TileDataType::UInt8 => "gray",
        TileDataType::U8Vec3 => "rgb",
    }
}

/// Construct the full path for a cached tile.
///
/// ```text
/// <cache_dir>/<layers>/<level>/<base>/<layers>_<level>_<patch>.<ext>
/// ```
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tilestream::addressing::TileId;
/// use tilestream::remote::cache_path;
/// use tilestream::tile::TileDataType;
///
/// let path = cache_path(Path::new("/cache"), "mola", TileId::new(1, 21), TileDataType::Float32);
/// assert_eq!(path, PathBuf::from("/cache/mola/1/5/mola_1_21.f32"));
/// ```
pub fn cache_path(cache_dir: &Path, layers: &str, tile: TileId, data_type: TileDataType) -> PathBuf {
    let base = base_coord(tile).base;
    cache_dir
        .join(layers)
        .join(tile.level().to_string())
        .join(base.to_string())
        .join(format!(
            "{}_{}_{}.{}",
            layers,
            tile.level(),
            tile.patch_idx(),
            cache_extension(data_type)
        ))
}

/// Read a cached payload, or `None` if it is not cached.
pub fn read_cached(lock: &CacheLock, path: &Path) -> Result<Option<Vec<u8>>, FetchError> {
    let _guard = lock.lock();
    match fs::read(path) {
        Ok(bytes) => {
            trace!(path = %path.display(), "tile cache hit");
            Ok(Some(bytes))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FetchError::Cache {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Store a payload, creating parent directories as needed.
pub fn write_cached(lock: &CacheLock, path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    let _guard = lock.lock();
    let to_cache_error = |source| FetchError::Cache {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_cache_error)?;
    }
    fs::write(path, bytes).map_err(to_cache_error)
}

/// Like [`write_cached`], logging instead of failing.
pub fn write_cached_or_warn(lock: &CacheLock, path: &Path, bytes: &[u8]) {
    if let Err(e) = write_cached(lock, path, bytes) {
        warn!(error = %e, "failed to write tile cache");
    }
}
