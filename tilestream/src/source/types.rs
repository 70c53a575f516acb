//! Tile source trait and shared types.

use crate::addressing::{AddressError, TileId};
use crate::db::DbError;
use crate::pool::PoolError;
use crate::remote::FetchError;
use crate::tile::{TileDataType, TileNode};
use thiserror::Error;

/// Human-readable identity of a tile source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Dataset name
    pub name: String,
    /// Attribution shown alongside the data
    pub copyright: String,
}

impl SourceInfo {
    /// Create a source identity.
    pub fn new(name: impl Into<String>, copyright: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            copyright: copyright.into(),
        }
    }
}

/// Completion callback for [`TileSource::load_tile_async`].
///
/// Runs on a thread owned by the source, never on the caller's thread.
/// Receives the identity of the source, the requested tile and the load
/// result, which it takes ownership of.
pub type OnLoadCallback =
    Box<dyn FnOnce(&SourceInfo, TileId, Result<TileNode, TileSourceError>) + Send + 'static>;

/// Errors surfaced by tile sources.
#[derive(Debug, Error)]
pub enum TileSourceError {
    /// Requested tile does not exist in the quadtree
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Database read failure
    #[error(transparent)]
    Db(#[from] DbError),

    /// Remote fetch or decode failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Worker pool rejected or lost the work
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Background thread could not be started
    #[error("Failed to start I/O thread: {0}")]
    Thread(#[source] std::io::Error),
}

/// A backing store that produces tiles on request.
///
/// Implementations are selected once per dataset and used through
/// `Arc<dyn TileSource>`.
pub trait TileSource: Send + Sync {
    /// Identity of the source.
    fn info(&self) -> &SourceInfo;

    /// Element type of the tiles this source produces.
    fn data_type(&self) -> TileDataType;

    /// Load a tile, blocking the calling thread.
    fn load_tile(&self, level: u32, patch_idx: i64) -> Result<TileNode, TileSourceError>;

    /// Queue a tile load and return immediately.
    ///
    /// `callback` runs on a source-owned thread once the load finishes.
    /// Requests still queued when the source is dropped are discarded
    /// without running their callbacks.
    fn load_tile_async(
        &self,
        level: u32,
        patch_idx: i64,
        callback: OnLoadCallback,
    ) -> Result<(), TileSourceError>;

    /// Number of queued requests not yet started.
    fn pending_requests(&self) -> usize;

    /// Start background processing. Calling it again is a no-op.
    fn init(&self) -> Result<(), TileSourceError>;

    /// Stop background processing. Calling it while stopped is a no-op.
    fn fini(&self);
}
