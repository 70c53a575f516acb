//! Error types for remote tile fetching.

use crate::addressing::TileId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching or decoding a remote tile.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request failed or the server answered with an error status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Reading or writing the local tile cache failed
    #[error("Tile cache error at {}: {source}", path.display())]
    Cache { path: PathBuf, source: io::Error },

    /// The payload could not be turned into a tile
    #[error("Cannot decode payload for tile {tile}: {reason}")]
    Decode { tile: TileId, reason: String },

    /// The service does not provide tiles this deep
    #[error("Level {level} exceeds the service's maximum level {max_level}")]
    LevelTooDeep { level: u32, max_level: u32 },
}
