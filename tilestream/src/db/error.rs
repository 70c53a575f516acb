//! Error types for the tile database.

use crate::addressing::TileId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a tile database.
#[derive(Debug, Error)]
pub enum DbError {
    /// The backing file could not be opened. Fatal for the source.
    #[error("Failed to open tile database {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Seek or read failure, including truncated index headers.
    #[error("Tile database I/O error: {0}")]
    Io(#[from] io::Error),

    /// The tile's index has not been resolved yet; its ancestors must be
    /// loaded first.
    #[error("Tile {0} has no resolved index (load its parent first)")]
    UnresolvedTile(TileId),

    /// Record offset does not fit into a 64-bit file position.
    #[error("Record index {index} is out of range for records of {record_size} bytes")]
    OffsetOverflow { index: u64, record_size: u64 },

    /// A database source needs one file, or three for RGB data.
    #[error("Expected {expected} database file(s) for {data_type}, got {actual}")]
    ChannelCount {
        data_type: crate::tile::TileDataType,
        expected: usize,
        actual: usize,
    },
}
