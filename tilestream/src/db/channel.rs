//! One opened database file and its resolved indices.

use super::error::DbError;
use super::index::{
    self, lookup_index, record_offset, IndexMap, STORED_SIZE, TILE_HEADER_SIZE,
};
use crate::addressing::{self, TileId};
use crate::tile::Sample;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A database file plus the index map resolved from it so far.
///
/// Channels of a multi-file source resolve their indices independently,
/// even when all files share the same quadtree layout.
#[derive(Debug)]
pub struct Channel {
    path: PathBuf,
    reader: BufReader<File>,
    record_size: u64,
    index_map: IndexMap,
}

impl Channel {
    /// Open `path` and read its root indices.
    pub fn open(path: impl AsRef<Path>, record_size: u64) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| DbError::Open {
            path: path.clone(),
            source,
        })?;

        let mut channel = Self {
            path,
            reader: BufReader::new(file),
            record_size,
            index_map: IndexMap::new(),
        };
        index::read_file_header(&mut channel.reader, &mut channel.index_map)?;

        debug!(
            path = %channel.path.display(),
            roots = channel.index_map.len(),
            "opened tile database"
        );
        Ok(channel)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolved indices of this channel.
    pub fn index_map(&self) -> &IndexMap {
        &self.index_map
    }

    /// Resolve the children of `tile` and read its stored samples.
    ///
    /// Returns the 255×255 samples and whether all four children exist.
    /// A record cut short by the end of the file is zero-filled.
    pub fn read_tile<S: Sample>(&mut self, tile: TileId) -> Result<(Vec<S>, bool), DbError> {
        let children_available =
            index::read_tile_header(&mut self.reader, self.record_size, tile, &mut self.index_map)?;

        let stored = addressing::remap_base_patch(tile);
        let index = lookup_index(&self.index_map, stored).ok_or(DbError::UnresolvedTile(tile))?;
        let data_offset = record_offset(index, self.record_size)? + TILE_HEADER_SIZE;
        self.reader.seek(SeekFrom::Start(data_offset))?;

        let expected = STORED_SIZE * STORED_SIZE * S::BYTES;
        let mut bytes = Vec::with_capacity(expected);
        let read = (&mut self.reader)
            .take(expected as u64)
            .read_to_end(&mut bytes)?;

        if read < expected {
            // TODO: decide whether truncated records should fail the load instead.
            warn!(
                path = %self.path.display(),
                tile = %tile,
                read,
                expected,
                "short read from tile database, zero-filling remainder"
            );
            bytes.resize(expected, 0);
        }

        let samples = bytes.chunks_exact(S::BYTES).map(S::from_le_slice).collect();
        Ok((samples, children_available))
    }
}
