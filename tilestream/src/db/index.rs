//! Lazy resolution of tile record indices.
//!
//! A database file starts with the record indices of the 12 root tiles.
//! Each record starts with the indices of its four children, so the index
//! of a tile is only known once its parent record has been read.

use super::error::DbError;
use crate::addressing::{self, TileId, BASE_PATCH_COUNT, CHILD_COUNT};
use crate::tile::TileDataType;
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

/// Size of the file header: 12 little-endian `u64` root indices.
pub const FILE_HEADER_SIZE: u64 = BASE_PATCH_COUNT as u64 * 8;

/// Size of a record header: 4 little-endian `u64` child indices.
pub const TILE_HEADER_SIZE: u64 = CHILD_COUNT as u64 * 8;

/// Child index marking a child that does not exist.
pub const INVALID_INDEX: u64 = u64::MAX;

/// Samples per side of a stored record.
pub const STORED_SIZE: usize = 255;

/// Resolved record indices of one database file, keyed by stored tile id.
pub type IndexMap = HashMap<TileId, u64>;

/// Size in bytes of one record for `data_type`, padded to 8 bytes.
///
/// RGB databases are split into three single-byte files, so a `U8Vec3`
/// record is the same size as a `UInt8` one.
pub fn record_size(data_type: TileDataType) -> u64 {
    let samples = (STORED_SIZE * STORED_SIZE * data_type.component_bytes()) as u64;
    let unpadded = TILE_HEADER_SIZE + samples;
    unpadded.div_ceil(8) * 8
}

/// Byte offset of record `index`.
///
/// # Example
///
/// ```
/// use tilestream::db::{record_offset, record_size, FILE_HEADER_SIZE};
/// use tilestream::tile::TileDataType;
///
/// let size = record_size(TileDataType::Float32);
/// assert_eq!(record_offset(0, size).unwrap(), FILE_HEADER_SIZE);
/// assert_eq!(record_offset(2, size).unwrap(), FILE_HEADER_SIZE + 2 * size);
/// ```
pub fn record_offset(index: u64, record_size: u64) -> Result<u64, DbError> {
    index
        .checked_mul(record_size)
        .and_then(|v| v.checked_add(FILE_HEADER_SIZE))
        .ok_or(DbError::OffsetOverflow { index, record_size })
}

/// Read the 12 root indices and seed `index_map` with the roots that exist.
pub fn read_file_header<R: Read + Seek>(
    reader: &mut R,
    index_map: &mut IndexMap,
) -> Result<(), DbError> {
    reader.seek(SeekFrom::Start(0))?;
    let roots = read_u64s::<_, { BASE_PATCH_COUNT as usize }>(reader)?;

    for (base, index) in roots.iter().enumerate() {
        if *index != INVALID_INDEX {
            index_map.entry(TileId::root(base as i64)).or_insert(*index);
        }
    }
    Ok(())
}

/// Read the child indices of `tile` and record the ones that exist.
///
/// The base patch of `tile` is remapped to the stored layout before its
/// record is looked up, and children are derived from the remapped tile.
/// Returns `true` only when all four children exist. The reader is left
/// positioned at the start of the record's samples.
pub fn read_tile_header<R: Read + Seek>(
    reader: &mut R,
    record_size: u64,
    tile: TileId,
    index_map: &mut IndexMap,
) -> Result<bool, DbError> {
    let stored = addressing::remap_base_patch(tile);
    let index = lookup_index(index_map, stored).ok_or(DbError::UnresolvedTile(tile))?;

    reader.seek(SeekFrom::Start(record_offset(index, record_size)?))?;
    let child_indices = read_u64s::<_, CHILD_COUNT>(reader)?;

    let mut all_present = true;
    for (i, child_index) in child_indices.iter().enumerate() {
        if *child_index == INVALID_INDEX {
            all_present = false;
            continue;
        }
        let child = addressing::child(stored, i);
        trace!(parent = %stored, child = %child, index = child_index, "resolved child index");
        index_map.entry(child).or_insert(*child_index);
    }

    Ok(all_present)
}

/// Record index of `tile`, or `None` if its branch has not been read yet.
///
/// `tile` is a stored tile id, i.e. already remapped.
pub fn lookup_index(index_map: &IndexMap, tile: TileId) -> Option<u64> {
    index_map.get(&tile).copied()
}

fn read_u64s<R: Read, const N: usize>(reader: &mut R) -> Result<[u64; N], DbError> {
    let mut buf = [0u8; 8];
    let mut values = [0u64; N];
    for value in values.iter_mut() {
        reader.read_exact(&mut buf)?;
        *value = u64::from_le_bytes(buf);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_u64s(out: &mut Vec<u8>, values: &[u64]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// One root record at index 0 (stored root 2), all other roots absent.
    fn single_root_db(children: [u64; 4], record_size: u64) -> Vec<u8> {
        let mut roots = [INVALID_INDEX; 12];
        roots[2] = 0;
        let mut out = Vec::new();
        write_u64s(&mut out, &roots);
        write_u64s(&mut out, &children);
        out.resize((FILE_HEADER_SIZE + record_size) as usize, 0);
        out
    }

    #[test]
    fn test_record_sizes_are_padded() {
        assert_eq!(record_size(TileDataType::Float32), 260_136);
        assert_eq!(record_size(TileDataType::UInt8), 65_064);
        assert_eq!(record_size(TileDataType::U8Vec3), 65_064);
        assert_eq!(record_size(TileDataType::UInt8) % 8, 0);
    }

    #[test]
    fn test_record_offset_is_strictly_increasing() {
        let size = record_size(TileDataType::UInt8);
        let mut previous = None;
        for index in [0u64, 1, 2, 17, 1_000, 1_000_000] {
            let offset = record_offset(index, size).unwrap();
            assert_eq!(offset, FILE_HEADER_SIZE + index * size);
            if let Some(prev) = previous {
                assert!(offset > prev);
            }
            previous = Some(offset);
        }
    }

    #[test]
    fn test_record_offset_overflow() {
        let size = record_size(TileDataType::Float32);
        assert!(matches!(
            record_offset(INVALID_INDEX, size),
            Err(DbError::OffsetOverflow { .. })
        ));
    }

    #[test]
    fn test_read_file_header_seeds_roots() {
        let size = record_size(TileDataType::UInt8);
        let mut cursor = Cursor::new(single_root_db([1, 2, 3, 4], size));
        let mut map = IndexMap::new();

        read_file_header(&mut cursor, &mut map).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(lookup_index(&map, TileId::root(2)), Some(0));
        assert_eq!(lookup_index(&map, TileId::root(0)), None);
    }

    #[test]
    fn test_truncated_file_header_is_an_error() {
        let mut cursor = Cursor::new(vec![0u8; 40]);
        let mut map = IndexMap::new();
        assert!(matches!(
            read_file_header(&mut cursor, &mut map),
            Err(DbError::Io(_))
        ));
    }

    #[test]
    fn test_read_tile_header_all_children_present() {
        let size = record_size(TileDataType::UInt8);
        let mut cursor = Cursor::new(single_root_db([5, 6, 7, 8], size));
        let mut map = IndexMap::new();
        read_file_header(&mut cursor, &mut map).unwrap();

        // Logical root 0 is stored as root 2.
        let all = read_tile_header(&mut cursor, size, TileId::root(0), &mut map).unwrap();

        assert!(all);
        assert_eq!(lookup_index(&map, TileId::new(1, 8)), Some(5));
        assert_eq!(lookup_index(&map, TileId::new(1, 11)), Some(8));
        assert_eq!(
            cursor.position(),
            FILE_HEADER_SIZE + TILE_HEADER_SIZE,
            "reader should stop at the sample data"
        );
    }

    #[test]
    fn test_read_tile_header_false_iff_sentinel_child() {
        let size = record_size(TileDataType::UInt8);
        for missing in 0..4 {
            let mut children = [10, 11, 12, 13];
            children[missing] = INVALID_INDEX;
            let mut cursor = Cursor::new(single_root_db(children, size));
            let mut map = IndexMap::new();
            read_file_header(&mut cursor, &mut map).unwrap();

            let all = read_tile_header(&mut cursor, size, TileId::root(0), &mut map).unwrap();

            assert!(!all);
            let missing_child = TileId::new(1, 8 + missing as i64);
            assert_eq!(lookup_index(&map, missing_child), None);
            assert_eq!(map.len(), 1 + 3);
        }
    }

    #[test]
    fn test_unresolved_tile_is_not_the_sentinel() {
        let size = record_size(TileDataType::UInt8);
        let mut cursor = Cursor::new(single_root_db([1, 2, 3, 4], size));
        let mut map = IndexMap::new();
        read_file_header(&mut cursor, &mut map).unwrap();

        assert_eq!(lookup_index(&map, TileId::new(3, 5)), None);
        assert!(matches!(
            read_tile_header(&mut cursor, size, TileId::new(1, 0), &mut map),
            Err(DbError::UnresolvedTile(t)) if t == TileId::new(1, 0)
        ));
    }

    #[test]
    fn test_existing_entries_are_never_replaced() {
        let size = record_size(TileDataType::UInt8);
        let mut cursor = Cursor::new(single_root_db([1, 2, 3, 4], size));
        let mut map = IndexMap::new();
        map.insert(TileId::new(1, 8), 99);
        read_file_header(&mut cursor, &mut map).unwrap();
        read_tile_header(&mut cursor, size, TileId::root(0), &mut map).unwrap();

        assert_eq!(lookup_index(&map, TileId::new(1, 8)), Some(99));
    }
}
