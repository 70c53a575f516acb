//! Quadtree tile addressing.
//!
//! The planet is split into 12 root patches. Every patch is a quadtree whose
//! tiles are numbered in nested order: at level `L` a tile's patch index is
//! `base * 4^L + morton(x, y)`, where `x`/`y` are its coordinates inside the
//! base patch. Children are ordered S, E, W, N, which in nested order are
//! `(2x, 2y)`, `(2x+1, 2y)`, `(2x, 2y+1)`, `(2x+1, 2y+1)`.
//!
//! Some databases store their base patches rotated by 180° relative to the
//! logical layout. [`BASE_PATCH_REMAP`] maps a logical base patch to the one
//! stored on disk and is only used by the file-backed source.

mod types;

pub use types::{AddressError, BaseCoord, TileId, BASE_PATCH_COUNT, CHILD_COUNT, MAX_LEVEL};

/// Logical base patch → base patch stored in the database file.
pub const BASE_PATCH_REMAP: [i64; 12] = [2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9];

/// Number of tiles one base patch holds at `level`.
#[inline]
pub fn patches_per_base(level: u32) -> i64 {
    1_i64 << (2 * level)
}

/// Splits a tile into its base patch and the position inside it.
///
/// # Example
///
/// ```
/// use tilestream::addressing::{base_coord, TileId};
///
/// let coord = base_coord(TileId::new(1, 4 * 5 + 3));
/// assert_eq!((coord.base, coord.x, coord.y), (5, 1, 1));
/// ```
#[inline]
pub fn base_coord(tile: TileId) -> BaseCoord {
    let per_base = patches_per_base(tile.level());
    let local = tile.patch_idx() % per_base;
    BaseCoord {
        base: tile.patch_idx() / per_base,
        x: compact_bits(local as u64) as i64,
        y: compact_bits((local as u64) >> 1) as i64,
    }
}

/// Inverse of [`base_coord`].
#[inline]
pub fn patch_index(level: u32, coord: BaseCoord) -> i64 {
    let local = spread_bits(coord.x as u64) | (spread_bits(coord.y as u64) << 1);
    coord.base * patches_per_base(level) + local as i64
}

/// Identifier of child `child_idx` (0 = S, 1 = E, 2 = W, 3 = N) of `tile`.
///
/// # Panics
///
/// Panics in debug builds if `child_idx` is not in `0..4`; use
/// [`checked_child`] for untrusted input.
#[inline]
pub fn child(tile: TileId, child_idx: usize) -> TileId {
    debug_assert!(child_idx < CHILD_COUNT);
    let coord = base_coord(tile);
    let level = tile.level() + 1;
    let child_coord = BaseCoord {
        base: coord.base,
        x: 2 * coord.x + (child_idx & 1) as i64,
        y: 2 * coord.y + (child_idx >> 1) as i64,
    };
    TileId::new(level, patch_index(level, child_coord))
}

/// Like [`child`], rejecting child indices outside `0..4`.
pub fn checked_child(tile: TileId, child_idx: usize) -> Result<TileId, AddressError> {
    if child_idx >= CHILD_COUNT {
        return Err(AddressError::InvalidChildIndex(child_idx));
    }
    Ok(child(tile, child_idx))
}

/// All four children in S, E, W, N order.
pub fn children(tile: TileId) -> [TileId; CHILD_COUNT] {
    [
        child(tile, 0),
        child(tile, 1),
        child(tile, 2),
        child(tile, 3),
    ]
}

/// Parent of `tile`, or `None` for a root patch.
pub fn parent(tile: TileId) -> Option<TileId> {
    if tile.level() == 0 {
        return None;
    }
    Some(TileId::new(tile.level() - 1, tile.patch_idx() >> 2))
}

/// Replaces the base patch of `tile` with the one the database stores it in.
///
/// The position inside the base patch is unchanged.
#[inline]
pub fn remap_base_patch(tile: TileId) -> TileId {
    let mut coord = base_coord(tile);
    coord.base = BASE_PATCH_REMAP[coord.base as usize];
    TileId::new(tile.level(), patch_index(tile.level(), coord))
}

/// Interleaves the low 32 bits of `v` with zeros (bit i → bit 2i).
fn spread_bits(v: u64) -> u64 {
    let mut v = v & 0x0000_0000_ffff_ffff;
    v = (v | (v << 16)) & 0x0000_ffff_0000_ffff;
    v = (v | (v << 8)) & 0x00ff_00ff_00ff_00ff;
    v = (v | (v << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    (v | (v << 1)) & 0x5555_5555_5555_5555
}

/// Gathers the even bits of `v` (bit 2i → bit i).
fn compact_bits(v: u64) -> u64 {
    let mut v = v & 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0f0f_0f0f_0f0f_0f0f;
    v = (v | (v >> 4)) & 0x00ff_00ff_00ff_00ff;
    v = (v | (v >> 8)) & 0x0000_ffff_0000_ffff;
    (v | (v >> 16)) & 0x0000_0000_ffff_ffff
}
