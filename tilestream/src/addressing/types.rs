//! Tile identifier and base-patch coordinate types.

use std::fmt;
use thiserror::Error;

/// Number of root patches of the quadtree.
pub const BASE_PATCH_COUNT: i64 = 12;

/// Number of children of every non-leaf tile.
pub const CHILD_COUNT: usize = 4;

/// Deepest level whose patch indices still fit into an `i64`.
///
/// `12 * 4^29` is the largest patch count below `i64::MAX`.
pub const MAX_LEVEL: u32 = 29;

/// Position of a tile in the 12-root hierarchical quadtree.
///
/// The patch index is unique within its level and runs from `0` to
/// `12 * 4^level - 1`. Tiles are value types and never change after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TileId {
    level: u32,
    patch_idx: i64,
}

impl TileId {
    /// Create a tile identifier without validating it.
    ///
    /// Use [`TileId::checked`] for identifiers that come from outside the
    /// addressing math (configuration, callers of a tile source).
    pub const fn new(level: u32, patch_idx: i64) -> Self {
        Self { level, patch_idx }
    }

    /// Create a tile identifier, rejecting levels and patch indices that do
    /// not exist in the quadtree.
    ///
    /// # Example
    ///
    /// ```
    /// use tilestream::addressing::TileId;
    ///
    /// assert!(TileId::checked(0, 11).is_ok());
    /// assert!(TileId::checked(0, 12).is_err());
    /// assert!(TileId::checked(1, 47).is_ok());
    /// ```
    pub fn checked(level: u32, patch_idx: i64) -> Result<Self, AddressError> {
        if level > MAX_LEVEL {
            return Err(AddressError::InvalidLevel(level));
        }
        let count = BASE_PATCH_COUNT << (2 * level);
        if !(0..count).contains(&patch_idx) {
            return Err(AddressError::InvalidPatchIndex { level, patch_idx });
        }
        Ok(Self { level, patch_idx })
    }

    /// Identifier of one of the 12 root patches.
    pub const fn root(base: i64) -> Self {
        Self {
            level: 0,
            patch_idx: base,
        }
    }

    /// Quadtree level, 0 for the root patches.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Patch index within the level.
    pub fn patch_idx(&self) -> i64 {
        self.patch_idx
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.level, self.patch_idx)
    }
}

/// Location of a tile relative to the root patch it descends from.
///
/// `x` and `y` run from `0` to `2^level - 1` inside the base patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseCoord {
    /// Root patch, 0-11
    pub base: i64,
    /// Column inside the base patch
    pub x: i64,
    /// Row inside the base patch
    pub y: i64,
}

/// Errors produced when an address does not exist in the quadtree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Level deeper than [`MAX_LEVEL`]
    #[error("Level {0} exceeds the deepest addressable level {MAX_LEVEL}")]
    InvalidLevel(u32),

    /// Patch index outside `0..12 * 4^level`
    #[error("Patch index {patch_idx} does not exist at level {level}")]
    InvalidPatchIndex { level: u32, patch_idx: i64 },

    /// Child index outside `0..4`
    #[error("Child index {0} is out of range (expected 0-3)")]
    InvalidChildIndex(usize),
}
