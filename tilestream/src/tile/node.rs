//! Loaded tiles handed to callers.

use super::data::{Tile, TileDataType};
use crate::addressing::TileId;

/// A working tile of any supported element type.
#[derive(Debug, Clone)]
pub enum TileData {
    /// Elevation samples with a min/max pyramid attached
    Float32(Tile<f32>),
    /// Grayscale samples
    UInt8(Tile<u8>),
    /// RGB samples
    U8Vec3(Tile<[u8; 3]>),
}

impl TileData {
    /// Identifier of the wrapped tile.
    pub fn id(&self) -> TileId {
        match self {
            TileData::Float32(t) => t.id(),
            TileData::UInt8(t) => t.id(),
            TileData::U8Vec3(t) => t.id(),
        }
    }

    /// Element type of the wrapped tile.
    pub fn data_type(&self) -> TileDataType {
        match self {
            TileData::Float32(_) => TileDataType::Float32,
            TileData::UInt8(_) => TileDataType::UInt8,
            TileData::U8Vec3(_) => TileDataType::U8Vec3,
        }
    }

    /// The elevation tile, if this is one.
    pub fn as_f32(&self) -> Option<&Tile<f32>> {
        match self {
            TileData::Float32(t) => Some(t),
            _ => None,
        }
    }

    /// The grayscale tile, if this is one.
    pub fn as_u8(&self) -> Option<&Tile<u8>> {
        match self {
            TileData::UInt8(t) => Some(t),
            _ => None,
        }
    }

    /// The RGB tile, if this is one.
    pub fn as_rgb(&self) -> Option<&Tile<[u8; 3]>> {
        match self {
            TileData::U8Vec3(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Tile<f32>> for TileData {
    fn from(tile: Tile<f32>) -> Self {
        TileData::Float32(tile)
    }
}

impl From<Tile<u8>> for TileData {
    fn from(tile: Tile<u8>) -> Self {
        TileData::UInt8(tile)
    }
}

impl From<Tile<[u8; 3]>> for TileData {
    fn from(tile: Tile<[u8; 3]>) -> Self {
        TileData::U8Vec3(tile)
    }
}

/// A loaded tile plus the depth known to exist below it.
///
/// The node owns its tile. It is moved to whoever receives the load
/// result and never shared.
#[derive(Debug, Clone)]
pub struct TileNode {
    tile: TileData,
    child_max_level: u32,
}

impl TileNode {
    /// Wrap a loaded tile.
    ///
    /// `child_max_level` is the tile's level + 1 when all four children
    /// exist, otherwise the tile's own level.
    pub fn new(tile: impl Into<TileData>, children_available: bool) -> Self {
        let tile = tile.into();
        let level = tile.id().level();
        Self {
            tile,
            child_max_level: if children_available { level + 1 } else { level },
        }
    }

    /// Identifier of the tile.
    pub fn id(&self) -> TileId {
        self.tile.id()
    }

    /// Quadtree level of the tile.
    pub fn level(&self) -> u32 {
        self.tile.id().level()
    }

    /// Deepest level verified to exist below this node.
    pub fn child_max_level(&self) -> u32 {
        self.child_max_level
    }

    /// Whether all four children can be requested.
    pub fn has_children(&self) -> bool {
        self.child_max_level > self.level()
    }

    /// The loaded tile.
    pub fn tile(&self) -> &TileData {
        &self.tile
    }

    /// Take ownership of the loaded tile.
    pub fn into_tile(self) -> TileData {
        self.tile
    }
}
