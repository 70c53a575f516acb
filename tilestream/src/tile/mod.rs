//! Tile data model.
//!
//! A [`Tile`] is a fixed 257×257 grid of samples for one quadtree tile.
//! Loaded tiles are wrapped in a [`TileNode`], which also records how deep
//! the quadtree is known to go below that tile.
//!
//! # Element types
//!
//! | [`TileDataType`] | Element      | Used for          |
//! |------------------|--------------|-------------------|
//! | `Float32`        | `f32`        | elevation (DEM)   |
//! | `UInt8`          | `u8`         | grayscale imagery |
//! | `U8Vec3`         | `[u8; 3]`    | color imagery     |
//!
//! Elevation tiles additionally carry a [`MinMaxPyramid`].

mod data;
mod minmax;
mod node;
mod placeholder;

pub use data::{
    ParseDataTypeError, Sample, Tile, TileDataType, TileElement, TILE_SIZE_X, TILE_SIZE_Y,
};
pub use minmax::{MinMaxPyramid, MIN_MAX_BASE_SIZE};
pub use node::{TileData, TileNode};
pub use placeholder::{fill_placeholder, PLACEHOLDER_MAX_LEVEL};
