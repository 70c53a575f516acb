//! Working tile grids and their sample types.

use super::minmax::MinMaxPyramid;
use crate::addressing::TileId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width of a working tile in samples.
pub const TILE_SIZE_X: usize = 257;

/// Height of a working tile in samples.
pub const TILE_SIZE_Y: usize = 257;

/// Element type stored in a tile source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileDataType {
    /// Scalar 32-bit float (elevation)
    Float32,
    /// Scalar byte (grayscale imagery)
    UInt8,
    /// Three bytes per sample (color imagery)
    U8Vec3,
}

impl TileDataType {
    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TileDataType::Float32 => "float32",
            TileDataType::UInt8 => "uint8",
            TileDataType::U8Vec3 => "u8vec3",
        }
    }

    /// Number of components per sample.
    pub fn components(&self) -> usize {
        match self {
            TileDataType::Float32 | TileDataType::UInt8 => 1,
            TileDataType::U8Vec3 => 3,
        }
    }

    /// Size in bytes of one component.
    pub fn component_bytes(&self) -> usize {
        match self {
            TileDataType::Float32 => 4,
            TileDataType::UInt8 | TileDataType::U8Vec3 => 1,
        }
    }
}

impl fmt::Display for TileDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a data type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tile data type '{0}' (expected float32, uint8 or u8vec3)")]
pub struct ParseDataTypeError(pub String);

impl FromStr for TileDataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "float32" | "f32" => Ok(TileDataType::Float32),
            "uint8" | "u8" => Ok(TileDataType::UInt8),
            "u8vec3" | "rgb" => Ok(TileDataType::U8Vec3),
            _ => Err(ParseDataTypeError(s.to_string())),
        }
    }
}

/// A single scalar component as stored on disk.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Size in bytes of the little-endian encoding.
    const BYTES: usize;

    /// Widen to `f32` for interpolation.
    fn to_f32(self) -> f32;

    /// Narrow from `f32`; integer samples truncate toward zero and saturate.
    fn from_f32(value: f32) -> Self;

    /// Decode from exactly [`Sample::BYTES`] little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

impl Sample for f32 {
    const BYTES: usize = 4;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl Sample for u8 {
    const BYTES: usize = 1;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value as u8
    }

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

/// Element of a working tile: one or more [`Sample`] components.
///
/// Multi-component elements are filled one channel at a time, so every
/// element type exposes its components by index.
pub trait TileElement: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Scalar type of each component.
    type Component: Sample;

    /// Data type reported by sources producing this element.
    const DATA_TYPE: TileDataType;

    /// Number of components.
    const COMPONENTS: usize;

    /// Read component `channel`.
    fn component(&self, channel: usize) -> Self::Component;

    /// Overwrite component `channel`.
    fn set_component(&mut self, channel: usize, value: Self::Component);

    /// Element with every component set to `value`.
    fn splat(value: Self::Component) -> Self;
}

impl TileElement for f32 {
    type Component = f32;
    const DATA_TYPE: TileDataType = TileDataType::Float32;
    const COMPONENTS: usize = 1;

    #[inline]
    fn component(&self, _channel: usize) -> f32 {
        *self
    }

    #[inline]
    fn set_component(&mut self, _channel: usize, value: f32) {
        *self = value;
    }

    #[inline]
    fn splat(value: f32) -> Self {
        value
    }
}

impl TileElement for u8 {
    type Component = u8;
    const DATA_TYPE: TileDataType = TileDataType::UInt8;
    const COMPONENTS: usize = 1;

    #[inline]
    fn component(&self, _channel: usize) -> u8 {
        *self
    }

    #[inline]
    fn set_component(&mut self, _channel: usize, value: u8) {
        *self = value;
    }

    #[inline]
    fn splat(value: u8) -> Self {
        value
    }
}

impl TileElement for [u8; 3] {
    type Component = u8;
    const DATA_TYPE: TileDataType = TileDataType::U8Vec3;
    const COMPONENTS: usize = 3;

    #[inline]
    fn component(&self, channel: usize) -> u8 {
        self[channel]
    }

    #[inline]
    fn set_component(&mut self, channel: usize, value: u8) {
        self[channel] = value;
    }

    #[inline]
    fn splat(value: u8) -> Self {
        [value; 3]
    }
}

/// A 257×257 grid of samples belonging to one quadtree tile.
///
/// Neighbouring tiles share their outermost row and column, which is why
/// the grid is one sample larger than a power of two.
///
/// # Example
///
/// ```
/// use tilestream::addressing::TileId;
/// use tilestream::tile::{Tile, TILE_SIZE_X};
///
/// let mut tile = Tile::<u8>::new(TileId::root(4));
/// tile.set(TILE_SIZE_X - 1, 0, 9);
/// assert_eq!(tile.get(256, 0), 9);
/// assert!(tile.min_max().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Tile<T> {
    id: TileId,
    data: Vec<T>,
    min_max: Option<MinMaxPyramid>,
}

impl<T: TileElement> Tile<T> {
    /// Allocate a zero-filled tile.
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            data: vec![T::default(); TILE_SIZE_X * TILE_SIZE_Y],
            min_max: None,
        }
    }

    /// Build a tile from row-major samples.
    ///
    /// Returns `None` if `data` does not hold exactly 257×257 elements.
    pub fn from_data(id: TileId, data: Vec<T>) -> Option<Self> {
        if data.len() != TILE_SIZE_X * TILE_SIZE_Y {
            return None;
        }
        Some(Self {
            id,
            data,
            min_max: None,
        })
    }

    /// Identifier of the tile.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Data type of the elements.
    pub fn data_type(&self) -> TileDataType {
        T::DATA_TYPE
    }

    /// Width in samples.
    pub fn width(&self) -> usize {
        TILE_SIZE_X
    }

    /// Height in samples.
    pub fn height(&self) -> usize {
        TILE_SIZE_Y
    }

    /// Row-major samples.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major samples.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Sample at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * TILE_SIZE_X + x]
    }

    /// Overwrite the sample at column `x`, row `y`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * TILE_SIZE_X + x] = value;
    }

    /// Elevation summary, only ever present on `Tile<f32>`.
    pub fn min_max(&self) -> Option<&MinMaxPyramid> {
        self.min_max.as_ref()
    }
}

impl Tile<f32> {
    /// Build the min/max pyramid from the current samples and attach it.
    pub fn attach_min_max(&mut self) {
        let pyramid = MinMaxPyramid::new(self);
        self.min_max = Some(pyramid);
    }
}
