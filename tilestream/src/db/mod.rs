//! Flat binary tile database.
//!
//! # File layout
//!
//! ```text
//! header      12 × u64 LE      record index of each root tile
//! record[i]   4 × u64 LE       record index of each child (S, E, W, N)
//!             255 × 255        samples (f32 LE or u8)
//!             padding          zeros up to the next 8-byte boundary
//! ```
//!
//! Record `i` starts at `96 + i * record_size`. A child index of
//! [`INVALID_INDEX`] means the child does not exist, which bounds the depth
//! of that branch. Indices are resolved top-down: a tile can only be read
//! once its parent record has been read.
//!
//! Stored records are 255×255 and are resampled to 257×257 working tiles
//! on load.

mod channel;
mod error;
mod index;
mod resample;
mod source;

pub use channel::Channel;
pub use error::DbError;
pub use index::{
    lookup_index, read_file_header, read_tile_header, record_offset, record_size, IndexMap,
    FILE_HEADER_SIZE, INVALID_INDEX, STORED_SIZE, TILE_HEADER_SIZE,
};
pub use resample::resample;
pub use source::DbTileSource;
