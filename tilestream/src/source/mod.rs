//! Tile sources.
//!
//! A [`TileSource`] produces [`TileNode`](crate::tile::TileNode)s for
//! quadtree addresses, either blocking the caller or in the background
//! with a completion callback. Two implementations exist:
//!
//! - [`DbTileSource`](crate::db::DbTileSource) reads local tile databases
//!   and serves asynchronous requests in FIFO order on one I/O thread.
//! - [`NetworkTileSource`](crate::remote::NetworkTileSource) fetches from a
//!   web map service on a LIFO worker pool.
//!
//! [`TileSourceFactory`] picks the implementation for a configured dataset.

mod factory;
mod types;

pub use factory::TileSourceFactory;
pub use types::{OnLoadCallback, SourceInfo, TileSource, TileSourceError};
