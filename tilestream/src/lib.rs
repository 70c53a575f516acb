//! tilestream - Asynchronous tile streaming for planet renderers
//!
//! This library loads the tiles of a 12-root quadtree covering a sphere
//! from local tile databases or remote web map services, and hands them
//! to a renderer either synchronously or through completion callbacks.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilestream::config::ConfigFile;
//! use tilestream::source::TileSourceFactory;
//!
//! let config = ConfigFile::load()?;
//! let factory = TileSourceFactory::from_config(&config);
//! let source = factory.create(config.dataset("mola").unwrap())?;
//! source.init()?;
//!
//! source.load_tile_async(0, 2, Box::new(|info, tile, result| {
//!     // runs on the source's I/O thread
//! }))?;
//! ```

pub mod addressing;
pub mod config;
pub mod db;
pub mod logging;
pub mod pool;
pub mod remote;
pub mod source;
pub mod tile;

/// Version of the tilestream library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
