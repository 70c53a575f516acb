//! Tiles served by a remote web map service.
//!
//! A [`NetworkTileSource`] shapes a request URL for each tile, keeps the
//! fetched payloads in a local cache directory and decodes them into
//! working tiles on an owned worker pool.
//!
//! ```ignore
//! use tilestream::remote::{CacheLock, NetworkSourceConfig, NetworkTileSource, ReqwestClient};
//!
//! let cache_lock = CacheLock::new(); // one per process
//! let source = NetworkTileSource::new(info, ReqwestClient::new()?, config, cache_lock.clone())?;
//! ```

mod cache;
mod decode;
mod error;
mod http;
mod request;
mod source;

pub use cache::{cache_extension, cache_path, read_cached, write_cached, CacheLock};
pub use decode::{decode_elevation, decode_gray, decode_rgb, decode_tile};
pub use error::FetchError;
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use request::UrlTemplate;
pub use source::{NetworkSourceConfig, NetworkTileSource, DEFAULT_MAX_LEVEL};

#[cfg(test)]
pub use http::tests::MockHttpClient;
