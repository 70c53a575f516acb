//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;

/// Default worker threads per network source.
pub const DEFAULT_NETWORK_THREADS: usize = 8;

/// Default HTTP timeout in seconds.
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = crate::remote::DEFAULT_TIMEOUT_SECS;

/// Default deepest level of a web map service.
pub const DEFAULT_WMS_MAX_LEVEL: u32 = crate::remote::DEFAULT_MAX_LEVEL;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "tilestream.log";

/// Default cache directory (~/.cache/tilestream).
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("tilestream")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            cache: CacheSettings {
                directory: default_cache_dir(),
            },
            network: NetworkSettings {
                threads: DEFAULT_NETWORK_THREADS,
                timeout: DEFAULT_NETWORK_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
            datasets: Vec::new(),
        }
    }
}
