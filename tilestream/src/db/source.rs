//! File-backed tile source with a dedicated I/O thread.

use super::channel::Channel;
use super::error::DbError;
use super::index::record_size;
use super::resample::resample;
use crate::addressing::TileId;
use crate::source::{OnLoadCallback, SourceInfo, TileSource, TileSourceError};
use crate::tile::{fill_placeholder, Tile, TileDataType, TileElement, TileNode};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// A queued asynchronous load.
struct TileRequest {
    tile: TileId,
    callback: OnLoadCallback,
}

#[derive(Default)]
struct RequestQueue {
    requests: VecDeque<TileRequest>,
    /// Bumped by every `fini`; an I/O thread serves only its own generation.
    generation: u64,
}

/// State shared between the source handle and its I/O thread.
struct Shared {
    info: SourceInfo,
    data_type: TileDataType,
    channels: Mutex<Vec<Channel>>,
    queue: Mutex<RequestQueue>,
    wake: Condvar,
}

impl Shared {
    fn load(&self, tile: TileId) -> Result<TileNode, TileSourceError> {
        let node = match self.data_type {
            TileDataType::Float32 => {
                let (mut data, children) = self.read::<f32>(tile)?;
                data.attach_min_max();
                TileNode::new(data, children)
            }
            TileDataType::UInt8 => {
                let (data, children) = self.read::<u8>(tile)?;
                TileNode::new(data, children)
            }
            TileDataType::U8Vec3 => {
                let (data, children) = self.read::<[u8; 3]>(tile)?;
                TileNode::new(data, children)
            }
        };
        Ok(node)
    }

    /// Read and resample every channel into one tile.
    fn read<T: TileElement>(&self, tile: TileId) -> Result<(Tile<T>, bool), DbError> {
        let mut data = Tile::<T>::new(tile);
        let mut channels = self.channels.lock();

        if channels.is_empty() {
            let children = fill_placeholder(&mut data);
            return Ok((data, children));
        }

        let mut children = true;
        for (i, channel) in channels.iter_mut().enumerate() {
            let (samples, all_present) = channel.read_tile::<T::Component>(tile)?;
            children &= all_present;
            resample(&samples[..], &mut data, i);
        }

        debug!(source = %self.info.name, tile = %tile, children, "loaded tile");
        Ok((data, children))
    }

    fn io_loop(&self, generation: u64) {
        loop {
            let request = {
                let mut queue = self.queue.lock();
                while queue.generation == generation && queue.requests.is_empty() {
                    self.wake.wait(&mut queue);
                }
                if queue.generation != generation {
                    break;
                }
                match queue.requests.pop_front() {
                    Some(request) => request,
                    None => continue,
                }
            };

            let TileRequest { tile, callback } = request;
            let result = self.load(tile);
            if let Err(e) = &result {
                warn!(source = %self.info.name, tile = %tile, error = %e, "tile load failed");
            }

            let info = &self.info;
            if panic::catch_unwind(AssertUnwindSafe(|| callback(info, tile, result))).is_err() {
                warn!(source = %self.info.name, tile = %tile, "tile load callback panicked");
            }
        }
    }
}

/// Tile source reading from a flat binary tile database.
///
/// Scalar data is read from one file; RGB data from three single-byte
/// files, one per color channel. A source without files produces
/// placeholder tiles.
///
/// Synchronous loads run on the calling thread. Asynchronous loads are
/// served in submission order by a single I/O thread started with
/// [`TileSource::init`].
pub struct DbTileSource {
    shared: Arc<Shared>,
    io_thread: Mutex<Option<JoinHandle<()>>>,
}

impl DbTileSource {
    /// Open a database source.
    ///
    /// `paths` must hold one file for scalar data types and three for
    /// [`TileDataType::U8Vec3`]. Fails if any file cannot be opened.
    pub fn open<P: AsRef<Path>>(
        info: SourceInfo,
        data_type: TileDataType,
        paths: &[P],
    ) -> Result<Self, DbError> {
        let expected = data_type.components();
        if paths.len() != expected {
            return Err(DbError::ChannelCount {
                data_type,
                expected,
                actual: paths.len(),
            });
        }

        let size = record_size(data_type);
        let channels = paths
            .iter()
            .map(|path| Channel::open(path, size))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            source = %info.name,
            data_type = %data_type,
            channels = channels.len(),
            "opened database tile source"
        );
        Ok(Self::with_channels(info, data_type, channels))
    }

    /// A source without backing files that produces placeholder tiles.
    pub fn placeholder(info: SourceInfo, data_type: TileDataType) -> Self {
        Self::with_channels(info, data_type, Vec::new())
    }

    fn with_channels(info: SourceInfo, data_type: TileDataType, channels: Vec<Channel>) -> Self {
        Self {
            shared: Arc::new(Shared {
                info,
                data_type,
                channels: Mutex::new(channels),
                queue: Mutex::new(RequestQueue::default()),
                wake: Condvar::new(),
            }),
            io_thread: Mutex::new(None),
        }
    }

    /// Number of opened database files.
    pub fn channel_count(&self) -> usize {
        self.shared.channels.lock().len()
    }

    /// Whether the I/O thread is running.
    pub fn is_running(&self) -> bool {
        self.io_thread.lock().is_some()
    }
}

impl TileSource for DbTileSource {
    fn info(&self) -> &SourceInfo {
        &self.shared.info
    }

    fn data_type(&self) -> TileDataType {
        self.shared.data_type
    }

    fn load_tile(&self, level: u32, patch_idx: i64) -> Result<TileNode, TileSourceError> {
        let tile = TileId::checked(level, patch_idx)?;
        self.shared.load(tile)
    }

    fn load_tile_async(
        &self,
        level: u32,
        patch_idx: i64,
        callback: OnLoadCallback,
    ) -> Result<(), TileSourceError> {
        let tile = TileId::checked(level, patch_idx)?;
        self.shared
            .queue
            .lock()
            .requests
            .push_back(TileRequest { tile, callback });
        self.shared.wake.notify_one();
        Ok(())
    }

    fn pending_requests(&self) -> usize {
        self.shared.queue.lock().requests.len()
    }

    fn init(&self) -> Result<(), TileSourceError> {
        let mut io_thread = self.io_thread.lock();
        if io_thread.is_some() {
            return Ok(());
        }

        let generation = self.shared.queue.lock().generation;
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("tile-io".to_string())
            .spawn(move || shared.io_loop(generation))
            .map_err(TileSourceError::Thread)?;

        info!(source = %self.shared.info.name, "started tile I/O thread");
        *io_thread = Some(handle);
        Ok(())
    }

    fn fini(&self) {
        let handle = {
            let mut io_thread = self.io_thread.lock();
            let Some(handle) = io_thread.take() else {
                return;
            };
            // Retire the running thread before a concurrent init can start another.
            self.shared.queue.lock().generation += 1;
            self.shared.wake.notify_all();
            handle
        };

        // A callback stopping its own source cannot wait for itself.
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            warn!(source = %self.shared.info.name, "tile I/O thread panicked");
        }
        info!(source = %self.shared.info.name, "stopped tile I/O thread");
    }
}

impl Drop for DbTileSource {
    fn drop(&mut self) {
        self.fini();
        let discarded = self.shared.queue.lock().requests.len();
        if discarded > 0 {
            debug!(
                source = %self.shared.info.name,
                discarded,
                "discarding queued tile requests"
            );
        }
        self.shared.queue.lock().requests.clear();
    }
}
