//! `tilestream walk` command.
//!
//! Loads the quadtree breadth-first from the 12 root tiles through
//! [`TileSource::load_tile_async`], descending into a tile's children only
//! when the loaded node reports them.

use std::sync::mpsc;
use std::time::Duration;
use tilestream::addressing::{children, TileId, BASE_PATCH_COUNT};
use tilestream::source::{TileSource, TileSourceError};
use tilestream::tile::TileNode;
use tracing::{debug, warn};

use crate::error::CliError;

type Completion = (TileId, Result<TileNode, TileSourceError>);

/// Longest wait for a single completion before giving up.
const STALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of a walk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Tiles loaded at each level, starting at level 0
    pub tiles_per_level: Vec<usize>,
    /// Loads that completed with an error
    pub failed: usize,
    /// Highest queue length observed after submitting requests
    pub peak_pending: usize,
}

/// Walk `source` down to `depth` and print per-level counts.
pub fn run(source: &dyn TileSource, depth: u32) -> Result<(), CliError> {
    let report = walk(source, depth)?;

    println!("{}: walked to level {}", source.info().name, depth);
    for (level, count) in report.tiles_per_level.iter().enumerate() {
        println!("  level {:>2}: {:>8} tiles", level, count);
    }
    println!("  failed:   {:>8}", report.failed);
    println!("  peak pending requests: {}", report.peak_pending);
    Ok(())
}

/// Walk `source` down to `depth` and collect statistics.
///
/// Starts the source, waits for every issued request to complete, then
/// stops it again.
pub fn walk(source: &dyn TileSource, depth: u32) -> Result<WalkReport, CliError> {
    let (tx, rx) = mpsc::channel::<Completion>();
    let mut report = WalkReport {
        tiles_per_level: vec![0; depth as usize + 1],
        ..WalkReport::default()
    };

    source.init()?;

    let submit = |tile: TileId| -> Result<(), TileSourceError> {
        let tx = tx.clone();
        source.load_tile_async(
            tile.level(),
            tile.patch_idx(),
            Box::new(move |_info, tile, result| {
                // Receiver gone means the walk was abandoned
                let _ = tx.send((tile, result));
            }),
        )
    };

    let mut outstanding = 0usize;
    for base in 0..BASE_PATCH_COUNT {
        submit(TileId::root(base))?;
        outstanding += 1;
    }
    report.peak_pending = source.pending_requests();

    while outstanding > 0 {
        let Ok((tile, result)) = rx.recv_timeout(STALL_TIMEOUT) else {
            source.fini();
            return Err(CliError::WalkInterrupted { outstanding });
        };
        outstanding -= 1;

        let node = match result {
            Ok(node) => node,
            Err(e) => {
                warn!(tile = %tile, error = %e, "tile load failed");
                report.failed += 1;
                continue;
            }
        };

        report.tiles_per_level[tile.level() as usize] += 1;
        if node.has_children() && tile.level() < depth {
            for child in children(tile) {
                submit(child)?;
                outstanding += 1;
            }
            report.peak_pending = report.peak_pending.max(source.pending_requests());
        }
    }

    source.fini();
    debug!(?report, "walk finished");
    Ok(report)
}
