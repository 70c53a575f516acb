//! Integration tests for the database tile source.
//!
//! These tests write small databases to disk and verify:
//! - Index resolution through the base patch remap
//! - Resampling of stored records into working tiles
//! - Child availability and `child_max_level`
//! - FIFO ordering and lifecycle of asynchronous loads
//! - RGB sources split over three files

mod common;

use common::{f32_samples, single_root, u8_samples, write_db, Record, ABSENT};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use tempfile::TempDir;
use tilestream::addressing::TileId;
use tilestream::db::{DbError, DbTileSource};
use tilestream::source::{SourceInfo, TileSource, TileSourceError};
use tilestream::tile::{TileDataType, TileNode};

const WAIT: Duration = Duration::from_secs(10);

// =============================================================================
// Test Helpers
// =============================================================================

fn info() -> SourceInfo {
    SourceInfo::new("test-db", "test data")
}

/// Elevation database: root record 0 with four leaf children 1..=4.
///
/// The root samples are `x + 1000 * y`; child `i` is constant `100 * (i + 1)`.
fn elevation_db(dir: &TempDir) -> DbTileSource {
    let mut records = vec![Record::new(
        [1, 2, 3, 4],
        f32_samples(|x, y| (x + 1000 * y) as f32),
    )];
    for i in 0..4 {
        let value = 100.0 * (i + 1) as f32;
        records.push(Record::leaf(f32_samples(|_, _| value)));
    }
    let path = write_db(dir.path(), "dem.db", single_root(), &records);
    DbTileSource::open(info(), TileDataType::Float32, &[path]).unwrap()
}

type Completion = (TileId, Result<TileNode, TileSourceError>);

fn queue(source: &DbTileSource, tile: TileId, tx: &mpsc::Sender<Completion>) {
    let tx = tx.clone();
    source
        .load_tile_async(
            tile.level(),
            tile.patch_idx(),
            Box::new(move |info, tile, result| {
                assert_eq!(info.name, "test-db");
                tx.send((tile, result)).unwrap();
            }),
        )
        .unwrap();
}

// =============================================================================
// Synchronous loads
// =============================================================================

#[test]
fn test_root_tile_is_resampled() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);

    let node = source.load_tile(0, 0).unwrap();
    let tile = node.tile().as_f32().unwrap();

    assert_eq!(tile.get(0, 0), 0.0);
    assert_eq!(tile.get(256, 0), 254.0);
    assert_eq!(tile.get(0, 256), 254_000.0);
    assert_eq!(tile.get(256, 256), 254_254.0);
    assert_eq!(tile.get(128, 128), 127_127.0);

    let pyramid = tile.min_max().unwrap();
    assert_eq!(pyramid.min(), 0.0);
    assert_eq!(pyramid.max(), 254_254.0);
}

#[test]
fn test_all_children_present_gives_next_level() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);

    let root = source.load_tile(0, 0).unwrap();
    assert_eq!(root.child_max_level(), 1);
    assert!(root.has_children());

    for i in 0..4 {
        let child = source.load_tile(1, i).unwrap();
        assert_eq!(child.child_max_level(), 1);
        assert!(!child.has_children());

        let tile = child.tile().as_f32().unwrap();
        assert_eq!(tile.get(100, 200), 100.0 * (i + 1) as f32);
    }
}

#[test]
fn test_absent_child_limits_depth() {
    let temp = TempDir::new().unwrap();
    let records = vec![
        Record::new([1, ABSENT, 2, 3], u8_samples(|_, _| 1)),
        Record::leaf(u8_samples(|_, _| 2)),
        Record::leaf(u8_samples(|_, _| 3)),
        Record::leaf(u8_samples(|_, _| 4)),
    ];
    let path = write_db(temp.path(), "gray.db", single_root(), &records);
    let source = DbTileSource::open(info(), TileDataType::UInt8, &[path]).unwrap();

    let root = source.load_tile(0, 0).unwrap();
    assert_eq!(root.child_max_level(), 0);

    // Present children still load; the absent one never resolves
    assert_eq!(source.load_tile(1, 0).unwrap().tile().as_u8().unwrap().get(5, 5), 2);
    assert_eq!(source.load_tile(1, 2).unwrap().tile().as_u8().unwrap().get(5, 5), 3);
    assert!(matches!(
        source.load_tile(1, 1),
        Err(TileSourceError::Db(DbError::UnresolvedTile(tile))) if tile == TileId::new(1, 1)
    ));
}

#[test]
fn test_child_before_parent_is_unresolved() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);

    assert!(matches!(
        source.load_tile(1, 0),
        Err(TileSourceError::Db(DbError::UnresolvedTile(_)))
    ));

    source.load_tile(0, 0).unwrap();
    assert!(source.load_tile(1, 0).is_ok());
}

#[test]
fn test_absent_root_is_unresolved() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);

    // Requested root 1 is stored as root 3, which the database lacks
    assert!(matches!(
        source.load_tile(0, 1),
        Err(TileSourceError::Db(DbError::UnresolvedTile(_)))
    ));
}

#[test]
fn test_invalid_address_is_rejected() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);

    assert!(matches!(
        source.load_tile(0, 12),
        Err(TileSourceError::Address(_))
    ));
    assert!(matches!(
        source.load_tile(1, -1),
        Err(TileSourceError::Address(_))
    ));
}

#[test]
fn test_rgb_channels_from_three_files() {
    let temp = TempDir::new().unwrap();
    let paths: Vec<_> = [("r.db", 10u8), ("g.db", 20), ("b.db", 30)]
        .into_iter()
        .map(|(name, value)| {
            write_db(
                temp.path(),
                name,
                single_root(),
                &[Record::leaf(u8_samples(move |_, _| value))],
            )
        })
        .collect();

    let source = DbTileSource::open(info(), TileDataType::U8Vec3, paths.as_slice()).unwrap();
    assert_eq!(source.channel_count(), 3);

    let node = source.load_tile(0, 0).unwrap();
    let tile = node.tile().as_rgb().unwrap();
    assert_eq!(tile.get(0, 0), [10, 20, 30]);
    assert_eq!(tile.get(256, 256), [10, 20, 30]);
    assert_eq!(node.child_max_level(), 0);
}

#[test]
fn test_channels_resolve_indices_independently() {
    let temp = TempDir::new().unwrap();
    let constant = |value: u8| u8_samples(move |_, _| value);

    // Red: root first, then children 0..=3 in order
    let mut red_roots = [ABSENT; 12];
    red_roots[2] = 0;
    let red = write_db(
        temp.path(),
        "r.db",
        red_roots,
        &[
            Record::new([1, 2, 3, 4], constant(11)),
            Record::leaf(constant(12)),
            Record::leaf(constant(13)),
            Record::leaf(constant(14)),
            Record::leaf(constant(15)),
        ],
    );

    // Green: root behind two unrelated records, child 1 missing
    let mut green_roots = [ABSENT; 12];
    green_roots[2] = 2;
    let green = write_db(
        temp.path(),
        "g.db",
        green_roots,
        &[
            Record::leaf(constant(99)),
            Record::leaf(constant(98)),
            Record::new([4, ABSENT, 3, 5], constant(21)),
            Record::leaf(constant(24)),
            Record::leaf(constant(22)),
            Record::leaf(constant(25)),
        ],
    );

    // Blue: children stored in reverse, root last
    let mut blue_roots = [ABSENT; 12];
    blue_roots[2] = 4;
    let blue = write_db(
        temp.path(),
        "b.db",
        blue_roots,
        &[
            Record::leaf(constant(35)),
            Record::leaf(constant(34)),
            Record::leaf(constant(33)),
            Record::leaf(constant(32)),
            Record::new([3, 2, 1, 0], constant(31)),
        ],
    );

    let source =
        DbTileSource::open(info(), TileDataType::U8Vec3, &[red, green, blue]).unwrap();

    let root = source.load_tile(0, 0).unwrap();
    let tile = root.tile().as_rgb().unwrap();
    assert_eq!(tile.get(0, 0), [11, 21, 31]);
    assert_eq!(tile.get(128, 77), [11, 21, 31]);
    assert_eq!(tile.get(256, 256), [11, 21, 31]);
    // Red and blue hold every child, green does not
    assert_eq!(root.child_max_level(), 0);
    assert!(!root.has_children());

    for (patch, expected) in [(0, [12, 22, 32]), (2, [14, 24, 34]), (3, [15, 25, 35])] {
        let child = source.load_tile(1, patch).unwrap();
        assert_eq!(child.tile().as_rgb().unwrap().get(40, 200), expected);
    }
    assert!(matches!(
        source.load_tile(1, 1),
        Err(TileSourceError::Db(DbError::UnresolvedTile(tile))) if tile == TileId::new(1, 1)
    ));
}

#[test]
fn test_short_record_is_zero_filled() {
    let temp = TempDir::new().unwrap();
    let mut bytes = common::db_bytes(single_root(), &[Record::leaf(u8_samples(|_, _| 7))]);
    // Keep the headers and roughly the first half of the samples
    bytes.truncate(96 + 32 + 255 * 120);
    let path = temp.path().join("short.db");
    std::fs::write(&path, bytes).unwrap();

    let source = DbTileSource::open(info(), TileDataType::UInt8, &[path]).unwrap();
    let node = source.load_tile(0, 0).unwrap();
    let tile = node.tile().as_u8().unwrap();

    assert_eq!(tile.get(0, 0), 7);
    assert_eq!(tile.get(256, 256), 0);
}

#[test]
fn test_truncated_record_header_is_error() {
    let temp = TempDir::new().unwrap();
    let mut bytes = common::db_bytes(single_root(), &[Record::leaf(u8_samples(|_, _| 7))]);
    bytes.truncate(96 + 16);
    let path = temp.path().join("cut.db");
    std::fs::write(&path, bytes).unwrap();

    let source = DbTileSource::open(info(), TileDataType::UInt8, &[path]).unwrap();
    assert!(matches!(
        source.load_tile(0, 0),
        Err(TileSourceError::Db(DbError::Io(_)))
    ));
}

// =============================================================================
// Asynchronous loads
// =============================================================================

#[test]
fn test_async_loads_complete_in_submission_order() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);
    let (tx, rx) = mpsc::channel();

    // Children only resolve because the root is served first
    let order = [
        TileId::new(0, 0),
        TileId::new(1, 3),
        TileId::new(1, 0),
        TileId::new(1, 2),
        TileId::new(1, 1),
    ];
    for tile in order {
        queue(&source, tile, &tx);
    }
    assert_eq!(source.pending_requests(), order.len());

    source.init().unwrap();

    let completed: Vec<TileId> = (0..order.len())
        .map(|_| {
            let (tile, result) = rx.recv_timeout(WAIT).unwrap();
            assert!(result.is_ok(), "load of {} failed", tile);
            tile
        })
        .collect();
    assert_eq!(completed, order);
    assert_eq!(source.pending_requests(), 0);
}

#[test]
fn test_async_error_is_delivered_to_callback() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);
    let (tx, rx) = mpsc::channel();
    source.init().unwrap();

    queue(&source, TileId::new(2, 0), &tx);

    let (tile, result) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(tile, TileId::new(2, 0));
    assert!(matches!(
        result,
        Err(TileSourceError::Db(DbError::UnresolvedTile(_)))
    ));
}

#[test]
fn test_init_and_fini_are_idempotent() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);

    source.fini();
    assert!(!source.is_running());

    source.init().unwrap();
    source.init().unwrap();
    assert!(source.is_running());

    source.fini();
    source.fini();
    assert!(!source.is_running());
}

#[test]
fn test_requests_survive_restart() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);
    let (tx, rx) = mpsc::channel();

    source.init().unwrap();
    source.fini();

    queue(&source, TileId::new(0, 0), &tx);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert_eq!(source.pending_requests(), 1);

    source.init().unwrap();
    let (tile, result) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(tile, TileId::new(0, 0));
    assert!(result.is_ok());
}

#[test]
fn test_drop_discards_queued_requests() {
    let temp = TempDir::new().unwrap();
    let source = elevation_db(&temp);
    let calls = Arc::new(AtomicUsize::new(0));

    for patch in 0..4 {
        let calls = Arc::clone(&calls);
        source
            .load_tile_async(
                0,
                patch,
                Box::new(move |_, _, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
    }
    drop(source);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    // Every callback has been dropped along with its captured counter
    assert_eq!(Arc::strong_count(&calls), 1);
}
