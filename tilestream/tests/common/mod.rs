//! Tile database writer shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Child or root index marking an absent tile.
pub const ABSENT: u64 = u64::MAX;

/// Samples per side of a stored record.
pub const SIDE: usize = 255;

/// One database record: child indices plus raw little-endian samples.
pub struct Record {
    pub children: [u64; 4],
    pub samples: Vec<u8>,
}

impl Record {
    pub fn new(children: [u64; 4], samples: Vec<u8>) -> Self {
        Self { children, samples }
    }

    /// A record without children.
    pub fn leaf(samples: Vec<u8>) -> Self {
        Self::new([ABSENT; 4], samples)
    }
}

/// 255×255 `f32` samples, row-major.
pub fn f32_samples(f: impl Fn(usize, usize) -> f32) -> Vec<u8> {
    let mut out = Vec::with_capacity(SIDE * SIDE * 4);
    for y in 0..SIDE {
        for x in 0..SIDE {
            out.extend_from_slice(&f(x, y).to_le_bytes());
        }
    }
    out
}

/// 255×255 `u8` samples, row-major.
pub fn u8_samples(f: impl Fn(usize, usize) -> u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(SIDE * SIDE);
    for y in 0..SIDE {
        for x in 0..SIDE {
            out.push(f(x, y));
        }
    }
    out
}

/// Serialize a database: root indices, then records padded to 8 bytes.
pub fn db_bytes(roots: [u64; 12], records: &[Record]) -> Vec<u8> {
    let mut out = Vec::new();
    for root in roots {
        out.extend_from_slice(&root.to_le_bytes());
    }
    for record in records {
        for child in record.children {
            out.extend_from_slice(&child.to_le_bytes());
        }
        out.extend_from_slice(&record.samples);
        while out.len() % 8 != 0 {
            out.push(0);
        }
    }
    out
}

/// Write a database into `dir` and return its path.
pub fn write_db(dir: &Path, name: &str, roots: [u64; 12], records: &[Record]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, db_bytes(roots, records)).unwrap();
    path
}

/// Roots with only stored base patch 2 present, at record 0.
///
/// Stored base 2 holds the tiles requested under base patch 0.
pub fn single_root() -> [u64; 12] {
    let mut roots = [ABSENT; 12];
    roots[2] = 0;
    roots
}
