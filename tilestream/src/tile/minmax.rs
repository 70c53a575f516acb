//! Hierarchical min/max summary of an elevation tile.
//!
//! The finest level has 128×128 cells. Cell `(i, j)` covers the 3×3 block
//! of samples starting at `(2i, 2j)`, so cells overlap by one sample the
//! same way neighbouring tiles do. Each further level halves the resolution
//! until a single cell covers the whole tile.

use super::data::{Tile, TILE_SIZE_X, TILE_SIZE_Y};

/// Resolution of the finest pyramid level.
pub const MIN_MAX_BASE_SIZE: usize = 128;

/// Min/max bounds of an elevation tile at decreasing resolutions.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxPyramid {
    /// `levels[0]` is 128×128, `levels.last()` is 1×1
    levels: Vec<Vec<(f32, f32)>>,
}

impl MinMaxPyramid {
    /// Build the pyramid from a populated elevation tile.
    ///
    /// NaN samples are ignored. A cell without any finite sample reports
    /// `(f32::INFINITY, f32::NEG_INFINITY)`.
    pub fn new(tile: &Tile<f32>) -> Self {
        let size = MIN_MAX_BASE_SIZE;
        let mut base = Vec::with_capacity(size * size);

        for j in 0..size {
            for i in 0..size {
                let mut bounds = (f32::INFINITY, f32::NEG_INFINITY);
                for y in (2 * j)..=(2 * j + 2).min(TILE_SIZE_Y - 1) {
                    for x in (2 * i)..=(2 * i + 2).min(TILE_SIZE_X - 1) {
                        let v = tile.get(x, y);
                        if !v.is_nan() {
                            bounds.0 = bounds.0.min(v);
                            bounds.1 = bounds.1.max(v);
                        }
                    }
                }
                base.push(bounds);
            }
        }

        let mut levels = vec![base];
        let mut size = size;
        while size > 1 {
            let half = size / 2;
            let prev = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(half * half);
            for j in 0..half {
                for i in 0..half {
                    let cells = [
                        prev[(2 * j) * size + 2 * i],
                        prev[(2 * j) * size + 2 * i + 1],
                        prev[(2 * j + 1) * size + 2 * i],
                        prev[(2 * j + 1) * size + 2 * i + 1],
                    ];
                    next.push(cells.iter().fold(
                        (f32::INFINITY, f32::NEG_INFINITY),
                        |acc, c| (acc.0.min(c.0), acc.1.max(c.1)),
                    ));
                }
            }
            levels.push(next);
            size = half;
        }

        Self { levels }
    }

    /// Number of levels (8 for a 128×128 base).
    pub fn levels(&self) -> usize {
        self.levels.len()
    }

    /// Cells per side at `level`, zero past the coarsest level.
    pub fn level_size(&self, level: usize) -> usize {
        u32::try_from(level)
            .ok()
            .and_then(|shift| MIN_MAX_BASE_SIZE.checked_shr(shift))
            .unwrap_or(0)
    }

    /// Bounds of cell `(x, y)` at `level`, or `None` outside the pyramid.
    pub fn get(&self, level: usize, x: usize, y: usize) -> Option<(f32, f32)> {
        let cells = self.levels.get(level)?;
        let size = self.level_size(level);
        if x >= size || y >= size {
            return None;
        }
        cells.get(y * size + x).copied()
    }

    /// Smallest sample of the tile.
    pub fn min(&self) -> f32 {
        self.root().0
    }

    /// Largest sample of the tile.
    pub fn max(&self) -> f32 {
        self.root().1
    }

    fn root(&self) -> (f32, f32) {
        self.levels
            .last()
            .and_then(|cells| cells.first())
            .copied()
            .unwrap_or((f32::INFINITY, f32::NEG_INFINITY))
    }
}
