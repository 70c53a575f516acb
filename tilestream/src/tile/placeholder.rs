//! Synthetic tiles for sources without backing data.

use super::data::{Sample, Tile, TileElement, TILE_SIZE_X, TILE_SIZE_Y};

/// Level at which placeholder interiors reach full brightness and the
/// quadtree stops reporting children.
pub const PLACEHOLDER_MAX_LEVEL: u32 = 10;

/// Fill `tile` with a deterministic pattern.
///
/// Border samples are 255 and the interior is graded by
/// `level / PLACEHOLDER_MAX_LEVEL`. Returns whether children exist.
pub fn fill_placeholder<T: TileElement>(tile: &mut Tile<T>) -> bool {
    let level = tile.id().level();
    let border = T::splat(<T::Component as Sample>::from_f32(255.0));
    let interior = T::splat(<T::Component as Sample>::from_f32(
        255.0 * level as f32 / PLACEHOLDER_MAX_LEVEL as f32,
    ));

    for y in 0..TILE_SIZE_Y {
        for x in 0..TILE_SIZE_X {
            let on_border = x == 0 || x + 1 == TILE_SIZE_X || y == 0 || y + 1 == TILE_SIZE_Y;
            tile.set(x, y, if on_border { border } else { interior });
        }
    }

    level < PLACEHOLDER_MAX_LEVEL
}
