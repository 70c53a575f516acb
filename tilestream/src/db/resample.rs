//! Resampling of stored 255×255 grids to 257×257 working tiles.

use super::index::STORED_SIZE;
use crate::tile::{Sample, Tile, TileElement, TILE_SIZE_X, TILE_SIZE_Y};

/// Source column/row and blend weight for destination position `d`.
///
/// `d` in `0..=256` maps linearly onto `0..=254`. The last position would
/// read past the grid, so it is taken from the previous pair with the
/// weight mirrored.
#[inline]
fn sample_position(d: usize) -> (usize, f32) {
    let s = (d as f32 / 256.0) * 254.0;
    let i = s.floor();
    let w = s - i;
    let i = i as usize;
    if i == STORED_SIZE - 1 {
        (i - 1, 1.0 - w)
    } else {
        (i, w)
    }
}

#[inline]
fn finite_or_zero<S: Sample>(s: S) -> f32 {
    let v = s.to_f32();
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

#[inline]
fn lerp(a: f32, b: f32, w: f32) -> f32 {
    a + w * (b - a)
}

/// Bilinearly resample `src` (255×255, row-major) into component `channel`
/// of every sample of `tile`.
///
/// NaN source samples count as 0. Integer outputs are truncated.
pub fn resample<T: TileElement>(src: &[T::Component], tile: &mut Tile<T>, channel: usize) {
    debug_assert_eq!(src.len(), STORED_SIZE * STORED_SIZE);
    debug_assert!(channel < T::COMPONENTS);

    let at = |x: usize, y: usize| finite_or_zero(src[y * STORED_SIZE + x]);
    let columns: Vec<(usize, f32)> = (0..TILE_SIZE_X).map(sample_position).collect();

    for y in 0..TILE_SIZE_Y {
        let (sy, wy) = sample_position(y);
        for (x, &(sx, wx)) in columns.iter().enumerate() {
            let top = lerp(at(sx, sy), at(sx + 1, sy), wx);
            let bottom = lerp(at(sx, sy + 1), at(sx + 1, sy + 1), wx);
            let value = <T::Component as Sample>::from_f32(lerp(top, bottom, wy));

            let mut element = tile.get(x, y);
            element.set_component(channel, value);
            tile.set(x, y, element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::TileId;

    const N: usize = STORED_SIZE * STORED_SIZE;

    #[test]
    fn test_sample_position_edges() {
        assert_eq!(sample_position(0), (0, 0.0));
        assert_eq!(sample_position(128), (127, 0.0));
        // The last destination sample is the last source sample.
        assert_eq!(sample_position(256), (253, 1.0));
    }

    #[test]
    fn test_constant_input_stays_constant() {
        let src = vec![42.25f32; N];
        let mut tile = Tile::<f32>::new(TileId::root(0));
        resample(&src[..], &mut tile, 0);
        assert!(tile.data().iter().all(|v| *v == 42.25));

        let src = vec![200u8; N];
        let mut tile = Tile::<u8>::new(TileId::root(0));
        resample(&src[..], &mut tile, 0);
        assert!(tile.data().iter().all(|v| *v == 200));
    }

    #[test]
    fn test_nan_never_leaks() {
        let mut src = vec![5.0f32; N];
        for i in (0..N).step_by(7) {
            src[i] = f32::NAN;
        }
        let mut tile = Tile::<f32>::new(TileId::root(0));
        resample(&src[..], &mut tile, 0);
        assert!(tile.data().iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_corners_match_source_corners() {
        let src: Vec<f32> = (0..N)
            .map(|i| ((i % STORED_SIZE) + 1000 * (i / STORED_SIZE)) as f32)
            .collect();
        let mut tile = Tile::<f32>::new(TileId::root(0));
        resample(&src[..], &mut tile, 0);

        assert_eq!(tile.get(0, 0), 0.0);
        assert_eq!(tile.get(256, 0), 254.0);
        assert_eq!(tile.get(0, 256), 254_000.0);
        assert_eq!(tile.get(256, 256), 254_254.0);
        assert_eq!(tile.get(128, 128), 127_127.0);
    }

    #[test]
    fn test_channels_are_written_independently() {
        let mut tile = Tile::<[u8; 3]>::new(TileId::root(0));
        resample(&vec![10u8; N][..], &mut tile, 0);
        resample(&vec![20u8; N][..], &mut tile, 1);
        resample(&vec![30u8; N][..], &mut tile, 2);

        assert!(tile.data().iter().all(|v| *v == [10, 20, 30]));
    }
}
