//! `tilestream inspect` command.

use tilestream::source::TileSource;
use tilestream::tile::{Tile, TileData, TileElement, TileNode, TILE_SIZE_X, TILE_SIZE_Y};

use crate::error::CliError;

/// Load one tile synchronously and print a summary of it.
pub fn run(source: &dyn TileSource, level: u32, patch: i64) -> Result<(), CliError> {
    let node = source.load_tile(level, patch)?;

    println!("{} ({})", source.info().name, source.info().copyright);
    for line in describe(&node) {
        println!("{}", line);
    }
    Ok(())
}

fn describe(node: &TileNode) -> Vec<String> {
    let mut lines = vec![
        format!("tile:            {}", node.id()),
        format!("data type:       {}", node.tile().data_type()),
        format!("child max level: {}", node.child_max_level()),
    ];

    match node.tile() {
        TileData::Float32(tile) => {
            lines.extend(corners(tile));
            if let Some(pyramid) = tile.min_max() {
                lines.push(format!("min / max:       {} / {}", pyramid.min(), pyramid.max()));
            }
        }
        TileData::UInt8(tile) => {
            lines.extend(corners(tile));
            let min = tile.data().iter().min().copied().unwrap_or_default();
            let max = tile.data().iter().max().copied().unwrap_or_default();
            lines.push(format!("min / max:       {} / {}", min, max));
        }
        TileData::U8Vec3(tile) => lines.extend(corners(tile)),
    }
    lines
}

fn corners<T: TileElement>(tile: &Tile<T>) -> Vec<String> {
    let (right, bottom) = (TILE_SIZE_X - 1, TILE_SIZE_Y - 1);
    [(0, 0), (right, 0), (0, bottom), (right, bottom)]
        .into_iter()
        .map(|(x, y)| format!("sample {:>3},{:<3}:  {:?}", x, y, tile.get(x, y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilestream::addressing::TileId;
    use tilestream::tile::fill_placeholder;

    #[test]
    fn test_describe_placeholder_tile() {
        let mut tile = Tile::<u8>::new(TileId::new(3, 5));
        let has_children = fill_placeholder(&mut tile);
        let node = TileNode::new(tile, has_children);

        let lines = describe(&node);

        assert_eq!(lines[0], "tile:            3/5");
        assert_eq!(lines[2], "child max level: 4");
        assert!(lines.iter().any(|l| l.ends_with("255")));
        assert_eq!(lines.iter().filter(|l| l.starts_with("sample")).count(), 4);
    }

    #[test]
    fn test_describe_elevation_range() {
        let mut tile = Tile::<f32>::new(TileId::new(0, 1));
        tile.set(10, 10, -4.0);
        tile.set(20, 20, 9.5);
        tile.attach_min_max();

        let lines = describe(&TileNode::new(tile, false));

        assert_eq!(lines[2], "child max level: 0");
        assert!(lines.contains(&"min / max:       -4 / 9.5".to_string()));
    }
}
