//! Conversion of fetched payloads into working tiles.

use super::error::FetchError;
use crate::addressing::TileId;
use crate::db::{resample, STORED_SIZE};
use crate::tile::{Tile, TileData, TileDataType, TILE_SIZE_X, TILE_SIZE_Y};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

/// Decode `bytes` into a tile of `data_type`.
///
/// Elevation payloads are raw little-endian `f32` grids of 257×257 or
/// 255×255 samples and get a min/max pyramid attached. Image payloads can
/// be in any format the `image` crate reads.
pub fn decode_tile(
    tile: TileId,
    data_type: TileDataType,
    bytes: &[u8],
) -> Result<TileData, FetchError> {
    Ok(match data_type {
        TileDataType::Float32 => {
            let mut data = decode_elevation(tile, bytes)?;
            data.attach_min_max();
            TileData::Float32(data)
        }
        TileDataType::UInt8 => TileData::UInt8(decode_gray(tile, bytes)?),
        TileDataType::U8Vec3 => TileData::U8Vec3(decode_rgb(tile, bytes)?),
    })
}

/// Decode a raw `f32` elevation grid.
pub fn decode_elevation(tile: TileId, bytes: &[u8]) -> Result<Tile<f32>, FetchError> {
    let samples: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    if bytes.len() == TILE_SIZE_X * TILE_SIZE_Y * 4 {
        return Tile::from_data(tile, samples).ok_or_else(|| decode_error(tile, "bad grid size"));
    }
    if bytes.len() == STORED_SIZE * STORED_SIZE * 4 {
        let mut data = Tile::<f32>::new(tile);
        resample(&samples[..], &mut data, 0);
        return Ok(data);
    }

    Err(decode_error(
        tile,
        format!(
            "{} bytes is neither a 257x257 nor a 255x255 float grid",
            bytes.len()
        ),
    ))
}

/// Decode a grayscale image.
pub fn decode_gray(tile: TileId, bytes: &[u8]) -> Result<Tile<u8>, FetchError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| decode_error(tile, format!("image decode error: {}", e)))?
        .to_luma8();

    let mut data = Tile::<u8>::new(tile);
    if is_stored_size(image.width(), image.height()) {
        resample(image.as_raw().as_slice(), &mut data, 0);
        return Ok(data);
    }

    let image: GrayImage = fit_tile(image);
    for (x, y, pixel) in image.enumerate_pixels() {
        data.set(x as usize, y as usize, pixel[0]);
    }
    Ok(data)
}

/// Decode a color image.
pub fn decode_rgb(tile: TileId, bytes: &[u8]) -> Result<Tile<[u8; 3]>, FetchError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| decode_error(tile, format!("image decode error: {}", e)))?
        .to_rgb8();

    let mut data = Tile::<[u8; 3]>::new(tile);
    if is_stored_size(image.width(), image.height()) {
        for channel in 0..3 {
            let plane: Vec<u8> = image.pixels().map(|p| p[channel]).collect();
            resample(&plane[..], &mut data, channel);
        }
        return Ok(data);
    }

    let image: RgbImage = fit_tile(image);
    for (x, y, pixel) in image.enumerate_pixels() {
        data.set(x as usize, y as usize, pixel.0);
    }
    Ok(data)
}

fn is_stored_size(width: u32, height: u32) -> bool {
    width as usize == STORED_SIZE && height as usize == STORED_SIZE
}

/// Resize an image to the working tile size unless it already matches.
fn fit_tile<I>(image: image::ImageBuffer<I, Vec<u8>>) -> image::ImageBuffer<I, Vec<u8>>
where
    I: image::Pixel<Subpixel = u8> + 'static,
{
    let (w, h) = (TILE_SIZE_X as u32, TILE_SIZE_Y as u32);
    if image.dimensions() == (w, h) {
        image
    } else {
        imageops::resize(&image, w, h, FilterType::Triangle)
    }
}

fn decode_error(tile: TileId, reason: impl Into<String>) -> FetchError {
    FetchError::Decode {
        tile,
        reason: reason.into(),
    }
}
