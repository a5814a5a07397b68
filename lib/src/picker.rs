use crate::color::Rgb;
use crate::error::{Error, Result};
use image::{DynamicImage, GenericImageView};
use log::debug;
use std::path::Path;

/// Edge length of the magnified grid shown around the cursor.
pub const LOUPE_SIZE: u32 = 10;

pub fn open(path: &Path) -> anyhow::Result<DynamicImage> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    debug!("Opened {} ({}x{})", path.display(), width, height);
    Ok(img)
}

fn to_rgb(img: &DynamicImage, x: u32, y: u32) -> Rgb {
    let channels = img.get_pixel(x, y);
    Rgb::new(channels[0], channels[1], channels[2])
}

/// Color of a single pixel, alpha is ignored.
pub fn pick(img: &DynamicImage, x: u32, y: u32) -> Result<Rgb> {
    let (width, height) = img.dimensions();

    if x >= width || y >= height {
        return Err(Error::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }

    Ok(to_rgb(img, x, y))
}

/// Index of the cell under the cursor in a loupe grid of `size`.
pub fn loupe_center(size: u32) -> usize {
    let size = size as usize;
    (size / 2) * size + size / 2
}

/// Edge length of the grid `loupe` returns for a requested `size`, never
/// larger than the longer side of the image.
pub fn loupe_extent(img: &DynamicImage, size: u32) -> u32 {
    let (width, height) = img.dimensions();
    size.min(width.max(height))
}

/// Pixels of a grid centered on (x, y) in row-major order, its edge length
/// is `loupe_extent(img, size)`. Cells beyond the image repeat the nearest
/// edge pixel.
pub fn loupe(img: &DynamicImage, x: u32, y: u32, size: u32) -> Vec<Rgb> {
    let (width, height) = img.dimensions();

    if width == 0 || height == 0 {
        return Vec::new();
    }

    let size = loupe_extent(img, size);

    let left = x as i64 - (size / 2) as i64;
    let top = y as i64 - (size / 2) as i64;
    let clamp = |value: i64, limit: u32| value.clamp(0, limit as i64 - 1) as u32;

    (0..size as i64)
        .flat_map(|row| {
            (0..size as i64).map(move |col| (clamp(left + col, width), clamp(top + row, height)))
        })
        .map(|(px, py)| to_rgb(img, px, py))
        .collect()
}
