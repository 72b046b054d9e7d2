//! I/O helpers for rasters and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_rgb_image`: write an `ImageRgb8` (format from the extension).
//! - `save_grayscale`: write any 8-bit single-channel raster (edge maps).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageRgb8, ImageView};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<ImageRgb8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(from_rgb_image(&img))
}

/// Convert an `image::RgbImage` into the pipeline's raster type.
pub fn from_rgb_image(img: &RgbImage) -> ImageRgb8 {
    let w = img.width() as usize;
    let h = img.height() as usize;
    let data = img.pixels().map(|p| p.0).collect();
    ImageRgb8 { w, h, data }
}

/// Convert the pipeline's raster into an `image::RgbImage`.
pub fn to_rgb_image(img: &ImageRgb8) -> RgbImage {
    let mut out = RgbImage::new(img.w as u32, img.h as u32);
    for (y, row) in img.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Rgb(*px));
        }
    }
    out
}

/// Save an RGB raster; the format follows the file extension.
pub fn save_rgb_image(img: &ImageRgb8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    to_rgb_image(img)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save an 8-bit single-channel raster as grayscale.
pub fn save_grayscale<I: ImageView<Pixel = u8>>(view: &I, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(view.width() as u32, view.height() as u32);
    for (y, row) in view.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([px]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_conversion_preserves_pixels() {
        let img = ImageRgb8::from_fn(3, 2, |x, y| [x as u8, y as u8, 9]);
        let back = from_rgb_image(&to_rgb_image(&img));
        assert_eq!(back, img);
    }
}
