//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. and reduce it to one
//!   luminance channel.
//! - `save_grayscale`: write a [`GrayBuffer`] to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::GrayBuffer;
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and reduce it to 8-bit luminance using the
/// 0.299/0.587/0.114 RGB weights.
pub fn load_grayscale_image(path: &Path) -> Result<GrayBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let mut data = Vec::with_capacity(width * height);
    for px in img.pixels() {
        let [r, g, b] = px.0;
        let luma = f32::from(r) * 0.299 + f32::from(g) * 0.587 + f32::from(b) * 0.114;
        data.push(luma as u8);
    }
    GrayBuffer::from_raw(width, height, data).map_err(|e| e.to_string())
}

/// Save an 8-bit grayscale buffer to a PNG.
pub fn save_grayscale(buffer: &GrayBuffer, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image: ImageBuffer<Luma<u8>, Vec<u8>> =
        GrayImage::from_raw(buffer.w as u32, buffer.h as u32, buffer.as_slice().to_vec())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
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
