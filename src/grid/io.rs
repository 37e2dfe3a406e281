//! I/O helpers for grids, label images and JSON.
//!
//! - `load_grid_json`: read a JSON grid document (`nx`, `ny`, `nz`, `missing`, `data`).
//! - `load_grid_image`: read a PNG/JPEG/etc. as a single-plane grid of gray levels.
//! - `save_label_image`: write the clump labels of one plane to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{GridF32, GridSource};
use crate::clumping::ClumpInfo;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a grid stored as a JSON document.
pub fn load_grid_json(path: &Path) -> Result<GridF32, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read grid {}: {e}", path.display()))?;
    let grid: GridF32 = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse grid {}: {e}", path.display()))?;
    grid.validate()
        .map_err(|e| format!("Invalid grid {}: {e}", path.display()))?;
    Ok(grid)
}

/// Load an image from disk, convert to 8-bit grayscale and use the gray
/// levels (0..=255) as grid samples. Image row 0 becomes grid row 0.
pub fn load_grid_image(path: &Path) -> Result<GridF32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let nx = img.width() as usize;
    let ny = img.height() as usize;
    let data = img.into_raw().into_iter().map(f32::from).collect();
    GridF32::from_vec(nx, ny, 1, data).map_err(|e| format!("Invalid image {}: {e}", path.display()))
}

/// Load a grid from JSON or from an image, picking by file extension.
pub fn load_grid(path: &Path) -> Result<GridF32, String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_grid_json(path),
        _ => load_grid_image(path),
    }
}

/// Save the clump labels of `plane` as a grayscale PNG. Labels are spread
/// over 1..=255 so neighbouring clumps stay distinguishable; background is 0.
pub fn save_label_image(info: &ClumpInfo, plane: usize, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let shape = info.shape;
    if plane >= shape.nz {
        return Err(format!("Plane {plane} out of range (nz={})", shape.nz));
    }
    let mut out = GrayImage::new(shape.nx as u32, shape.ny as u32);
    for intv in info.intervals.iter().filter(|i| i.plane == plane) {
        let shade = label_shade(intv.id.0);
        for x in intv.begin..=intv.end {
            out.put_pixel(x as u32, intv.row as u32, Luma([shade]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

fn label_shade(id: u32) -> u8 {
    if id == 0 {
        0
    } else {
        // 97 is coprime with 255, so consecutive ids land far apart.
        (1 + (id.wrapping_mul(97) % 255)) as u8
    }
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
    fn label_shades_are_nonzero_for_clumps() {
        assert_eq!(label_shade(0), 0);
        for id in 1..600 {
            assert_ne!(label_shade(id), 0);
        }
        assert_ne!(label_shade(1), label_shade(2));
    }
}
