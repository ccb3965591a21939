//! Region growing over grayscale intensities.
//!
//! Two 4-neighbors are connected when their intensities differ by at most
//! the threshold. Each maximal connected set becomes one region label.
use std::path::Path;

use image::GenericImageView;
use log::{debug, info};
use ndarray::Array2;

use crate::error::{ColormapError, Result};
use crate::grid::LabelGrid;

/// Pixel position as `(row, col)`.
pub type Pixel = (usize, usize);

const UNVISITED: u32 = u32::MAX;

/// Load any raster as 8-bit grayscale intensities.
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<Array2<u8>> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| ColormapError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = image.dimensions();
    let gray = image.into_luma8().into_raw();
    Ok(Array2::from_shape_vec((height as usize, width as usize), gray)?)
}

/// Neighbors of `pixel` (up, down, left, right) within `threshold` intensity.
pub fn connected_neighbors(image: &Array2<u8>, pixel: Pixel, threshold: f64) -> Vec<Pixel> {
    let (rows, cols) = image.dim();
    let (row, col) = pixel;
    let value = f64::from(image[[row, col]]);

    let candidates = [
        row.checked_sub(1).map(|r| (r, col)),
        (row + 1 < rows).then_some((row + 1, col)),
        col.checked_sub(1).map(|c| (row, c)),
        (col + 1 < cols).then_some((row, col + 1)),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter(|&(r, c)| (f64::from(image[[r, c]]) - value).abs() <= threshold)
        .collect()
}

/// All pixels reachable from `seed` through connected neighbors.
pub fn connected_set(image: &Array2<u8>, seed: Pixel, threshold: f64) -> Vec<Pixel> {
    let mut visited = Array2::from_elem(image.dim(), false);
    grow(image, seed, threshold, &mut visited)
}

fn grow(
    image: &Array2<u8>,
    seed: Pixel,
    threshold: f64,
    visited: &mut Array2<bool>,
) -> Vec<Pixel> {
    let mut members = Vec::new();
    let mut stack = vec![seed];
    visited[seed] = true;

    while let Some(pixel) = stack.pop() {
        members.push(pixel);
        for neighbor in connected_neighbors(image, pixel, threshold) {
            if !visited[neighbor] {
                visited[neighbor] = true;
                stack.push(neighbor);
            }
        }
    }
    members
}

/// Label every connected region of at least `min_region` pixels with
/// 1, 2, ... in row-major discovery order. Smaller regions become 0.
pub fn segment(image: &Array2<u8>, threshold: f64, min_region: usize) -> LabelGrid {
    let mut labels = Array2::from_elem(image.dim(), UNVISITED);
    let mut visited = Array2::from_elem(image.dim(), false);
    let mut next_label = 1u32;
    let mut dropped = 0usize;

    for ((row, col), _) in image.indexed_iter() {
        if visited[[row, col]] {
            continue;
        }
        let region = grow(image, (row, col), threshold, &mut visited);
        let label = if region.len() >= min_region {
            next_label += 1;
            next_label - 1
        } else {
            dropped += 1;
            0
        };
        for pixel in region {
            labels[pixel] = label;
        }
    }

    debug!("Dropped {dropped} regions smaller than {min_region} pixels");
    info!(
        "Segmented {}x{} image into {} regions (threshold {threshold})",
        image.nrows(),
        image.ncols(),
        next_label - 1
    );
    LabelGrid::new(labels)
}
