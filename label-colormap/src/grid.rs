use std::collections::HashSet;
use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::{debug, info};
use ndarray::Array2;

use crate::error::{ColormapError, Result};

/// Segmentation labels, one per pixel, indexed `[[row, col]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    labels: Array2<u32>,
}

impl LabelGrid {
    pub fn new(labels: Array2<u32>) -> Self {
        Self { labels }
    }

    /// Read a raster from disk and decode its pixels into labels.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| ColormapError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Decoded {} as {:?} ({}x{})",
            path.display(),
            image.color(),
            image.width(),
            image.height()
        );
        let grid = Self::from_image(&image)?;
        info!(
            "Loaded label grid {}x{} from {}",
            grid.height(),
            grid.width(),
            path.display()
        );
        Ok(grid)
    }

    /// Gray images keep their channel value. 8-bit color images keep R when
    /// every pixel is gray, otherwise every pixel is packed as `R<<16|G<<8|B`.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let values: Vec<u32> = match image {
            DynamicImage::ImageLuma8(buf) => buf.pixels().map(|p| u32::from(p.0[0])).collect(),
            DynamicImage::ImageLumaA8(buf) => buf.pixels().map(|p| u32::from(p.0[0])).collect(),
            DynamicImage::ImageLuma16(buf) => buf.pixels().map(|p| u32::from(p.0[0])).collect(),
            DynamicImage::ImageLumaA16(buf) => buf.pixels().map(|p| u32::from(p.0[0])).collect(),
            DynamicImage::ImageRgb8(buf) => rgb_labels(buf.pixels().map(|p| p.0).collect()),
            DynamicImage::ImageRgba8(buf) => {
                rgb_labels(buf.pixels().map(|p| [p.0[0], p.0[1], p.0[2]]).collect())
            }
            other => other
                .to_luma16()
                .pixels()
                .map(|p| u32::from(p.0[0]))
                .collect(),
        };
        let labels = Array2::from_shape_vec((height as usize, width as usize), values)?;
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &Array2<u32> {
        &self.labels
    }

    pub fn height(&self) -> usize {
        self.labels.nrows()
    }

    pub fn width(&self) -> usize {
        self.labels.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.labels.get((row, col)).copied()
    }

    /// Largest label present in the grid.
    pub fn max_label(&self) -> Result<u32> {
        self.labels
            .iter()
            .copied()
            .max()
            .ok_or(ColormapError::EmptyInput {
                rows: self.height(),
                cols: self.width(),
            })
    }

    /// Number of different label values present.
    pub fn distinct_labels(&self) -> usize {
        self.labels.iter().copied().collect::<HashSet<u32>>().len()
    }
}

fn rgb_labels(pixels: Vec<[u8; 3]>) -> Vec<u32> {
    let grey = pixels.iter().all(|&[r, g, b]| r == g && g == b);
    if grey {
        pixels.into_iter().map(|[r, _, _]| u32::from(r)).collect()
    } else {
        pixels
            .into_iter()
            .map(|[r, g, b]| (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
            .collect()
    }
}
