use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColormapError {
    #[error("Failed to load label image {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Label grid is empty ({rows}x{cols}), there is no maximum label")]
    EmptyInput { rows: usize, cols: usize },

    #[error("Color table has {actual} entries but the labels need {expected}")]
    ColorTableMismatch { expected: usize, actual: usize },

    #[error("Failed to save figure to {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to draw legend: {0}")]
    Draw(String),

    #[error("Failed to encode figure as PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ColormapError>;
