pub mod colormap;
pub mod error;
pub mod grid;
pub mod render;
pub mod segment;

pub use colormap::{Color, ColorTable, RGB};
pub use error::{ColormapError, Result};
pub use grid::LabelGrid;
pub use render::{Legend, RenderContext, png_data_uri};
