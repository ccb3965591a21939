use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::{debug, info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use rayon::prelude::*;

use crate::colormap::ColorTable;
use crate::error::{ColormapError, Result};
use crate::grid::LabelGrid;

pub type FigureDrawingArea<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const OVERLAY_MIN_WIDTH: u32 = 32;
const OVERLAY_MIN_HEIGHT: u32 = 16;
const PANEL_WIDTH: u32 = 96;
const PANEL_MIN_HEIGHT: u32 = 160;
const PANEL_MAX_TICKS: usize = 11;

/// Where the colorbar goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Legend {
    /// Drawn inside the right edge of the labels; keeps the grid's size.
    #[default]
    Overlay,
    /// Drawn with tick labels in a panel added to the right.
    Panel,
    Hidden,
}

/// Owns the figure buffer. Consumed by [`RenderContext::render`] and handed
/// back holding the drawn figure.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    legend: Legend,
    size: (u32, u32),
    buffer: Vec<u8>,
}

impl RenderContext {
    pub fn new(legend: Legend) -> Self {
        Self {
            legend,
            size: (0, 0),
            buffer: Vec::new(),
        }
    }

    pub fn legend(&self) -> Legend {
        self.legend
    }

    /// Figure size as `(width, height)`, `(0, 0)` before rendering.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Row-major RGB8 figure bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let (width, height) = self.size;
        if x >= width || y >= height {
            return None;
        }
        let offset = (y as usize * width as usize + x as usize) * 3;
        let px = self.buffer.get(offset..offset + 3)?;
        Some([px[0], px[1], px[2]])
    }

    pub fn render(mut self, grid: &LabelGrid, table: &ColorTable) -> Result<Self> {
        let max_label = grid.max_label()?;
        let expected = max_label as usize + 1;
        if table.len() != expected {
            return Err(ColormapError::ColorTableMismatch {
                expected,
                actual: table.len(),
            });
        }

        let (width, height) = (grid.width() as u32, grid.height() as u32);
        let (canvas_w, canvas_h) = match self.legend {
            Legend::Panel => (width + PANEL_WIDTH, height.max(PANEL_MIN_HEIGHT)),
            Legend::Overlay | Legend::Hidden => (width, height),
        };

        let mut buffer = vec![255u8; canvas_w as usize * canvas_h as usize * 3];
        paint_labels(&mut buffer, canvas_w as usize, grid, table);

        if self.legend != Legend::Hidden {
            let root = BitMapBackend::with_buffer(&mut buffer, (canvas_w, canvas_h))
                .into_drawing_area();
            match self.legend {
                Legend::Overlay => draw_overlay_legend(&root, (width, height), table)?,
                Legend::Panel => draw_panel_legend(&root, width, table)?,
                Legend::Hidden => {}
            }
            root.present().map_err(draw_error)?;
        }

        info!(
            "Rendered {} labels onto a {canvas_w}x{canvas_h} figure ({:?} legend)",
            table.len(),
            self.legend
        );
        self.size = (canvas_w, canvas_h);
        self.buffer = buffer;
        Ok(self)
    }

    /// Write the figure; the format follows the path's extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (width, height) = self.size;
        image::save_buffer(path, &self.buffer, width, height, ExtendedColorType::Rgb8).map_err(
            |source| ColormapError::Save {
                path: path.to_path_buf(),
                source,
            },
        )?;
        info!("Saved figure to {}", path.display());
        Ok(())
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(self.size.0, self.size.1, &self.buffer)
    }

    pub fn to_data_uri(&self) -> Result<String> {
        png_data_uri(self.size.0, self.size.1, &self.buffer)
    }
}

pub fn encode_png(width: u32, height: u32, rgb: &[u8]) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    let cursor = Cursor::new(&mut png_data);
    PngEncoder::new(cursor)
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(ColormapError::Encode)?;
    Ok(png_data)
}

/// `data:image/png;base64,...` for an RGB8 buffer.
pub fn png_data_uri(width: u32, height: u32, rgb: &[u8]) -> Result<String> {
    let png_data = encode_png(width, height, rgb)?;
    Ok(format!(
        "data:image/png;base64,{}",
        BASE64_STANDARD.encode(png_data)
    ))
}

fn paint_labels(buffer: &mut [u8], canvas_w: usize, grid: &LabelGrid, table: &ColorTable) {
    let row_stride = canvas_w * 3;
    let labels = grid.labels();
    buffer[..grid.height() * row_stride]
        .par_chunks_mut(row_stride)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, px) in out.chunks_exact_mut(3).take(grid.width()).enumerate() {
                // every label is <= max_label, so the lookup always hits
                if let Some(rgb) = table.rgb(labels[[row, col]]) {
                    px.copy_from_slice(&rgb.to_array());
                }
            }
        });
}

fn draw_overlay_legend(
    area: &FigureDrawingArea,
    (width, height): (u32, u32),
    table: &ColorTable,
) -> Result<()> {
    if width < OVERLAY_MIN_WIDTH || height < OVERLAY_MIN_HEIGHT {
        warn!(
            "Figure {width}x{height} is below {OVERLAY_MIN_WIDTH}x{OVERLAY_MIN_HEIGHT}, \
             skipping the overlaid legend"
        );
        return Ok(());
    }

    let bar_w = (width / 16).max(6) as i32;
    let margin = (width / 64).max(2) as i32;
    let x1 = width as i32 - margin;
    let x0 = x1 - bar_w;
    let (y0, y1) = (margin, height as i32 - margin);
    debug!("Overlay colorbar at x {x0}..{x1}, y {y0}..{y1}");

    let n = table.len() as i64;
    let span = i64::from(y1 - y0);
    for (label, color) in table.colors().iter().enumerate() {
        // label 0 at the bottom
        let top = i64::from(y1) - span * (label as i64 + 1) / n;
        let bottom = i64::from(y1) - span * label as i64 / n;
        if bottom <= top {
            continue;
        }
        let rgb = color.to_rgb();
        area.draw(&Rectangle::new(
            [(x0, top as i32), (x1 - 1, bottom as i32 - 1)],
            RGBColor(rgb.r, rgb.g, rgb.b).filled(),
        ))
        .map_err(draw_error)?;
    }

    area.draw(&Rectangle::new(
        [(x0 - 1, y0 - 1), (x1, y1)],
        BLACK.stroke_width(1),
    ))
    .map_err(draw_error)?;
    Ok(())
}

fn draw_panel_legend(root: &FigureDrawingArea, width: u32, table: &ColorTable) -> Result<()> {
    let (_, panel) = root.split_horizontally(width as i32);
    let n = table.len() as f64;

    let mut chart = ChartBuilder::on(&panel)
        .caption("label", ("sans-serif", 14).into_font())
        .margin(8)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..1f64, -0.5f64..(n - 0.5))
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(table.len().min(PANEL_MAX_TICKS))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(table.colors().iter().enumerate().map(|(label, color)| {
            let rgb = color.to_rgb();
            let y = label as f64;
            Rectangle::new(
                [(0.0, y - 0.5), (1.0, y + 0.5)],
                RGBColor(rgb.r, rgb.g, rgb.b).filled(),
            )
        }))
        .map_err(draw_error)?;
    Ok(())
}

fn draw_error(e: impl std::fmt::Display) -> ColormapError {
    ColormapError::Draw(e.to_string())
}
