use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use label_colormap::{ColorTable, LabelGrid, Legend, RenderContext, segment};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[cfg(feature = "viewer")]
mod viewer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LegendArg {
    Overlay,
    Panel,
    Hidden,
}

impl From<LegendArg> for Legend {
    fn from(arg: LegendArg) -> Self {
        match arg {
            LegendArg::Overlay => Legend::Overlay,
            LegendArg::Panel => Legend::Panel,
            LegendArg::Hidden => Legend::Hidden,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "scramble",
    version,
    about = "Color a segmentation label image with a random colormap"
)]
struct Cli {
    /// Segmentation image whose pixel values are region labels
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Figure to write; the format follows the extension
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Seed for the random colors (reproducible output)
    #[arg(long)]
    seed: Option<u64>,

    /// Colorbar placement
    #[arg(long, value_enum, default_value_t = LegendArg::Overlay)]
    legend: LegendArg,

    /// Label INPUT by region growing with this intensity threshold first
    #[arg(long, value_name = "THRESHOLD")]
    segment: Option<f64>,

    /// Smallest region kept by --segment; smaller ones become label 0
    #[arg(long, default_value_t = 1, requires = "segment")]
    min_region: usize,

    /// Show the input and the figure in a window after saving
    #[arg(long)]
    show: bool,
}

fn load_labels(cli: &Cli) -> Result<LabelGrid> {
    match cli.segment {
        Some(threshold) => {
            let gray = segment::load_grayscale(&cli.input)?;
            Ok(segment::segment(&gray, threshold, cli.min_region))
        }
        None => Ok(LabelGrid::load(&cli.input)?),
    }
}

fn color_source(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!("Seeding colors with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

fn run(cli: &Cli) -> Result<RenderContext> {
    let grid = load_labels(cli)
        .with_context(|| format!("Could not read labels from {}", cli.input.display()))?;
    let max_label = grid.max_label()?;
    info!(
        "Max label {max_label}, {} distinct labels",
        grid.distinct_labels()
    );

    let table = ColorTable::random(max_label, &mut color_source(cli.seed));
    let figure = RenderContext::new(cli.legend.into()).render(&grid, &table)?;
    figure
        .save(&cli.output)
        .with_context(|| format!("Could not write {}", cli.output.display()))?;
    Ok(figure)
}

#[cfg(feature = "viewer")]
fn show(input: &Path, figure: &RenderContext) -> Result<()> {
    let preview = image::open(input)
        .with_context(|| format!("Could not preview {}", input.display()))?
        .to_rgb8();
    let panels = vec![
        viewer::Panel {
            title: input.display().to_string(),
            src: label_colormap::png_data_uri(
                preview.width(),
                preview.height(),
                preview.as_raw(),
            )?,
        },
        viewer::Panel {
            title: "labels".to_string(),
            src: figure.to_data_uri()?,
        },
    ];
    viewer::show("Label Colormap", panels);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn show(_input: &Path, _figure: &RenderContext) -> Result<()> {
    log::warn!("--show needs the `viewer` feature; the figure was only written to disk");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("{cli:?}");

    let figure = run(&cli)?;
    if cli.show {
        show(&cli.input, &figure)?;
    }
    Ok(())
}
