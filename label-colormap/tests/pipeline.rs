use image::{GrayImage, ImageBuffer, Luma};
use label_colormap::{ColorTable, ColormapError, LabelGrid, Legend, RenderContext, segment};
use ndarray::{Array2, array};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn render(grid: &LabelGrid, table: &ColorTable, legend: Legend) -> RenderContext {
    RenderContext::new(legend)
        .render(grid, table)
        .expect("render should succeed")
}

#[test]
fn scenario_two_by_two_uses_expected_entries() {
    let grid = LabelGrid::new(array![[0, 1], [1, 2]]);
    let max = grid.max_label().expect("grid is not empty");
    assert_eq!(max, 2);

    let table = ColorTable::random(max, &mut StdRng::seed_from_u64(11));
    assert_eq!(table.len(), 3);

    let ctx = render(&grid, &table, Legend::Hidden);
    let entry = |label| table.rgb(label).map(|c| c.to_array());
    assert_eq!(ctx.pixel(0, 0), entry(0));
    assert_eq!(ctx.pixel(1, 0), entry(1));
    assert_eq!(ctx.pixel(0, 1), entry(1));
    assert_eq!(ctx.pixel(1, 1), entry(2));
}

#[test]
fn all_zero_grid_is_single_color() {
    let grid = LabelGrid::new(Array2::zeros((6, 9)));
    let max = grid.max_label().unwrap();
    let table = ColorTable::random(max, &mut StdRng::seed_from_u64(5));
    assert_eq!(table.len(), 1);

    let ctx = render(&grid, &table, Legend::Hidden);
    let first = &ctx.pixels()[..3];
    assert!(ctx.pixels().chunks_exact(3).all(|px| px == first));
}

#[test]
fn rendering_twice_is_identical() {
    let grid =
        LabelGrid::new(Array2::from_shape_fn((48, 80), |(r, c)| ((r / 8) * 10 + c / 8) as u32));
    let table = ColorTable::random(grid.max_label().unwrap(), &mut StdRng::seed_from_u64(9));
    let a = render(&grid, &table, Legend::Overlay);
    let b = render(&grid, &table, Legend::Overlay);
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn output_file_matches_grid_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("labels.png");
    let grid = LabelGrid::new(Array2::from_shape_fn((37, 53), |(r, c)| ((r + c) % 4) as u32));
    let table = ColorTable::random(3, &mut StdRng::seed_from_u64(1));

    render(&grid, &table, Legend::Overlay).save(&out).unwrap();

    let saved = image::open(&out).unwrap();
    assert_eq!((saved.width(), saved.height()), (53, 37));
}

#[test]
fn saved_png_round_trips_colors() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("figure.png");
    let grid = LabelGrid::new(array![[0, 1, 2], [2, 1, 0]]);
    let table = ColorTable::random(2, &mut StdRng::seed_from_u64(21));
    let ctx = render(&grid, &table, Legend::Hidden);
    ctx.save(&out).unwrap();

    let saved = image::open(&out).unwrap().to_rgb8();
    assert_eq!(saved.as_raw().as_slice(), ctx.pixels());
}

#[test]
fn mismatched_table_is_rejected() {
    let grid = LabelGrid::new(array![[0, 4]]);
    let table = ColorTable::random(2, &mut StdRng::seed_from_u64(0));
    let err = RenderContext::new(Legend::Hidden).render(&grid, &table).unwrap_err();
    assert!(matches!(
        err,
        ColormapError::ColorTableMismatch { expected: 5, actual: 3 }
    ));
}

#[test]
fn missing_input_is_load_error_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("does-not-exist.tif");
    let out = dir.path().join("out.png");

    let err = LabelGrid::load(&input).unwrap_err();
    assert!(matches!(err, ColormapError::Load { .. }));
    assert!(!out.exists());
}

#[test]
fn undecodable_input_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("garbage.png");
    std::fs::write(&input, b"not an image at all").unwrap();
    assert!(matches!(
        LabelGrid::load(&input),
        Err(ColormapError::Load { .. })
    ));
}

#[test]
fn unwritable_output_is_save_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing-dir").join("out.png");
    let grid = LabelGrid::new(array![[0, 1]]);
    let table = ColorTable::random(1, &mut StdRng::seed_from_u64(2));
    let err = render(&grid, &table, Legend::Hidden).save(&out).unwrap_err();
    assert!(matches!(err, ColormapError::Save { .. }));
}

#[test]
fn load_reads_labels_from_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("seg.png");
    let img: GrayImage = ImageBuffer::from_fn(4, 3, |x, y| Luma([(x * y) as u8]));
    img.save(&input).unwrap();

    let grid = LabelGrid::load(&input).unwrap();
    assert_eq!((grid.height(), grid.width()), (3, 4));
    assert_eq!(grid.max_label().unwrap(), 6);
}

#[test]
fn segmented_file_feeds_the_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("intensity.png");
    let img: GrayImage =
        ImageBuffer::from_fn(8, 4, |x, _| Luma([if x < 4 { 20 } else { 220 }]));
    img.save(&input).unwrap();

    let gray = segment::load_grayscale(&input).unwrap();
    let grid = segment::segment(&gray, 10.0, 1);
    assert_eq!(grid.max_label().unwrap(), 2);

    let table = ColorTable::random(2, &mut StdRng::seed_from_u64(8));
    let ctx = render(&grid, &table, Legend::Hidden);
    assert_eq!(ctx.size(), (8, 4));
    assert_eq!(ctx.pixel(0, 0), table.rgb(1).map(|c| c.to_array()));
    assert_eq!(ctx.pixel(7, 3), table.rgb(2).map(|c| c.to_array()));
}
