//! Unit tests for the conversion core.
//!
//! These tests verify the core algorithms:
//! - Luminance and glyph selection
//! - Per-mode color annotation
//! - Nearest-neighbor sampling through full band execution
//! - Grid planning

use glyph_grid::convert::*;
use glyph_grid::engine::{execute, Execution, ProgressEvent};
use glyph_grid::settings::JobPlan;

const SCENARIO_PIXELS: [Rgba; 4] = [
    Rgba::new(0, 0, 0, 255),
    Rgba::new(255, 255, 255, 255),
    Rgba::new(128, 128, 128, 255),
    Rgba::new(255, 0, 0, 255),
];

fn run(buffer: &PixelBuffer, grid: GridSpec, palette: Palette, mode: ColorMode) -> ConversionResult {
    let plan = JobPlan {
        palette,
        grid,
        color_mode: mode,
    };
    match execute(buffer, &plan, &mut |_: ProgressEvent| {}).unwrap() {
        Execution::Complete(result) => result,
        other => panic!("Expected Complete, got {:?}", other),
    }
}

fn scenario(mode: ColorMode, pixels: &[Rgba]) -> ConversionResult {
    let buffer = PixelBuffer::from_pixels(2, 2, pixels).unwrap();
    run(&buffer, GridSpec::new(2, 2), Palette::basic(), mode)
}

fn glyph_rows(result: &ConversionResult) -> Vec<String> {
    result.to_plain_text().lines().map(String::from).collect()
}

// ==================== Concrete Scenarios ====================

#[test]
fn test_scenario_blackwhite() {
    let result = scenario(ColorMode::BlackWhite, &SCENARIO_PIXELS);
    // Row 0: black -> '.', white -> '@'
    // Row 1: gray 128 is not above the threshold, red is 76 -> both '.'
    assert_eq!(glyph_rows(&result), vec![".@", ".."]);
    assert!(result.cells().all(|c| c.color.is_none()));
}

#[test]
fn test_scenario_grayscale() {
    let result = scenario(ColorMode::Grayscale, &SCENARIO_PIXELS);
    // 128 -> floor(128/255*7) = 3 -> ';', red 76.245 -> 2 -> ':'
    assert_eq!(glyph_rows(&result), vec![".@", ";:"]);
    let grays: Vec<u8> = result.cells().map(|c| c.color.unwrap().r).collect();
    assert_eq!(grays, vec![0, 255, 128, 76]);
}

#[test]
fn test_scenario_color_transparent_cell() {
    let mut pixels = SCENARIO_PIXELS;
    pixels[3].a = 0;
    let result = scenario(ColorMode::Color, &pixels);

    assert_eq!(result.cell(0, 0), Some(&RenderCell::colored('.', Rgb::new(0, 0, 0))));
    assert_eq!(
        result.cell(1, 0),
        Some(&RenderCell::colored('@', Rgb::new(255, 255, 255)))
    );
    assert_eq!(
        result.cell(0, 1),
        Some(&RenderCell::colored(';', Rgb::new(128, 128, 128)))
    );
    // Only the transparent cell loses its annotation
    assert_eq!(result.cell(1, 1), Some(&RenderCell::plain('.')));
}

// ==================== Alpha Handling Per Mode ====================

#[test]
fn test_alpha_asymmetry_between_modes() {
    // Half-transparent white and fully transparent white
    let pixels = [
        Rgba::new(255, 255, 255, 128),
        Rgba::new(255, 255, 255, 0),
        Rgba::new(255, 255, 255, 255),
        Rgba::new(0, 0, 0, 0),
    ];

    let color = scenario(ColorMode::Color, &pixels);
    assert_eq!(
        color.cell(0, 0),
        Some(&RenderCell::colored(';', Rgb::new(255, 255, 255)))
    );
    assert_eq!(color.cell(1, 0), Some(&RenderCell::plain('.')));
    assert_eq!(color.cell(1, 1), Some(&RenderCell::plain('.')));

    let gray = scenario(ColorMode::Grayscale, &pixels);
    assert_eq!(gray.cell(0, 0), Some(&RenderCell::colored(';', Rgb::gray(128))));
    assert_eq!(gray.cell(1, 0), Some(&RenderCell::colored('.', Rgb::gray(0))));

    let bw = scenario(ColorMode::BlackWhite, &pixels);
    assert_eq!(bw.cell(0, 0), Some(&RenderCell::plain(';')));
    assert_eq!(bw.cell(1, 0), Some(&RenderCell::plain('.')));
}

// ==================== Glyph Selection Properties ====================

#[test]
fn test_glyph_index_in_range_and_monotonic_for_all_palettes() {
    let palettes = [
        Palette::basic(),
        Palette::extended(),
        Palette::custom("#").unwrap(),
        Palette::custom(" ░▒▓█").unwrap(),
    ];
    for palette in &palettes {
        let mut prev = 0;
        for l in 0..=255 {
            let idx = glyph_index(l as f64, palette.len());
            assert!(idx < palette.len());
            assert!(idx >= prev, "index fell at luminance {}", l);
            prev = idx;
        }
        assert_eq!(glyph_index(0.0, palette.len()), 0);
        assert_eq!(glyph_index(255.0, palette.len()), palette.len() - 1);
    }
}

#[test]
fn test_single_glyph_palette() {
    let buffer = PixelBuffer::from_pixels(2, 2, &SCENARIO_PIXELS).unwrap();
    let result = run(
        &buffer,
        GridSpec::new(2, 2),
        Palette::custom("x").unwrap(),
        ColorMode::Grayscale,
    );
    assert_eq!(result.to_plain_text(), "xx\nxx");
}

#[test]
fn test_grayscale_triplets_equal_on_gradient() {
    let mut data = Vec::new();
    for y in 0..32u32 {
        for x in 0..32u32 {
            data.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, 200, (x * 8 + 7) as u8]);
        }
    }
    let buffer = PixelBuffer::new(32, 32, data).unwrap();
    let result = run(&buffer, GridSpec::new(20, 12), Palette::extended(), ColorMode::Grayscale);
    for cell in result.cells() {
        let c = cell.color.expect("grayscale cells are always annotated");
        assert!(c.r == c.g && c.g == c.b);
    }
}

// ==================== Sampling Through Execution ====================

#[test]
fn test_upscaled_output_repeats_source() {
    let buffer = PixelBuffer::from_pixels(2, 2, &SCENARIO_PIXELS).unwrap();
    let result = run(&buffer, GridSpec::new(4, 4), Palette::basic(), ColorMode::BlackWhite);
    assert_eq!(glyph_rows(&result), vec!["..@@", "..@@", "....", "...."]);
}

#[test]
fn test_downscaled_output_picks_top_left_of_block() {
    // 4x4 source where only the top-left pixel of each 2x2 block is white
    let mut pixels = Vec::new();
    for y in 0..4 {
        for x in 0..4 {
            let v = if x % 2 == 0 && y % 2 == 0 { 255 } else { 0 };
            pixels.push(Rgba::new(v, v, v, 255));
        }
    }
    let buffer = PixelBuffer::from_pixels(4, 4, &pixels).unwrap();
    let result = run(&buffer, GridSpec::new(2, 2), Palette::basic(), ColorMode::BlackWhite);
    assert_eq!(glyph_rows(&result), vec!["@@", "@@"]);
}

// ==================== Grid Planning ====================

#[test]
fn test_custom_grid_round_trip() {
    for (w, h) in [(10, 10), (10, 500), (500, 10), (137, 61)] {
        let grid = plan_grid(SizePreset::Custom, w, h, None).unwrap();
        assert_eq!(grid, GridSpec::new(w, h));
    }
}

#[test]
fn test_preset_grids_stay_in_bounds() {
    let sources = [(1, 1), (640, 480), (1920, 1080), (1080, 1920), (5000, 3), (3, 5000)];
    for preset in [SizePreset::Small, SizePreset::Medium, SizePreset::Large] {
        for (w, h) in sources {
            let grid = plan_grid(preset, 0, 0, Some((w, h))).unwrap();
            assert!((PRESET_MIN..=PRESET_MAX_WIDTH).contains(&grid.width), "{:?}", grid);
            assert!((PRESET_MIN..=PRESET_MAX_HEIGHT).contains(&grid.height), "{:?}", grid);
        }
    }
}
