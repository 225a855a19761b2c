//! Luminance to glyph mapping and per-mode color annotation.

use serde::{Deserialize, Serialize};

use super::luminance::mode_luminance;
use super::palette::Palette;
use super::sampler::Rgba;

/// How cells are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Glyph plus the sampled source color
    #[default]
    Color,
    /// Glyph plus a gray of the cell's luminance
    Grayscale,
    /// Binarized glyphs, no color
    #[serde(rename = "blackwhite")]
    BlackWhite,
}

impl ColorMode {
    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Color => "color",
            ColorMode::Grayscale => "grayscale",
            ColorMode::BlackWhite => "blackwhite",
        }
    }
}

/// Color attached to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// One output cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderCell {
    pub glyph: char,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<Rgb>,
}

impl RenderCell {
    pub const fn plain(glyph: char) -> Self {
        Self { glyph, color: None }
    }

    pub const fn colored(glyph: char, color: Rgb) -> Self {
        Self {
            glyph,
            color: Some(color),
        }
    }
}

/// Palette index for a luminance value.
///
/// `floor(clamp(l, 0, 255) / 255 * (len - 1))`, always in `[0, len - 1]` and
/// non-decreasing in `l`. NaN is treated as 0.
pub fn glyph_index(luminance: f64, palette_len: usize) -> usize {
    if palette_len <= 1 {
        return 0;
    }
    let l = if luminance.is_nan() {
        0.0
    } else {
        luminance.clamp(0.0, 255.0)
    };
    let idx = ((l / 255.0) * (palette_len - 1) as f64).floor() as usize;
    idx.min(palette_len - 1)
}

/// Render one sampled pixel to a cell.
///
/// - `BlackWhite`: bare glyph.
/// - `Grayscale`: glyph plus `(g, g, g)` with `g = round(luminance)`, for
///   every pixel including fully transparent ones.
/// - `Color`: glyph plus the source RGB when alpha > 0, bare glyph otherwise.
pub fn render_cell(pixel: Rgba, palette: &Palette, mode: ColorMode) -> RenderCell {
    let lum = mode_luminance(mode, pixel.r, pixel.g, pixel.b, pixel.a);
    let glyph = palette.glyph(glyph_index(lum, palette.len()));

    match mode {
        ColorMode::BlackWhite => RenderCell::plain(glyph),
        ColorMode::Grayscale => {
            let g = lum.round().clamp(0.0, 255.0) as u8;
            RenderCell::colored(glyph, Rgb::gray(g))
        }
        ColorMode::Color if pixel.a > 0 => {
            RenderCell::colored(glyph, Rgb::new(pixel.r, pixel.g, pixel.b))
        }
        ColorMode::Color => RenderCell::plain(glyph),
    }
}
