//! Pixel to brightness conversion using the ITU-R BT.601 luminance formula.

use super::render::ColorMode;

/// Luminance above this value binarizes to white in black & white mode.
pub const BLACKWHITE_THRESHOLD: f64 = 128.0;

/// Compute perceptual luminance in `[0, 255]`.
///
/// Y = 0.299*R + 0.587*G + 0.114*B
///
/// The weighted sum is accumulated in integers (coefficients scaled by 1000)
/// and divided once, so white maps to exactly 255.0.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let sum = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    sum as f64 / 1000.0
}

/// Scale luminance by alpha coverage.
///
/// Partially transparent pixels fade toward the darkest glyph.
#[inline]
pub fn apply_alpha(luminance: f64, a: u8) -> f64 {
    if a < 255 {
        luminance * (a as f64 / 255.0)
    } else {
        luminance
    }
}

/// Luminance after the color mode transform and alpha dampening.
pub fn mode_luminance(mode: ColorMode, r: u8, g: u8, b: u8, a: u8) -> f64 {
    let raw = luminance(r, g, b);
    let shaped = match mode {
        ColorMode::Color | ColorMode::Grayscale => raw,
        ColorMode::BlackWhite => {
            if raw > BLACKWHITE_THRESHOLD {
                255.0
            } else {
                0.0
            }
        }
    };
    apply_alpha(shaped, a)
}
