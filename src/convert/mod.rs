//! Conversion core: turns RGBA pixels into a glyph grid.
//!
//! 1. **Palette** - ordered glyphs, dark to bright
//! 2. **Luminance** - RGB to brightness using BT.601, dimmed by alpha
//! 3. **Dimensions** - output grid from presets or custom sizes
//! 4. **Sampling** - nearest-neighbor cell to source pixel mapping
//! 5. **Rendering** - brightness to glyph with optional color
//!
//! Both the inline [`crate::engine::convert`] path and the background worker
//! call into this module; nothing here is duplicated per execution context.

mod dimensions;
mod luminance;
mod output;
mod palette;
mod render;
mod sampler;

pub use dimensions::{
    aspect_grid, clamp_custom, plan_grid, GridSpec, SizePreset, CHAR_ASPECT_CORRECTION,
    CUSTOM_MAX, CUSTOM_MIN, PRESET_MAX_HEIGHT, PRESET_MAX_WIDTH, PRESET_MIN,
};
pub use luminance::{apply_alpha, luminance, mode_luminance, BLACKWHITE_THRESHOLD};
pub use output::ConversionResult;
pub use palette::{Palette, BASIC_CHARSET, EXTENDED_CHARSET};
pub use render::{glyph_index, render_cell, ColorMode, RenderCell, Rgb};
pub use sampler::{
    optimized_dimensions, sample, PixelBuffer, Rgba, BYTES_PER_PIXEL,
    DEFAULT_MAX_SOURCE_DIMENSION,
};
