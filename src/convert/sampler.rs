//! Source pixel storage and nearest-neighbor sampling.

use super::dimensions::GridSpec;
use crate::error::ConvertError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Largest source side accepted before pre-scaling.
pub const DEFAULT_MAX_SOURCE_DIMENSION: u32 = 1920;

/// A single sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A decoded RGBA image.
///
/// The buffer is read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap row-major RGBA bytes.
    ///
    /// # Errors
    /// * `ConvertError::Input` - If the image has zero area or `data` is not
    ///   exactly `width * height * 4` bytes long
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::input(format!(
                "source image has zero area ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(ConvertError::input(format!(
                "expected {} bytes of RGBA data for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from a list of pixels in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgba]) -> Result<Self, ConvertError> {
        let data = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Read the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.data.get(idx..idx + BYTES_PER_PIXEL)?;
        Some(Rgba::new(px[0], px[1], px[2], px[3]))
    }
}

/// Scale `(width, height)` so the larger side is at most `max_size`.
///
/// # Returns
/// `(width, height, was_resized)`. Sides never drop below 1.
pub fn optimized_dimensions(width: u32, height: u32, max_size: u32) -> (u32, u32, bool) {
    let largest = width.max(height);
    if largest <= max_size || max_size == 0 {
        return (width, height, false);
    }
    let scale = max_size as f64 / largest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h, true)
}

/// Nearest-neighbor source coordinates for output cell `(x, y)`.
///
/// Computes `floor(x * source_width / output_width)` in integer math, which
/// is exact and always below the source width for `x < output_width`.
#[inline]
fn source_coords(buffer: &PixelBuffer, grid: GridSpec, x: u32, y: u32) -> (u32, u32) {
    let sx = (x as u64 * buffer.width as u64 / grid.width as u64) as u32;
    let sy = (y as u64 * buffer.height as u64 / grid.height as u64) as u32;
    (sx, sy)
}

/// Sample the source pixel for output cell `(x, y)`.
///
/// No interpolation: each cell reads exactly one source pixel.
///
/// # Errors
/// * `ConvertError::Internal` - If the cell or its source pixel is out of range
pub fn sample(buffer: &PixelBuffer, grid: GridSpec, x: u32, y: u32) -> Result<Rgba, ConvertError> {
    if grid.width == 0 || grid.height == 0 || x >= grid.width || y >= grid.height {
        return Err(ConvertError::internal(format!(
            "cell ({}, {}) outside {} grid",
            x, y, grid
        )));
    }
    let (sx, sy) = source_coords(buffer, grid, x, y);
    buffer.pixel(sx, sy).ok_or_else(|| {
        ConvertError::internal(format!(
            "sample ({}, {}) outside {}x{} source",
            sx, sy, buffer.width, buffer.height
        ))
    })
}
