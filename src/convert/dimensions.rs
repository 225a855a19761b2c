//! Output grid planning with aspect-ratio correction.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Character cells are about 1.5x taller than wide, so a source row maps to
/// fewer grid rows than columns.
pub const CHAR_ASPECT_CORRECTION: f64 = 1.5;

/// Bounds for caller-specified custom grids.
pub const CUSTOM_MIN: u32 = 10;
pub const CUSTOM_MAX: u32 = 500;

/// Bounds for aspect-derived preset grids.
pub const PRESET_MIN: u32 = 10;
pub const PRESET_MAX_WIDTH: u32 = 300;
pub const PRESET_MAX_HEIGHT: u32 = 200;

/// Size of the output glyph grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
}

impl GridSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl std::fmt::Display for GridSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    #[default]
    Medium,
    Large,
    Custom,
}

impl SizePreset {
    /// Grid used when the source dimensions are unknown.
    ///
    /// Returns `None` for `Custom`, which has no fixed size.
    pub fn static_grid(&self) -> Option<GridSpec> {
        match self {
            SizePreset::Small => Some(GridSpec::new(80, 60)),
            SizePreset::Medium => Some(GridSpec::new(120, 90)),
            SizePreset::Large => Some(GridSpec::new(200, 150)),
            SizePreset::Custom => None,
        }
    }

    /// Row count targeted when deriving a grid from the source aspect ratio.
    ///
    /// Chosen so a 4:3 source gets the same width as the static table.
    pub fn target_height(&self) -> Option<u32> {
        match self {
            SizePreset::Small => Some(40),
            SizePreset::Medium => Some(60),
            SizePreset::Large => Some(100),
            SizePreset::Custom => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizePreset::Small => "small",
            SizePreset::Medium => "medium",
            SizePreset::Large => "large",
            SizePreset::Custom => "custom",
        }
    }
}

/// Clamp a custom grid to `[CUSTOM_MIN, CUSTOM_MAX]` on each axis.
pub fn clamp_custom(width: u32, height: u32) -> GridSpec {
    GridSpec::new(
        width.clamp(CUSTOM_MIN, CUSTOM_MAX),
        height.clamp(CUSTOM_MIN, CUSTOM_MAX),
    )
}

/// Derive a preset grid from the source aspect ratio.
///
/// The width follows from the preset's target height, the source aspect
/// ratio and [`CHAR_ASPECT_CORRECTION`]. When the width has to be clamped the
/// height is recomputed from the clamped width so the displayed aspect ratio
/// stays as close as the bounds allow.
///
/// # Errors
/// * `ConvertError::Input` - If either source dimension is zero
pub fn aspect_grid(
    target_height: u32,
    source_width: u32,
    source_height: u32,
) -> Result<GridSpec, ConvertError> {
    if source_width == 0 || source_height == 0 {
        return Err(ConvertError::input(format!(
            "source image has zero area ({}x{})",
            source_width, source_height
        )));
    }

    let source_aspect = source_width as f64 / source_height as f64;
    // Width:height ratio in cells
    let cell_aspect = source_aspect * CHAR_ASPECT_CORRECTION;

    let ideal_width = (target_height as f64 * cell_aspect).round();
    let width = clamp_f64(ideal_width, PRESET_MIN, PRESET_MAX_WIDTH);

    let height = if width as f64 != ideal_width {
        (width as f64 / cell_aspect).round()
    } else {
        target_height as f64
    };
    let height = clamp_f64(height, PRESET_MIN, PRESET_MAX_HEIGHT);

    Ok(GridSpec::new(width, height))
}

/// Plan the output grid for a size selector.
///
/// # Arguments
/// * `size` - Size selector
/// * `custom_width` / `custom_height` - Used only for `SizePreset::Custom`
/// * `source` - Source image `(width, height)` if known
pub fn plan_grid(
    size: SizePreset,
    custom_width: u32,
    custom_height: u32,
    source: Option<(u32, u32)>,
) -> Result<GridSpec, ConvertError> {
    match (size.target_height(), size.static_grid(), source) {
        (None, _, _) => Ok(clamp_custom(custom_width, custom_height)),
        (Some(target), _, Some((w, h))) => aspect_grid(target, w, h),
        (Some(_), Some(grid), None) => Ok(grid),
        (Some(_), None, None) => Err(ConvertError::internal(format!(
            "size preset '{}' has no static grid",
            size.name()
        ))),
    }
}

fn clamp_f64(value: f64, min: u32, max: u32) -> u32 {
    value.clamp(min as f64, max as f64) as u32
}
