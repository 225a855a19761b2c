//! Conversion settings and their validation.
//!
//! Settings arrive as a plain, serializable value. [`ConversionSettings::resolve`]
//! validates them once and produces the immutable [`JobPlan`] a job runs with.

use serde::{Deserialize, Serialize};

use crate::convert::{
    plan_grid, ColorMode, GridSpec, Palette, SizePreset, CUSTOM_MAX, CUSTOM_MIN,
};
use crate::error::ConvertError;

/// Palette selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSet {
    #[default]
    Basic,
    Extended,
    Custom,
}

impl CharacterSet {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterSet::Basic => "basic",
            CharacterSet::Extended => "extended",
            CharacterSet::Custom => "custom",
        }
    }
}

/// Caller-supplied options for one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub character_set: CharacterSet,
    pub custom_characters: String,
    pub size: SizePreset,
    pub custom_width: u32,
    pub custom_height: u32,
    pub color_mode: ColorMode,
    /// Source dimensions, used only to derive preset grids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            character_set: CharacterSet::Basic,
            custom_characters: String::new(),
            size: SizePreset::Medium,
            custom_width: 100,
            custom_height: 50,
            color_mode: ColorMode::Color,
            image_width: None,
            image_height: None,
        }
    }
}

impl ConversionSettings {
    /// Record the source dimensions for aspect-aware preset planning.
    pub fn with_source_dimensions(mut self, width: u32, height: u32) -> Self {
        self.image_width = Some(width);
        self.image_height = Some(height);
        self
    }

    /// Source dimensions if both are known.
    pub fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.image_width.zip(self.image_height)
    }

    /// Select the palette.
    ///
    /// # Errors
    /// * `ConvertError::Validation` - If a custom palette is empty or blank
    pub fn palette(&self) -> Result<Palette, ConvertError> {
        match self.character_set {
            CharacterSet::Basic => Ok(Palette::basic()),
            CharacterSet::Extended => Ok(Palette::extended()),
            CharacterSet::Custom => Palette::custom(&self.custom_characters),
        }
    }

    /// Plan the output grid.
    pub fn grid(&self) -> Result<GridSpec, ConvertError> {
        plan_grid(
            self.size,
            self.custom_width,
            self.custom_height,
            self.source_dimensions(),
        )
    }

    /// Validate and freeze the settings into a job plan.
    ///
    /// # Errors
    /// * `ConvertError::Validation` - With every problem found
    /// * `ConvertError::Input` - If the source dimensions are degenerate
    pub fn resolve(&self) -> Result<JobPlan, ConvertError> {
        let reasons = validate_settings(self);
        if !reasons.is_empty() {
            return Err(ConvertError::Validation { reasons });
        }
        Ok(JobPlan {
            palette: self.palette()?,
            grid: self.grid()?,
            color_mode: self.color_mode,
        })
    }
}

/// Collect every problem with `settings`; empty when they are usable.
pub fn validate_settings(settings: &ConversionSettings) -> Vec<String> {
    let mut errors = Vec::new();

    if settings.character_set == CharacterSet::Custom
        && settings.custom_characters.trim().is_empty()
    {
        errors.push("Custom character set cannot be empty".to_string());
    }

    if settings.size == SizePreset::Custom {
        let range = CUSTOM_MIN..=CUSTOM_MAX;
        if !range.contains(&settings.custom_width) {
            errors.push(format!(
                "Custom width must be between {} and {}",
                CUSTOM_MIN, CUSTOM_MAX
            ));
        }
        if !range.contains(&settings.custom_height) {
            errors.push(format!(
                "Custom height must be between {} and {}",
                CUSTOM_MIN, CUSTOM_MAX
            ));
        }
    }

    errors
}

/// Validated, immutable parameters for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlan {
    pub palette: Palette,
    pub grid: GridSpec,
    pub color_mode: ColorMode,
}
