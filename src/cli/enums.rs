//! CLI enum types for palette, size, color mode and output format options.

use clap::ValueEnum;

use crate::config::OutputFormat;
use crate::convert::{ColorMode, SizePreset};
use crate::settings::CharacterSet;

/// Glyph palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Charset {
    Basic,
    Extended,
    Custom,
}

impl From<Charset> for CharacterSet {
    fn from(c: Charset) -> Self {
        match c {
            Charset::Basic => CharacterSet::Basic,
            Charset::Extended => CharacterSet::Extended,
            Charset::Custom => CharacterSet::Custom,
        }
    }
}

/// Output grid size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Size {
    Small,
    Medium,
    Large,
    Custom,
}

impl From<Size> for SizePreset {
    fn from(s: Size) -> Self {
        match s {
            Size::Small => SizePreset::Small,
            Size::Medium => SizePreset::Medium,
            Size::Large => SizePreset::Large,
            Size::Custom => SizePreset::Custom,
        }
    }
}

/// Cell coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Color,
    Grayscale,
    #[value(name = "blackwhite", alias = "bw")]
    BlackWhite,
}

impl From<Mode> for ColorMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Color => ColorMode::Color,
            Mode::Grayscale => ColorMode::Grayscale,
            Mode::BlackWhite => ColorMode::BlackWhite,
        }
    }
}

/// Result rendering printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Markup,
    Ansi,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Markup => OutputFormat::Markup,
            Format::Ansi => OutputFormat::Ansi,
            Format::Json => OutputFormat::Json,
        }
    }
}
