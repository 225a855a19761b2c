//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Charset, Format, Mode, Size};
use crate::config::Config;
use crate::settings::ConversionSettings;

/// Convert images into glyph grids
#[derive(Parser, Debug)]
#[command(name = "glyph-grid")]
#[command(version, about = "Convert images into text glyph grids", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image and print the result
    Convert {
        /// Image file to convert
        image: PathBuf,

        #[command(flatten)]
        options: ConversionArgs,

        /// Output rendering
        #[arg(long, short)]
        format: Option<Format>,

        /// Do not draw progress on stderr
        #[arg(long)]
        no_progress: bool,
    },
    /// Show the planned grid and resource estimates without converting
    Estimate {
        /// Image file to inspect
        image: PathBuf,

        #[command(flatten)]
        options: ConversionArgs,
    },
    /// List built-in palettes
    Palettes,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Conversion options shared by `convert` and `estimate`.
///
/// Anything left unset falls back to the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConversionArgs {
    /// Glyph palette
    #[arg(long)]
    pub charset: Option<Charset>,

    /// Custom glyphs, darkest first (implies --charset custom)
    #[arg(long)]
    pub chars: Option<String>,

    /// Output size preset
    #[arg(long, short)]
    pub size: Option<Size>,

    /// Custom width in cells (implies --size custom)
    #[arg(long)]
    pub width: Option<u32>,

    /// Custom height in cells (implies --size custom)
    #[arg(long)]
    pub height: Option<u32>,

    /// Color mode
    #[arg(long, short = 'm')]
    pub color_mode: Option<Mode>,

    /// Scale sources larger than this on either side before converting
    #[arg(long)]
    pub max_dimension: Option<u32>,
}

impl ConversionArgs {
    /// Overlay these flags on the configured settings.
    pub fn apply(&self, config: &Config) -> ConversionSettings {
        let mut settings = config.conversion.clone();

        if let Some(charset) = self.charset {
            settings.character_set = charset.into();
        }
        if let Some(chars) = &self.chars {
            settings.custom_characters = chars.clone();
            if self.charset.is_none() {
                settings.character_set = Charset::Custom.into();
            }
        }
        if let Some(size) = self.size {
            settings.size = size.into();
        }
        if self.width.is_some() || self.height.is_some() {
            if let Some(w) = self.width {
                settings.custom_width = w;
            }
            if let Some(h) = self.height {
                settings.custom_height = h;
            }
            if self.size.is_none() {
                settings.size = Size::Custom.into();
            }
        }
        if let Some(mode) = self.color_mode {
            settings.color_mode = mode.into();
        }
        settings
    }

    pub fn max_dimension(&self, config: &Config) -> u32 {
        self.max_dimension.unwrap_or(config.source.max_dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ColorMode, SizePreset};
    use crate::settings::CharacterSet;

    fn convert_options(argv: &[&str]) -> ConversionArgs {
        match Args::parse_from(argv).command {
            Command::Convert { options, .. } => options,
            other => panic!("Expected Convert, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_defaults_come_from_config() {
        let options = convert_options(&["glyph-grid", "convert", "cat.png"]);
        let settings = options.apply(&Config::default());
        assert_eq!(settings, ConversionSettings::default());
        assert_eq!(options.max_dimension(&Config::default()), 1920);
    }

    #[test]
    fn test_chars_imply_custom_charset() {
        let options = convert_options(&["glyph-grid", "convert", "cat.png", "--chars", " #"]);
        let settings = options.apply(&Config::default());
        assert_eq!(settings.character_set, CharacterSet::Custom);
        assert_eq!(settings.custom_characters, " #");
    }

    #[test]
    fn test_width_implies_custom_size() {
        let options = convert_options(&[
            "glyph-grid", "convert", "cat.png", "--width", "64", "--height", "32",
        ]);
        let settings = options.apply(&Config::default());
        assert_eq!(settings.size, SizePreset::Custom);
        assert_eq!((settings.custom_width, settings.custom_height), (64, 32));
    }

    #[test]
    fn test_explicit_size_wins_over_width() {
        let options = convert_options(&[
            "glyph-grid", "convert", "cat.png", "--size", "large", "--width", "64",
        ]);
        assert_eq!(options.apply(&Config::default()).size, SizePreset::Large);
    }

    #[test]
    fn test_color_mode_flag() {
        let options = convert_options(&["glyph-grid", "convert", "cat.png", "-m", "bw"]);
        assert_eq!(
            options.apply(&Config::default()).color_mode,
            ColorMode::BlackWhite
        );
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["glyph-grid", "palettes", "-vv", "--config", "x.toml"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(args.command, Command::Palettes));
    }

    #[test]
    fn test_config_subcommand() {
        let args = Args::parse_from(["glyph-grid", "config", "init"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
    }
}
