//! Configuration file handling for glyph-grid.
//!
//! Loads default conversion settings from `~/.config/glyph-grid/config.toml`
//! or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::convert::DEFAULT_MAX_SOURCE_DIMENSION;
use crate::settings::ConversionSettings;

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionSettings,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Markup,
    Ansi,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Draw a progress line on stderr
    #[serde(default = "default_true")]
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            progress: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Decoded images larger than this on either side are scaled down first
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_SOURCE_DIMENSION,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_SOURCE_DIMENSION
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyph-grid").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyph-grid/config.toml")
        })
}

/// Commented config written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# glyph-grid configuration

[conversion]
# basic | extended | custom
character_set = "basic"
# Used when character_set = "custom", darkest glyph first
# custom_characters = " .:-=+*#%@"
# small | medium | large | custom
size = "medium"
# Used when size = "custom" (10-500)
custom_width = 100
custom_height = 50
# color | grayscale | blackwhite
color_mode = "color"

[output]
# text | markup | ansi | json
format = "text"
progress = true

[source]
# Larger images are scaled down before conversion
max_dimension = 1920
"#;
