//! glyph-grid library crate.
//!
//! Converts decoded RGBA images into grids of glyphs with optional color,
//! running each conversion as a band-by-band background job with progress
//! events and a pre-flight capacity check.

pub mod capacity;
pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod settings;

pub use convert::{ColorMode, ConversionResult, GridSpec, Palette, PixelBuffer, RenderCell};
pub use engine::{convert, ConversionJob, JobEvent, JobState, ProgressEvent};
pub use error::{ConvertError, ErrorKind};
pub use settings::{CharacterSet, ConversionSettings};
