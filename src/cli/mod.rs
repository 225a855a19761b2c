//! Command-line interface definitions and helpers.
//!
//! This module contains CLI argument parsing, enums, and subcommand handlers.
//! Image decoding lives here, outside the conversion core.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, ConversionArgs};
pub use commands::{
    format_result, handle_config_action, list_palettes, load_source, prescale, run_convert,
    run_estimate, setup_ctrlc_handler, CliError,
};
pub use enums::{Charset, Format, Mode, Size};
