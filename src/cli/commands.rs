//! Subcommand handlers.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::args::{ConfigAction, ConversionArgs};
use super::enums::Format;
use crate::capacity::{check_capacity, estimate_output_size};
use crate::config::{default_path, Config, ConfigError, OutputFormat, DEFAULT_CONFIG_TOML};
use crate::convert::{
    optimized_dimensions, ConversionResult, PixelBuffer, BASIC_CHARSET, EXTENDED_CHARSET,
};
use crate::engine::{ConversionJob, JobEvent, JobState};
use crate::error::ConvertError;

/// How often the convert loop checks for Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Errors surfaced by the command line front end.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to decode image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Interrupted")]
    Interrupted,
}

/// Set up the Ctrl+C handler.
///
/// Interrupting a conversion abandons the running job.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        INTERRUPTED.store(true, Ordering::SeqCst);
    })
}

fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Decode an image file and scale it to fit `max_dimension`.
///
/// Down-scaling uses a triangle filter so fine detail averages out instead
/// of being dropped before cell sampling.
pub fn load_source(path: &Path, max_dimension: u32) -> Result<PixelBuffer, CliError> {
    let img = image::open(path)
        .map_err(|e| CliError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();
    let img = prescale(img, max_dimension);
    let (width, height) = img.dimensions();
    Ok(PixelBuffer::new(width, height, img.into_raw())?)
}

/// Shrink `img` so its larger side is at most `max_dimension`.
pub fn prescale(img: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = img.dimensions();
    let (w, h, resized) = optimized_dimensions(width, height, max_dimension);
    if !resized {
        return img;
    }
    log::info!("Scaled source {}x{} to {}x{}", width, height, w, h);
    imageops::resize(&img, w, h, FilterType::Triangle)
}

/// Render a result in the requested format.
pub fn format_result(result: &ConversionResult, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Text => result.to_plain_text(),
        OutputFormat::Markup => result.to_markup(),
        OutputFormat::Ansi => result.to_ansi(),
        OutputFormat::Json => serde_json::to_string(result)?,
    })
}

/// Convert an image and print it to stdout.
pub fn run_convert(
    image: &Path,
    options: &ConversionArgs,
    format: Option<Format>,
    no_progress: bool,
    config: &Config,
) -> Result<(), CliError> {
    let buffer = load_source(image, options.max_dimension(config))?;
    let settings = options
        .apply(config)
        .with_source_dimensions(buffer.width(), buffer.height());
    let format = format.map(OutputFormat::from).unwrap_or(config.output.format);
    let show_progress = config.output.progress && !no_progress;

    let mut job = ConversionJob::submit(buffer, &settings)?;
    let result = loop {
        if interrupted() {
            job.abandon();
            if show_progress {
                eprintln!();
            }
            return Err(CliError::Interrupted);
        }
        match job.recv_timeout(POLL_INTERVAL) {
            Some(JobEvent::Progress(p)) => {
                if show_progress {
                    eprint!("\r[{:>3.0}%] {:<40}", p.percent, p.stage);
                }
            }
            Some(JobEvent::Complete(result)) => break result,
            Some(JobEvent::Failed(e)) => {
                if show_progress {
                    eprintln!();
                }
                return Err(e.into());
            }
            None if job.state() == JobState::Executing => continue,
            None => return Err(ConvertError::internal("job ended without a result").into()),
        }
    };
    if show_progress {
        eprintln!();
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", format_result(&result, format)?)?;
    stdout.flush()?;
    Ok(())
}

/// Print the plan and capacity estimates for an image.
pub fn run_estimate(image: &Path, options: &ConversionArgs, config: &Config) -> Result<(), CliError> {
    let buffer = load_source(image, options.max_dimension(config))?;
    let settings = options
        .apply(config)
        .with_source_dimensions(buffer.width(), buffer.height());
    let plan = settings.resolve()?;

    println!("Source:      {}x{}", buffer.width(), buffer.height());
    println!("Grid:        {}", plan.grid);
    println!(
        "Palette:     {} ({} glyphs)",
        settings.character_set.name(),
        plan.palette.len()
    );
    println!("Color mode:  {}", plan.color_mode.name());

    let size = estimate_output_size(plan.grid, plan.color_mode);
    println!("Output:      {} chars, ~{} bytes", size.chars, size.bytes);

    match check_capacity(buffer.width(), buffer.height(), plan.grid) {
        Ok(report) => {
            println!(
                "Memory:      {:.2} MB ({:.2} MB input, {:.2} MB output)",
                report.memory.total_mb, report.memory.input_mb, report.memory.output_mb
            );
            println!(
                "Time:        ~{}s ({} complexity)",
                report.time.seconds,
                report.time.complexity.name()
            );
            println!("Capacity:    ok");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// List built-in palettes.
pub fn list_palettes() {
    println!("Built-in palettes (darkest first):");
    println!("  basic     ({:>2}) {}", BASIC_CHARSET.chars().count(), BASIC_CHARSET);
    println!(
        "  extended  ({:>2}) {}",
        EXTENDED_CHARSET.chars().count(),
        EXTENDED_CHARSET
    );
    println!();
    println!("Use --chars <GLYPHS> for a custom palette.");
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: &ConfigAction,
    config_path: Option<&Path>,
    config: &Config,
) -> Result<(), CliError> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_path);
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            let text = toml::to_string_pretty(config)
                .map_err(|e| CliError::Usage(format!("Failed to render config: {}", e)))?;
            println!("{}", text);
            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "Config file already exists: {}\nUse 'glyph-grid config show' to view current settings.",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG_TOML)?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}
