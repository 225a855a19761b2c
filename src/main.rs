use clap::Parser;
use glyph_grid::cli::{self, Args, CliError, Command};
use glyph_grid::config::Config;
use std::process::ExitCode;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::load(args.config.as_deref())?;

    match &args.command {
        Command::Convert {
            image,
            options,
            format,
            no_progress,
        } => cli::run_convert(image, options, *format, *no_progress, &config),
        Command::Estimate { image, options } => cli::run_estimate(image, options, &config),
        Command::Palettes => {
            cli::list_palettes();
            Ok(())
        }
        Command::Config { action } => {
            cli::handle_config_action(action, args.config.as_deref(), &config)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = cli::setup_ctrlc_handler() {
        log::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Interrupted) => {
            eprintln!("Conversion interrupted.");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
