//! svgxaml - convert SVG icons into resource-backed XAML drawings.

mod cli;
mod config;
mod drawing;
mod logger;
mod markup;
mod normalize;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ConverterConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ConverterConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        crate::debug!("config"; "loaded {}", path.display());
    }

    match &cli.command {
        Commands::Convert { args } => cli::convert::convert_file(args, &config),
        Commands::Dict { args } => cli::dict::build_dictionaries(args, &config),
        Commands::Normalize { file, output } => {
            cli::normalize::normalize_file(file, output.as_deref(), &config)
        }
    }
}
