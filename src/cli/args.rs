//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ResultMode;

/// Convert SVG icons into resource-backed XAML drawings and dictionaries
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: svgxaml.toml)
    #[arg(short = 'C', long, global = true, default_value = "svgxaml.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert a single SVG file into one keyed drawing
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Build one resource dictionary per directory of SVG files
    #[command(visible_alias = "d")]
    Dict {
        #[command(flatten)]
        args: DictArgs,
    },

    /// Run the dictionary pipeline over an existing XAML dictionary
    #[command(visible_alias = "n")]
    Normalize {
        /// XAML resource dictionary to normalize
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// SVG file to convert
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Root element of the result
    #[arg(short, long, value_enum)]
    pub mode: Option<ResultMode>,
}

/// Dict command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct DictArgs {
    /// Directory containing the SVG files (default: current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Target directory for the XAML files (default: source directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// Container name template.
    ///
    /// `{0}` is the root path, `{1}` the sub-path from the root to the
    /// source directory and `{2}` the source directory name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output file template, relative to the target directory.
    ///
    /// Same placeholders as `--name`; `.xaml` is added when the template has
    /// no extension.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Process top-level subdirectories
    #[arg(short, long)]
    pub subdirs: bool,

    /// Process all nested subdirectories
    #[arg(short, long)]
    pub recurse: bool,

    /// Emit one local brush proxy per occurrence instead of sharing them
    #[arg(long)]
    pub no_consolidate: bool,
}
