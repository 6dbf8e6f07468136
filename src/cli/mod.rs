//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod plan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::models::Direction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// linesign - Generate transit line indicator boards from tile assets
#[derive(Parser)]
#[command(name = "linesign")]
#[command(about = "linesign - Generate directional indicator boards for every station of a line")]
#[command(version)]
pub struct Cli {
    /// Log progress (repeat for debug output); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose and render every sign of every segment to PNG
    Generate {
        /// Config file (default: nearest linesign.toml, else built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Line description file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory holding the tile PNGs
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Output directory for rendered signs
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Tile size in pixels
        #[arg(long)]
        cell_size: Option<u32>,

        /// Number of render threads (default: all cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// List the signs that would be generated without rendering
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the tile grid of every sign without rendering
    Plan {
        /// Line description file (default: project input from config)
        input: Option<PathBuf>,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Arrange a single progress row
    Row {
        /// Comma-separated station ids, in line order
        #[arg(long, value_delimiter = ',', required = true)]
        stations: Vec<String>,

        /// Anchor: one station, or two adjacent stations separated by a comma
        #[arg(long, value_delimiter = ',', required = true)]
        anchor: Vec<String>,

        /// Station the sign stands at
        #[arg(long)]
        current: String,

        /// Travel direction
        #[arg(long, value_enum, default_value = "ascending")]
        direction: Direction,

        /// Row length in cells
        #[arg(long)]
        length: usize,

        /// Filler for cells without a station
        #[arg(long, default_value = "")]
        blank: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Initialize logging for the requested verbosity.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // A second init (e.g. from tests) is harmless
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { config, input, assets, out, cell_size, jobs, dry_run } => {
            generate::run_generate(
                config.as_deref(),
                crate::config::CliOverrides { input, assets, out, cell_size, jobs },
                dry_run,
            )
        }
        Commands::Plan { input, config, json } => {
            plan::run_plan(input.as_deref(), config.as_deref(), json)
        }
        Commands::Row { stations, anchor, current, direction, length, blank, json } => {
            plan::run_row(&stations, &anchor, &current, direction, length, &blank, json)
        }
    }
}
