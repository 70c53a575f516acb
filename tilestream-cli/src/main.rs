//! tilestream CLI - Command-line interface
//!
//! This binary lists configured datasets and exercises their tile sources
//! from the command line.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tilestream::logging::init_logging;
use tracing::info;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "tilestream")]
#[command(version = tilestream::VERSION)]
#[command(about = "Stream quadtree planet tiles from databases and web map services", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.tilestream/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured datasets
    Datasets,

    /// Load one tile synchronously and describe it
    Inspect {
        /// Dataset id, the part after "dataset." in the section name
        #[arg(long)]
        dataset: String,

        /// Quadtree level
        #[arg(long, default_value = "0")]
        level: u32,

        /// Patch index at that level
        #[arg(long, default_value = "0")]
        patch: i64,
    },

    /// Load the quadtree breadth-first through asynchronous requests
    Walk {
        /// Dataset id, the part after "dataset." in the section name
        #[arg(long)]
        dataset: String,

        /// Deepest level to request
        #[arg(long, default_value = "2")]
        depth: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = commands::common::load_config(cli.config.as_deref())?;
    let _logging_guard = init_logging(&config.logging).map_err(CliError::LoggingInit)?;
    info!(version = tilestream::VERSION, "tilestream starting");

    match cli.command {
        Commands::Datasets => commands::datasets::run(&config),
        Commands::Inspect {
            dataset,
            level,
            patch,
        } => {
            let source = commands::common::open_dataset(&config, &dataset)?;
            commands::inspect::run(source.as_ref(), level, patch)
        }
        Commands::Walk { dataset, depth } => {
            let source = commands::common::open_dataset(&config, &dataset)?;
            commands::walk::run(source.as_ref(), depth)
        }
    }
}
