//! Command line entry point.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagecraft_core::CanvasConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pagecraft",
    version,
    about = "Inspect, convert and prepare search requests for PageCraft templates"
)]
struct Cli {
    /// Canvas config JSON (page size, minimum item size, zoom limits)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print per-kind counts and the relations of every item
    Inspect {
        /// Template in either schema
        file: PathBuf,
    },
    /// Re-encode a template as legacy `template.json`
    Convert {
        /// Template in either schema
        file: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Print the layout search request body for a template
    #[command(name = "search-request")]
    SearchRequest {
        /// Template in either schema
        file: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<CanvasConfig> {
    match path {
        Some(path) => CanvasConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(CanvasConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    log::debug!("Page {}x{}", config.page_width, config.page_height);

    match cli.command {
        Command::Inspect { file } => commands::inspect(&file, config),
        Command::Convert { file, output } => commands::convert(&file, &output, config),
        Command::SearchRequest { file } => commands::search_request(&file, config),
    }
}
