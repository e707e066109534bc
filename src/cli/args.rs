//! CLI argument definitions using clap
//!
//! Commands:
//! - lazyload scan --input <file> [--config <path>] [--page-size N] [--metrics]
//! - lazyload config [--config <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// lazyload - page through a JSON array with a lazy loader
#[derive(Parser, Debug)]
#[command(name = "lazyload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Iterate a JSON array file page by page, one element per output line
    Scan(ScanArgs),

    /// Validate a configuration file and print the effective settings
    Config {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// JSON file holding a top-level array
    #[arg(long)]
    pub input: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides the configured page size; 0 fetches everything at once
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Print fetch counters after the elements
    #[arg(long)]
    pub metrics: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
