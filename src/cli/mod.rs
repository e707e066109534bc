//! CLI module
//!
//! Provides command-line interface for:
//! - scan: iterate a JSON array through a `LazyLoader`
//! - config: validate and print configuration

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ScanArgs};
pub use commands::{run, run_command, scan, show_config, ScanSummary, SCAN_METER_PREFIX};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_array, write_json_line};
