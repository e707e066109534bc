//! CLI command implementations

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::config::LoaderConfig;
use crate::dao::MemoryDao;
use crate::loader::LazyLoader;
use crate::observability::{Event, LoaderMeters, Logger, MetricsRegistry, ObservationScope};

use super::args::{Command, ScanArgs};
use super::errors::CliResult;
use super::io::{read_json_array, write_json_line};

/// Meter prefix used by `scan`
pub const SCAN_METER_PREFIX: &str = "scan";

/// Outcome of a `scan`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Elements written
    pub models: usize,
    /// Data source calls issued
    pub fetches: usize,
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cmd {
        Command::Scan(args) => scan(&args, &mut out).map(|_| ()),
        Command::Config { config } => show_config(config.as_deref(), &mut out),
    }
}

fn resolve_config(path: Option<&Path>) -> CliResult<LoaderConfig> {
    match path {
        Some(path) => Ok(LoaderConfig::load(path)?),
        None => Ok(LoaderConfig::default()),
    }
}

/// Resolve, override and validate the config, then apply its log level.
///
/// `CONFIG_LOADED` is logged only after the threshold is in place.
fn prepare_config(path: Option<&Path>, page_size: Option<usize>) -> CliResult<LoaderConfig> {
    let mut config = resolve_config(path)?;
    if let Some(page_size) = page_size {
        config = config.with_page_size(page_size);
    }
    config.validate()?;
    config.apply_logging()?;

    if let Some(path) = path {
        Logger::info(
            Event::ConfigLoaded.as_str(),
            &[("path", &path.display().to_string())],
        );
    }
    Ok(config)
}

/// Stream every element of the input array through a `LazyLoader`.
///
/// The input path is the loader context. Elements are written one per line;
/// with `--metrics` a final `{"metrics": ...}` line follows.
pub fn scan<W: Write>(args: &ScanArgs, out: &mut W) -> CliResult<ScanSummary> {
    let config = prepare_config(args.config.as_deref(), args.page_size)?;

    let input = args.input.display().to_string();
    let scope = ObservationScope::with_fields(
        "SCAN",
        &[("input", &input), ("page_size", &config.page_size.to_string())],
    );

    let registry = Arc::new(MetricsRegistry::new());
    let meters = LoaderMeters::registered(registry.clone(), SCAN_METER_PREFIX);

    let result = read_json_array(&args.input).and_then(|models| {
        Logger::info(
            Event::InputLoaded.as_str(),
            &[("input", &input), ("models", &models.len().to_string())],
        );
        stream(args.input.as_path(), models, &config, meters, out)
    });
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            scope.fail(&e.to_string());
            return Err(e);
        }
    };

    if args.metrics {
        write_json_line(
            out,
            &json!({
                "metrics": registry.to_json(),
                "models": summary.models,
                "fetches": summary.fetches,
            }),
        )?;
    }
    out.flush()?;

    scope.complete(&[
        ("fetches", &summary.fetches.to_string()),
        ("models", &summary.models.to_string()),
    ]);
    Ok(summary)
}

fn stream<W: Write>(
    input: &Path,
    models: Vec<serde_json::Value>,
    config: &LoaderConfig,
    meters: LoaderMeters,
    out: &mut W,
) -> CliResult<ScanSummary> {
    let loader = LazyLoader::new(input, MemoryDao::new(models), config.page_size, meters)?;

    let mut written = 0;
    for model in &loader {
        write_json_line(out, &model?)?;
        written += 1;
    }

    Ok(ScanSummary {
        models: written,
        fetches: loader.fetch_count(),
    })
}

/// Print the effective configuration
pub fn show_config<W: Write>(path: Option<&Path>, out: &mut W) -> CliResult<()> {
    let config = resolve_config(path)?;
    write_json_line(out, &config)?;
    Ok(())
}
