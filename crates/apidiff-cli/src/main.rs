//! Thin CLI wrapper around `apidiff-core`.
//!
//! All extensions are auto-discovered through [`InventoryRegistry`];
//! the core engine itself has no notion of a command line.

mod config;
mod reporters;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use apidiff_core::{Archive, EngineBuilder, InventoryRegistry};
use clap::Parser;

use reporters::{JsonReporter, TextReporter};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

/// Compares two API archives and reports the compatibility differences
/// between them.
#[derive(Parser, Debug)]
#[command(name = "apidiff", version, about)]
struct Cli {
    /// The old (baseline) archive.
    old_archive: PathBuf,

    /// The new archive being checked for compatibility with `old_archive`.
    new_archive: PathBuf,

    /// Supplementary archives needed to resolve references out of the old archive.
    #[arg(long = "old-supplementary")]
    old_supplementary: Vec<PathBuf>,

    /// Supplementary archives needed to resolve references out of the new archive.
    #[arg(long = "new-supplementary")]
    new_supplementary: Vec<PathBuf>,

    /// TOML configuration file, flattened into the component configuration mapping.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Locale used for message formatting by components that support it.
    #[arg(long, default_value = "en")]
    locale: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn read_archive(path: &PathBuf) -> Result<Archive> {
    let bytes = std::fs::read(path).with_context(|| format!("reading archive {}", path.display()))?;
    let name = path.to_string_lossy().into_owned();
    Ok(Archive::new(name, bytes))
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let old_primary = vec![read_archive(&cli.old_archive)?];
    let new_primary = vec![read_archive(&cli.new_archive)?];
    let old_supplementary = cli
        .old_supplementary
        .iter()
        .map(read_archive)
        .collect::<Result<Vec<_>>>()?;
    let new_supplementary = cli
        .new_supplementary
        .iter()
        .map(read_archive)
        .collect::<Result<Vec<_>>>()?;

    let configuration = config::load(cli.config.as_deref(), &cli.locale)?;

    let registry = InventoryRegistry;
    let mut builder = EngineBuilder::from_registry(&registry, configuration);
    builder = match cli.format {
        Format::Text => builder.with_reporter(Box::new(TextReporter)),
        Format::Json => builder.with_reporter(Box::new(JsonReporter::default())),
    };

    let mut engine = builder.build().context("assembling the differencing engine")?;
    engine
        .analyze(old_primary, old_supplementary, new_primary, new_supplementary)
        .context("running the analysis")?;

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("apidiff: {error:#}");
            ExitCode::FAILURE
        }
    }
}
