//! lotledger-check - Load, normalize and replay a data directory.
//!
//! Exits non-zero on the first malformed record or ledger error, so it can
//! guard a data directory in scripts before reports are generated.

use anyhow::{Context, Result};
use clap::Parser;
use lotledger_booking::replay;
use lotledger_importer::{Importer, ImporterConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Validate a brokerage data directory.
#[derive(Parser, Debug)]
#[command(name = "lotledger-check")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the input tables and payloads
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub data: PathBuf,

    /// Read only the CSV tables, ignoring raw order payloads
    #[arg(long)]
    pub tables_only: bool,

    /// Write newly listed option contracts to the instrument cache
    #[arg(long)]
    pub write_cache: bool,

    /// Show debug logging and timing
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Main entry point for the check command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    super::init_logging(args.verbose);

    let mut stdout = io::stdout().lock();
    match run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Run the check, writing a summary to `writer`.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    let start = Instant::now();

    if !args.data.is_dir() {
        anyhow::bail!("data directory not found: {}", args.data.display());
    }

    let config = ImporterConfig::new(&args.data).tables_only(args.tables_only);
    let mut importer = Importer::new(config)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    let imported = importer
        .extract()
        .with_context(|| format!("failed to load {}", args.data.display()))?;

    let events = imported.events();
    let (portfolio, sales) = replay(&events).context("replay failed")?;

    if args.write_cache && importer.save_cache()? && !args.quiet {
        writeln!(
            writer,
            "Wrote {} contracts to the instrument cache",
            importer.cache().len()
        )?;
    }

    if args.quiet {
        return Ok(());
    }

    for warning in &imported.warnings {
        writeln!(writer, "warning: {warning}")?;
    }
    writeln!(
        writer,
        "Loaded {} stock trades, {} option trades, {} splits, {} transfers",
        imported.stock_trades.len(),
        imported.option_trades.len(),
        imported.splits.len(),
        imported.transfers.len()
    )?;
    writeln!(
        writer,
        "Replayed {} events: {} realized sales, {} open instruments",
        events.len(),
        sales.len(),
        portfolio.instruments().len()
    )?;
    if args.verbose {
        writeln!(writer, "Finished in {:.2?}", start.elapsed())?;
    }

    Ok(())
}
