//! lotledger-report - Reports over a brokerage data directory.
//!
//! # Usage
//!
//! ```bash
//! lotledger-report --data ./data gains --from 2020-01-01
//! lotledger-report --data ./data gains --from 2020-01-01 --to 2020-12-31 --ticker AAPL
//! lotledger-report --data ./data holdings --as-of 2020-06-30
//! lotledger-report --data ./data deposits
//! ```
//!
//! # Reports
//!
//! - `gains` - Realized FIFO sales sold within a date range
//! - `holdings` - Open lots per instrument
//! - `deposits` - Completed deposits minus completed withdrawals

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use lotledger_booking::{
    filter_ticker, holdings, net_deposits, replay_until, Holding, ReportWindow, SaleReport,
    COLUMNS,
};
use lotledger_importer::extract_dir;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::table::write_table;

/// Output format for tabular reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table (default)
    #[default]
    Text,
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON
    Json,
}

/// Generate reports from a brokerage data directory.
#[derive(Parser, Debug)]
#[command(name = "lotledger-report")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the input tables and payloads
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub data: PathBuf,

    /// The report to generate
    #[command(subcommand)]
    pub report: Report,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available reports.
#[derive(Subcommand, Debug)]
pub enum Report {
    /// Realized gains, one row per lot consumed
    Gains {
        /// First sell date included (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date replayed and reported; defaults to today
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only this ticker and options on it
        #[arg(short, long)]
        ticker: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Open lots per instrument
    Holdings {
        /// Replay up to this date; defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Net cash deposited
    Deposits {
        /// Count transfers up to this date; defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

/// Main entry point for the report command.
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

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Run a report, writing it to `writer`.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    if !args.data.is_dir() {
        anyhow::bail!("data directory not found: {}", args.data.display());
    }

    let imported = extract_dir(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    for warning in &imported.warnings {
        eprintln!("warning: {warning}");
    }

    match &args.report {
        Report::Gains {
            from,
            to,
            ticker,
            format,
        } => {
            let window = ReportWindow::new(*from, to.unwrap_or_else(today))?;
            let mut events = imported.events();
            if let Some(ticker) = ticker {
                events = filter_ticker(&events, ticker);
                debug!(%ticker, events = events.len(), "filtered to ticker");
            }
            let sales = window.realized_sales(&events)?;
            let report = SaleReport::build(&sales, window.from());
            report_gains(&report, *format, writer)?;
        }
        Report::Holdings { as_of, format } => {
            let as_of = as_of.unwrap_or_else(today);
            let (portfolio, _) = replay_until(&imported.events(), as_of)?;
            report_holdings(&holdings(&portfolio), as_of, *format, writer)?;
        }
        Report::Deposits { as_of } => {
            let as_of = as_of.unwrap_or_else(today);
            let amount = net_deposits(&imported.transfers, as_of);
            writeln!(writer, "Net deposits as of {as_of}: {amount:.2}")?;
        }
    }

    Ok(())
}

/// Render the realized-gains report.
fn report_gains<W: Write>(report: &SaleReport, format: OutputFormat, writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = report
                .rows()
                .iter()
                .map(|row| row.cells().to_vec())
                .collect();
            write_table(writer, &COLUMNS, &rows)?;
            writeln!(writer)?;
            writeln!(writer, "Total earnings: {:.2}", report.total())?;
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(&mut *writer);
            csv.write_record(COLUMNS)?;
            for row in report.rows() {
                csv.write_record(row.cells())?;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

const HOLDING_COLUMNS: [&str; 6] = [
    "Name",
    "Lots",
    "Quantity",
    "Average Cost",
    "Cost Basis",
    "First Acquired",
];

fn holding_cells(holding: &Holding) -> [String; 6] {
    [
        holding.instrument.clone(),
        holding.lots.to_string(),
        holding.quantity.normalize().to_string(),
        format!("{:.2}", holding.average_cost),
        format!("{:.2}", holding.cost_basis),
        holding.first_acquired.to_string(),
    ]
}

/// Render the holdings snapshot.
fn report_holdings<W: Write>(
    holdings: &[Holding],
    as_of: NaiveDate,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(writer, "Holdings as of {as_of}")?;
            writeln!(writer)?;
            let rows: Vec<Vec<String>> = holdings
                .iter()
                .map(|holding| holding_cells(holding).to_vec())
                .collect();
            write_table(writer, &HOLDING_COLUMNS, &rows)?;
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(&mut *writer);
            csv.write_record(HOLDING_COLUMNS)?;
            for holding in holdings {
                csv.write_record(holding_cells(holding))?;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, holdings)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
