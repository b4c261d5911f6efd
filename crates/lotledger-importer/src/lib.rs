//! Import framework for lotledger
//!
//! This crate turns brokerage records into the normalized events the
//! ledger replays.
//!
//! # Overview
//!
//! Inputs live in a data directory (see [`DataFile`] for the file names):
//! CSV tables maintained by hand or exported elsewhere, and raw order
//! payloads dumped from the broker. The [`Importer`] reads both, maps every
//! record through the [`Normalizer`], drops duplicate orders and splits, and
//! returns an [`ImportResult`] ready for sequencing.
//!
//! Option legs name their contract through an opaque instrument reference.
//! Contracts are resolved through an [`InstrumentResolver`]; the importer
//! uses a file-backed [`InstrumentCache`].
//!
//! # Example
//!
//! ```rust,no_run
//! use lotledger_importer::{Importer, ImporterConfig};
//!
//! let importer = Importer::new(ImporterConfig::new("data"))?;
//! let result = importer.extract()?;
//! for warning in &result.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! let events = result.events();
//! # Ok::<(), anyhow::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod csv_importer;
pub mod normalize;
pub mod payload;

use anyhow::{Context, Result};
use lotledger_core::{sequence, Event, SplitEvent, TradeEvent, Transfer};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub use cache::{InstrumentCache, TickerCache};
pub use config::{DataFile, ImporterConfig};
pub use normalize::{
    dedup_splits, instrument_id, InstrumentResolver, NormalizeError, Normalizer,
    OptionLegRecord, OptionStrategyRecord, SplitRecord, StockTradeRecord, StrategyType,
};
pub use payload::{OptionOrder, StockOrder};

use csv_importer::{OptionInstrumentRow, OptionTradeRow};

/// Result of an import operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Normalized stock trades, in input order.
    pub stock_trades: Vec<TradeEvent>,
    /// Normalized splits, duplicates removed.
    pub splits: Vec<SplitEvent>,
    /// Normalized option legs, in input order.
    pub option_trades: Vec<TradeEvent>,
    /// Cash transfers.
    pub transfers: Vec<Transfer>,
    /// Warnings encountered during import.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Create an empty import result.
    pub const fn empty() -> Self {
        Self {
            stock_trades: Vec::new(),
            splits: Vec::new(),
            option_trades: Vec::new(),
            transfers: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a warning to the result.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Number of trade and split events.
    pub fn event_count(&self) -> usize {
        self.stock_trades.len() + self.splits.len() + self.option_trades.len()
    }

    /// All trade and split events in replay order.
    pub fn events(&self) -> Vec<Event> {
        sequence(
            self.stock_trades.clone(),
            self.splits.clone(),
            self.option_trades.clone(),
        )
    }
}

/// Read a JSON array file. A missing file reads as an empty array.
fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse orders: {}", path.display()))
}

/// Reads a data directory into normalized events.
#[derive(Debug, Clone)]
pub struct Importer {
    config: ImporterConfig,
    cache: InstrumentCache,
    tickers: TickerCache,
}

impl Importer {
    /// Load the instrument caches and the option contracts table.
    ///
    /// Contracts listed in `option_instruments.csv` are merged into the
    /// instrument cache, overriding cached entries.
    pub fn new(config: ImporterConfig) -> Result<Self> {
        let mut cache = InstrumentCache::load(&config.path(DataFile::InstrumentCache));
        let rows: Vec<OptionInstrumentRow> =
            csv_importer::read_file(&config.path(DataFile::OptionInstruments))?;
        for row in &rows {
            cache.insert(instrument_id(&row.instrument), row.contract());
        }
        let tickers = TickerCache::load(&config.path(DataFile::StockInstruments));

        debug!(
            contracts = cache.len(),
            tickers = tickers.len(),
            "loaded instrument tables"
        );
        Ok(Self {
            config,
            cache,
            tickers,
        })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// The option instrument cache.
    pub const fn cache(&self) -> &InstrumentCache {
        &self.cache
    }

    /// Persist the instrument cache if it gained entries.
    ///
    /// Returns whether the file was written.
    pub fn save_cache(&mut self) -> Result<bool> {
        if !self.cache.is_dirty() {
            return Ok(false);
        }
        self.cache
            .save(&self.config.path(DataFile::InstrumentCache))?;
        Ok(true)
    }

    /// Read, normalize and de-duplicate everything in the data directory.
    ///
    /// Any record that fails normalization aborts the import.
    pub fn extract(&self) -> Result<ImportResult> {
        let normalizer = Normalizer::new(&self.cache);
        let mut result = ImportResult::empty();

        let mut orders = HashSet::new();
        for record in self.stock_records()? {
            if !orders.insert(record.id.clone()) {
                warn!(id = %record.id, "skipping duplicate stock order");
                result.warnings.push(format!("duplicate stock order {}", record.id));
                continue;
            }
            let event = normalizer
                .stock_trade(&record)
                .with_context(|| format!("stock order {}", record.id))?;
            result.stock_trades.push(event);
        }

        for record in self.option_records()? {
            if !orders.insert(record.id.clone()) {
                warn!(id = %record.id, "skipping duplicate option order");
                result.warnings.push(format!("duplicate option order {}", record.id));
                continue;
            }
            let events = normalizer
                .option_strategy(&record)
                .with_context(|| format!("option order {}", record.id))?;
            result.option_trades.extend(events);
        }

        let records: Vec<SplitRecord> = csv_importer::read_file(&self.config.path(DataFile::Splits))?;
        let splits = records
            .iter()
            .map(|record| {
                normalizer
                    .split(record)
                    .with_context(|| format!("{} split on {}", record.ticker, record.date))
            })
            .collect::<Result<Vec<_>>>()?;
        let (splits, dropped) = dedup_splits(splits);
        if dropped > 0 {
            result.warnings.push(format!("dropped {dropped} duplicate split(s)"));
        }
        result.splits = splits;

        result.transfers =
            csv_importer::read_transfers_file(&self.config.path(DataFile::Transfers))?;

        info!(
            stock_trades = result.stock_trades.len(),
            option_trades = result.option_trades.len(),
            splits = result.splits.len(),
            transfers = result.transfers.len(),
            "import complete"
        );
        Ok(result)
    }

    fn stock_records(&self) -> Result<Vec<StockTradeRecord>> {
        let mut records: Vec<StockTradeRecord> =
            csv_importer::read_file(&self.config.path(DataFile::StockTrades))?;
        if self.config.tables_only {
            return Ok(records);
        }

        let orders: Vec<StockOrder> =
            read_json_array(&self.config.path(DataFile::StockOrders))?;
        let mut filled = Vec::with_capacity(orders.len());
        for order in orders {
            if !order.is_filled() {
                debug!(id = %order.id, state = %order.state, "skipping unfilled stock order");
                continue;
            }
            let executed_at = order
                .executed_at()
                .with_context(|| format!("stock order {}", order.id))?;
            filled.push((executed_at, order));
        }

        // Order dumps list newest first; same-day trades must replay in fill order.
        filled.sort_by_key(|(executed_at, _)| *executed_at);
        for (_, order) in filled {
            let record = order
                .to_record(&self.tickers)
                .with_context(|| format!("stock order {}", order.id))?;
            records.push(record);
        }
        Ok(records)
    }

    fn option_records(&self) -> Result<Vec<OptionStrategyRecord>> {
        let rows: Vec<OptionTradeRow> =
            csv_importer::read_file(&self.config.path(DataFile::OptionTrades))?;
        let mut records = csv_importer::group_option_legs(rows);
        if self.config.tables_only {
            return Ok(records);
        }

        let orders: Vec<OptionOrder> =
            read_json_array(&self.config.path(DataFile::OptionOrders))?;
        let mut filled = Vec::with_capacity(orders.len());
        for order in orders {
            if !order.is_filled() {
                debug!(id = %order.id, state = %order.state, "skipping unfilled option order");
                continue;
            }
            let executed_at = order
                .executed_at()
                .with_context(|| format!("option order {}", order.id))?;
            filled.push((executed_at, order));
        }

        filled.sort_by_key(|(executed_at, _)| *executed_at);
        for (_, order) in filled {
            let record = order
                .to_record()
                .with_context(|| format!("option order {}", order.id))?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Read everything from a data directory with the default configuration.
pub fn extract_dir(data_dir: &Path) -> Result<ImportResult> {
    Importer::new(ImporterConfig::new(data_dir))?.extract()
}
