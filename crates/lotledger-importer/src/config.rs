//! Configuration for the data-directory importer.

use std::path::{Path, PathBuf};

/// One input file of a data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    /// Stock trades table.
    StockTrades,
    /// Stock splits table.
    Splits,
    /// Option legs table.
    OptionTrades,
    /// Option contracts table.
    OptionInstruments,
    /// Cash transfers table.
    Transfers,
    /// Raw stock order payloads.
    StockOrders,
    /// Raw option order payloads.
    OptionOrders,
    /// Stock instrument identifier to ticker map.
    StockInstruments,
    /// Option instrument cache.
    InstrumentCache,
}

impl DataFile {
    /// Every input file.
    pub const ALL: [Self; 9] = [
        Self::StockTrades,
        Self::Splits,
        Self::OptionTrades,
        Self::OptionInstruments,
        Self::Transfers,
        Self::StockOrders,
        Self::OptionOrders,
        Self::StockInstruments,
        Self::InstrumentCache,
    ];

    /// File name within the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::StockTrades => "stock_trades.csv",
            Self::Splits => "splits.csv",
            Self::OptionTrades => "option_trades.csv",
            Self::OptionInstruments => "option_instruments.csv",
            Self::Transfers => "transfers.csv",
            Self::StockOrders => "stock_orders.json",
            Self::OptionOrders => "option_orders.json",
            Self::StockInstruments => "stock_instruments.json",
            Self::InstrumentCache => "instruments_cache.json",
        }
    }
}

/// Where the importer reads its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterConfig {
    /// Directory holding the input files.
    pub data_dir: PathBuf,
    /// Skip the raw JSON payloads and read only the CSV tables.
    pub tables_only: bool,
}

impl ImporterConfig {
    /// Read everything from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            tables_only: false,
        }
    }

    /// Read only the CSV tables.
    #[must_use]
    pub const fn tables_only(mut self, tables_only: bool) -> Self {
        self.tables_only = tables_only;
        self
    }

    /// Full path of an input file.
    #[must_use]
    pub fn path(&self, file: DataFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
