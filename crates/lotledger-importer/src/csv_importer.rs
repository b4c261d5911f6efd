//! CSV table readers.
//!
//! Each table has a fixed header. Values are trimmed; numbers are read as
//! exact decimals.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use lotledger_core::{OptionContract, OptionType, Side, Transfer, TransferDirection};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::normalize::{OptionLegRecord, OptionStrategyRecord};

/// Deserialize every row of a headed CSV document.
///
/// `source` names the table in error messages. Row numbers count the header
/// as row 1.
pub fn read_records<T: DeserializeOwned>(content: &str, source: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("{source}: row {}", i + 2)))
        .collect()
}

/// Read a table file. A missing file reads as an empty table.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    read_records(&content, &path.display().to_string())
}

/// Row of `option_trades.csv`: one leg of an option order.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionTradeRow {
    /// Order identifier shared by the legs of one order.
    pub strategy_id: String,
    /// Strategy name, e.g. `long_call`.
    pub strategy_type: String,
    /// Instrument reference.
    pub instrument: String,
    /// Buy or sell.
    pub side: Side,
    /// Execution date.
    pub date: NaiveDate,
    /// Premium per share.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Contracts.
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
}

/// Group option legs into orders, keeping first-seen order.
pub fn group_option_legs(rows: Vec<OptionTradeRow>) -> Vec<OptionStrategyRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut strategies: Vec<OptionStrategyRecord> = Vec::new();

    for row in rows {
        let leg = OptionLegRecord {
            instrument: row.instrument,
            side: row.side,
            date: row.date,
            price: row.price,
            quantity: row.quantity,
        };
        if let Some(&i) = index.get(&row.strategy_id) {
            strategies[i].legs.push(leg);
        } else {
            index.insert(row.strategy_id.clone(), strategies.len());
            strategies.push(OptionStrategyRecord {
                id: row.strategy_id,
                strategy_type: row.strategy_type,
                legs: vec![leg],
            });
        }
    }

    strategies
}

/// Row of `option_instruments.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionInstrumentRow {
    /// Instrument reference.
    pub instrument: String,
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// `call` or `put`.
    pub option_type: OptionType,
    /// Strike per share.
    #[serde(with = "rust_decimal::serde::str")]
    pub strike_price: Decimal,
}

impl OptionInstrumentRow {
    /// The contract this row describes.
    pub fn contract(&self) -> OptionContract {
        OptionContract::new(
            self.ticker.clone(),
            self.expiration_date,
            self.option_type,
            self.strike_price,
        )
    }
}

/// Row of `transfers.csv`.
#[derive(Debug, Clone, Deserialize)]
struct TransferRow {
    id: String,
    direction: TransferDirection,
    state: String,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    date: NaiveDate,
}

impl From<TransferRow> for Transfer {
    fn from(row: TransferRow) -> Self {
        Self {
            id: row.id,
            direction: row.direction,
            state: row.state,
            amount: row.amount,
            date: row.date,
        }
    }
}

/// Read transfer rows from a file; a missing file reads as no transfers.
pub fn read_transfers_file(path: &Path) -> Result<Vec<Transfer>> {
    let rows: Vec<TransferRow> = read_file(path)?;
    Ok(rows.into_iter().map(Transfer::from).collect())
}
