//! Mapping raw brokerage records to ledger events.
//!
//! Records arrive from CSV tables or from brokerage JSON payloads (see
//! [`payload`](crate::payload)). The [`Normalizer`] turns them into
//! [`TradeEvent`]s and [`SplitEvent`]s and validates them, so that nothing
//! malformed reaches the ledger.

use chrono::NaiveDate;
use lotledger_core::{EventError, Instrument, OptionContract, Side, SplitEvent, TradeEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a raw record could not become an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The event was built but failed validation.
    #[error(transparent)]
    Malformed(#[from] EventError),

    /// No contract is known for an option instrument reference.
    #[error("unresolved instrument {reference}")]
    UnresolvedInstrument {
        /// The reference as it appeared in the record.
        reference: String,
    },

    /// The option order is not a single-leg strategy.
    #[error("unsupported option strategy {strategy:?} in order {id}: {reason}")]
    UnsupportedStrategy {
        /// Order identifier.
        id: String,
        /// Strategy name as reported.
        strategy: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A field could not be parsed.
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: String,
        /// Parse failure.
        reason: String,
    },
}

impl NormalizeError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Looks up option contracts by instrument identifier.
///
/// The identifier is the trailing path segment of the broker's instrument
/// URL (see [`instrument_id`]). Implementations must not do I/O during a
/// normalization pass; fetch and cache contracts beforehand.
pub trait InstrumentResolver {
    /// The contract for `id`, if known.
    fn resolve(&self, id: &str) -> Option<OptionContract>;
}

impl<T: InstrumentResolver + ?Sized> InstrumentResolver for &T {
    fn resolve(&self, id: &str) -> Option<OptionContract> {
        (**self).resolve(id)
    }
}

impl InstrumentResolver for HashMap<String, OptionContract> {
    fn resolve(&self, id: &str) -> Option<OptionContract> {
        self.get(id).cloned()
    }
}

impl InstrumentResolver for BTreeMap<String, OptionContract> {
    fn resolve(&self, id: &str) -> Option<OptionContract> {
        self.get(id).cloned()
    }
}

/// The identifier part of an instrument reference.
///
/// `https://api.example.com/options/instruments/<uuid>/` yields `<uuid>`;
/// a bare identifier is returned unchanged.
///
/// ```
/// use lotledger_importer::instrument_id;
///
/// assert_eq!(instrument_id("https://broker/instruments/abc-123/"), "abc-123");
/// assert_eq!(instrument_id("abc-123"), "abc-123");
/// ```
#[must_use]
pub fn instrument_id(reference: &str) -> &str {
    let trimmed = reference.trim().trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Single-leg option strategies the ledger can account for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyType {
    /// Bought call.
    LongCall,
    /// Bought put.
    LongPut,
    /// Written call.
    ShortCall,
    /// Written put.
    ShortPut,
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "long_call" => Ok(Self::LongCall),
            "long_put" => Ok(Self::LongPut),
            "short_call" => Ok(Self::ShortCall),
            "short_put" => Ok(Self::ShortPut),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LongCall => "long_call",
            Self::LongPut => "long_put",
            Self::ShortCall => "short_call",
            Self::ShortPut => "short_put",
        };
        f.write_str(name)
    }
}

/// A filled stock order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTradeRecord {
    /// Broker order identifier.
    pub id: String,
    /// Ticker symbol.
    pub ticker: String,
    /// Buy or sell.
    pub side: Side,
    /// Execution date.
    pub date: NaiveDate,
    /// Average fill price per share.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Filled shares.
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
}

/// One leg of an option order, already aggregated over its executions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLegRecord {
    /// Instrument reference (URL or bare identifier).
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

/// A filled option order and its legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionStrategyRecord {
    /// Broker order identifier.
    pub id: String,
    /// Strategy name, e.g. `long_call`.
    pub strategy_type: String,
    /// Legs of the order.
    pub legs: Vec<OptionLegRecord>,
}

/// A stock split entered by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Ticker symbol.
    pub ticker: String,
    /// Effective date.
    pub date: NaiveDate,
    /// Shares before.
    pub from_amount: u32,
    /// Shares after.
    pub to_amount: u32,
}

/// Turns raw records into validated ledger events.
///
/// Option legs are resolved to contracts through the injected
/// [`InstrumentResolver`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer<R> {
    resolver: R,
}

impl<R: InstrumentResolver> Normalizer<R> {
    /// Create a normalizer backed by `resolver`.
    pub const fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The resolver in use.
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Normalize a stock trade.
    pub fn stock_trade(&self, record: &StockTradeRecord) -> Result<TradeEvent, NormalizeError> {
        let event = TradeEvent::new(
            Instrument::stock(record.ticker.trim()),
            record.side,
            record.date,
            record.price,
            record.quantity,
        );
        event.validate()?;
        Ok(event)
    }

    /// Normalize an option order into one event per leg.
    ///
    /// Only single-leg strategies are accepted.
    pub fn option_strategy(
        &self,
        record: &OptionStrategyRecord,
    ) -> Result<Vec<TradeEvent>, NormalizeError> {
        let strategy: StrategyType =
            record
                .strategy_type
                .parse()
                .map_err(|_| NormalizeError::UnsupportedStrategy {
                    id: record.id.clone(),
                    strategy: record.strategy_type.clone(),
                    reason: "only single-leg calls and puts are handled".to_string(),
                })?;

        if record.legs.len() != 1 {
            return Err(NormalizeError::UnsupportedStrategy {
                id: record.id.clone(),
                strategy: record.strategy_type.clone(),
                reason: format!("expected exactly one leg, found {}", record.legs.len()),
            });
        }

        debug!(id = %record.id, %strategy, "normalizing option order");
        record.legs.iter().map(|leg| self.option_leg(leg)).collect()
    }

    /// Normalize a single option leg.
    pub fn option_leg(&self, leg: &OptionLegRecord) -> Result<TradeEvent, NormalizeError> {
        let contract = self
            .resolver
            .resolve(instrument_id(&leg.instrument))
            .ok_or_else(|| NormalizeError::UnresolvedInstrument {
                reference: leg.instrument.clone(),
            })?;

        let event = TradeEvent::new(
            Instrument::Option(contract),
            leg.side,
            leg.date,
            leg.price,
            leg.quantity,
        );
        event.validate()?;
        Ok(event)
    }

    /// Normalize a split.
    pub fn split(&self, record: &SplitRecord) -> Result<SplitEvent, NormalizeError> {
        let event = SplitEvent::new(
            record.ticker.trim(),
            record.date,
            record.from_amount,
            record.to_amount,
        );
        event.validate()?;
        Ok(event)
    }
}

/// Drop splits that repeat an earlier `(ticker, date)`.
///
/// Returns the kept splits in input order and the number dropped.
pub fn dedup_splits(splits: Vec<SplitEvent>) -> (Vec<SplitEvent>, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(splits.len());
    let mut dropped = 0;

    for split in splits {
        if seen.insert((split.ticker.clone(), split.date)) {
            kept.push(split);
        } else {
            warn!(ticker = %split.ticker, date = %split.date, "dropping duplicate split");
            dropped += 1;
        }
    }

    (kept, dropped)
}
