//! Normalized trade and split events.
//!
//! These are the only inputs the ledger understands. Raw brokerage records
//! are mapped to them upstream and validated with [`TradeEvent::validate`]
//! and [`SplitEvent::validate`] before a replay starts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Instrument;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Opens or adds to a position.
    Buy,
    /// Closes or reduces a position.
    Sell,
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(format!("unknown side: {s}")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A rejected event: required values missing or out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Trade quantity is zero or negative.
    #[error("malformed {instrument} trade on {date}: quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// Instrument key of the trade.
        instrument: String,
        /// Trade date.
        date: NaiveDate,
        /// The offending quantity.
        quantity: Decimal,
    },
    /// Trade price is zero or negative.
    #[error("malformed {instrument} trade on {date}: price must be positive, got {price}")]
    NonPositivePrice {
        /// Instrument key of the trade.
        instrument: String,
        /// Trade date.
        date: NaiveDate,
        /// The offending price.
        price: Decimal,
    },
    /// A split ratio side is zero.
    #[error("malformed {ticker} split on {date}: {from_amount}-for-{to_amount} has a zero amount")]
    ZeroSplitAmount {
        /// Ticker of the split.
        ticker: String,
        /// Split date.
        date: NaiveDate,
        /// Shares before.
        from_amount: u32,
        /// Shares after.
        to_amount: u32,
    },
}

/// A buy or sell of one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// What was traded.
    pub instrument: Instrument,
    /// Buy or sell.
    pub side: Side,
    /// Effective date.
    pub date: NaiveDate,
    /// Price per share (per-share premium for options).
    pub price: Decimal,
    /// Shares, or contracts for options.
    pub quantity: Decimal,
}

impl TradeEvent {
    /// Create a new trade event.
    #[must_use]
    pub const fn new(
        instrument: Instrument,
        side: Side,
        date: NaiveDate,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            instrument,
            side,
            date,
            price,
            quantity,
        }
    }

    /// Shorthand for a stock buy.
    pub fn buy(ticker: impl Into<String>, date: NaiveDate, price: Decimal, quantity: Decimal) -> Self {
        Self::new(Instrument::stock(ticker), Side::Buy, date, price, quantity)
    }

    /// Shorthand for a stock sell.
    pub fn sell(ticker: impl Into<String>, date: NaiveDate, price: Decimal, quantity: Decimal) -> Self {
        Self::new(Instrument::stock(ticker), Side::Sell, date, price, quantity)
    }

    /// Check that quantity and price are positive.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.quantity <= Decimal::ZERO {
            return Err(EventError::NonPositiveQuantity {
                instrument: self.instrument.key(),
                date: self.date,
                quantity: self.quantity,
            });
        }
        if self.price <= Decimal::ZERO {
            return Err(EventError::NonPositivePrice {
                instrument: self.instrument.key(),
                date: self.date,
                price: self.price,
            });
        }
        Ok(())
    }
}

impl fmt::Display for TradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} @ {}",
            self.date, self.side, self.instrument, self.quantity, self.price
        )
    }
}

/// A stock split: every `from_amount` shares become `to_amount` shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEvent {
    /// Ticker being split.
    pub ticker: String,
    /// Effective date.
    pub date: NaiveDate,
    /// Shares before the split.
    pub from_amount: u32,
    /// Shares after the split.
    pub to_amount: u32,
}

impl SplitEvent {
    /// Create a new split event.
    pub fn new(ticker: impl Into<String>, date: NaiveDate, from_amount: u32, to_amount: u32) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            from_amount,
            to_amount,
        }
    }

    /// Whether shares multiply (`from_amount < to_amount`).
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        self.from_amount < self.to_amount
    }

    /// Check that neither side of the ratio is zero.
    ///
    /// Direction is not checked here; the ledger rejects reverse splits
    /// when it applies them.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.from_amount == 0 || self.to_amount == 0 {
            return Err(EventError::ZeroSplitAmount {
                ticker: self.ticker.clone(),
                date: self.date,
                from_amount: self.from_amount,
                to_amount: self.to_amount,
            });
        }
        Ok(())
    }
}

impl fmt::Display for SplitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} split {} {}-for-{}",
            self.date, self.ticker, self.to_amount, self.from_amount
        )
    }
}
