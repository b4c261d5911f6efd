//! Realized sales produced by the ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a matched sale: when and at what price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fill {
    /// Trade date.
    pub date: NaiveDate,
    /// Price per unit.
    pub price: Decimal,
}

impl Fill {
    /// Create a new fill.
    #[must_use]
    pub const fn new(date: NaiveDate, price: Decimal) -> Self {
        Self { date, price }
    }
}

/// A sell matched against (part of) one lot.
///
/// `earnings = quantity * (sold.price - bought.price) * multiplier`, where
/// the multiplier is 100 for option contracts and 1 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealizedSale {
    /// Instrument key the lot was held under.
    pub instrument: String,
    /// Acquisition side of the matched lot.
    pub bought: Fill,
    /// The sell that consumed it.
    pub sold: Fill,
    /// Units consumed from the lot.
    pub quantity: Decimal,
    /// Realized gain (negative for a loss).
    pub earnings: Decimal,
}

impl RealizedSale {
    /// Match `quantity` units bought at `bought` against a sell at `sold`.
    pub fn new(instrument: impl Into<String>, bought: Fill, sold: Fill, quantity: Decimal) -> Self {
        Self {
            instrument: instrument.into(),
            bought,
            sold,
            quantity,
            earnings: quantity * (sold.price - bought.price),
        }
    }

    /// The same sale with earnings scaled by `multiplier`.
    #[must_use]
    pub fn scaled(mut self, multiplier: Decimal) -> Self {
        self.earnings *= multiplier;
        self
    }
}

impl fmt::Display for RealizedSale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} bought {} @ {}, sold {} @ {}, earnings {}",
            self.instrument,
            self.quantity,
            self.bought.date,
            self.bought.price,
            self.sold.date,
            self.sold.price,
            self.earnings
        )
    }
}

/// Sum of earnings across sales.
#[must_use]
pub fn total_earnings(sales: &[RealizedSale]) -> Decimal {
    sales.iter().map(|s| s.earnings).sum()
}
