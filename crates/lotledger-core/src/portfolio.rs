//! The FIFO lot ledger.
//!
//! A [`Portfolio`] keeps one queue of open [`Lot`]s per instrument key,
//! oldest first. Buys append to the back, sells consume from the front, and
//! splits rewrite every lot of the split ticker.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::{Event, EventError, Fill, Instrument, Lot, RealizedSale, SplitEvent, TradeEvent, OPTION_MULTIPLIER};

/// A replay-fatal ledger error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A sell asked for more units than the queue holds.
    #[error("cannot sell {requested} {instrument}: only {available} held")]
    InsufficientInventory {
        /// Instrument key.
        instrument: String,
        /// Units the sell asked for.
        requested: Decimal,
        /// Units held before the sell.
        available: Decimal,
    },
    /// The split merges shares instead of multiplying them.
    #[error("unsupported {from_amount}-to-{to_amount} split of {ticker}: only forward splits are handled")]
    UnsupportedSplitDirection {
        /// Ticker of the split.
        ticker: String,
        /// Shares before.
        from_amount: u32,
        /// Shares after.
        to_amount: u32,
    },
    /// The split has a zero amount on one side.
    #[error(transparent)]
    MalformedSplit(#[from] EventError),
}

/// Open lots for every instrument, keyed by instrument key.
///
/// A portfolio is a replay artifact: build it empty, feed it events in date
/// order, read the sales it returns, then drop it.
///
/// # Examples
///
/// ```
/// use lotledger_core::{Portfolio, TradeEvent};
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let mut portfolio = Portfolio::new();
/// portfolio.buy(&TradeEvent::buy("AAPL", day(1), dec!(10), dec!(10)));
/// portfolio.buy(&TradeEvent::buy("AAPL", day(2), dec!(20), dec!(10)));
///
/// let sales = portfolio
///     .sell(&TradeEvent::sell("AAPL", day(3), dec!(30), dec!(15)))
///     .unwrap();
///
/// assert_eq!(sales.len(), 2);
/// assert_eq!(sales[0].earnings, dec!(200));
/// assert_eq!(sales[1].earnings, dec!(50));
/// assert_eq!(portfolio.quantity("AAPL"), dec!(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    instruments: BTreeMap<String, VecDeque<Lot>>,
}

impl Portfolio {
    /// Create an empty portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no lots are held at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.values().all(VecDeque::is_empty)
    }

    /// Open lots of an instrument, oldest first.
    #[must_use]
    pub fn lots(&self, key: &str) -> Vec<Lot> {
        self.instruments
            .get(key)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Units held of an instrument.
    #[must_use]
    pub fn quantity(&self, key: &str) -> Decimal {
        self.instruments
            .get(key)
            .map_or(Decimal::ZERO, |queue| queue.iter().map(|lot| lot.quantity).sum())
    }

    /// Keys of every instrument with open lots, sorted.
    #[must_use]
    pub fn instruments(&self) -> Vec<&str> {
        self.instruments
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Apply one event, returning any sales it realizes.
    ///
    /// Trades dispatch on their side; option legs sell through
    /// [`sell_option`](Self::sell_option).
    pub fn apply(&mut self, event: &Event) -> Result<Vec<RealizedSale>, LedgerError> {
        debug!(kind = event.type_name(), %event, "applying event");
        match event {
            Event::Split(split) => {
                self.apply_split(split)?;
                Ok(Vec::new())
            }
            Event::Stock(trade) | Event::Option(trade) => match trade.side {
                crate::Side::Buy => {
                    self.buy(trade);
                    Ok(Vec::new())
                }
                crate::Side::Sell => self.sell(trade),
            },
        }
    }

    /// Append a new lot to the back of the instrument's queue.
    ///
    /// The event's side is not consulted.
    pub fn buy(&mut self, event: &TradeEvent) {
        self.instruments
            .entry(event.instrument.key())
            .or_default()
            .push_back(Lot::new(event.date, event.price, event.quantity));
    }

    /// Consume `event.quantity` units FIFO and report one sale per lot touched.
    ///
    /// Option instruments go through [`sell_option`](Self::sell_option).
    /// If fewer units are held than requested the portfolio is left
    /// unchanged and [`LedgerError::InsufficientInventory`] is returned.
    pub fn sell(&mut self, event: &TradeEvent) -> Result<Vec<RealizedSale>, LedgerError> {
        match event.instrument {
            Instrument::Option(_) => self.sell_option(event),
            Instrument::Stock { .. } => self.match_fifo(event),
        }
    }

    /// Sell option contracts: FIFO matching by contract count, with each
    /// sale's earnings multiplied by [`OPTION_MULTIPLIER`].
    pub fn sell_option(&mut self, event: &TradeEvent) -> Result<Vec<RealizedSale>, LedgerError> {
        let sales = self.match_fifo(event)?;
        Ok(sales
            .into_iter()
            .map(|sale| sale.scaled(OPTION_MULTIPLIER))
            .collect())
    }

    /// Rewrite every lot of `split.ticker` for a forward split.
    ///
    /// Prices are multiplied by `from/to` and quantities by `to/from`;
    /// acquisition dates are kept.
    pub fn apply_split(&mut self, split: &SplitEvent) -> Result<(), LedgerError> {
        split.validate()?;
        if !split.is_forward() {
            return Err(LedgerError::UnsupportedSplitDirection {
                ticker: split.ticker.clone(),
                from_amount: split.from_amount,
                to_amount: split.to_amount,
            });
        }

        let Some(queue) = self.instruments.get_mut(&split.ticker) else {
            debug!(ticker = %split.ticker, "split for instrument with no open lots");
            return Ok(());
        };

        for lot in queue.iter_mut() {
            *lot = lot.after_split(split.from_amount, split.to_amount);
        }
        Ok(())
    }

    /// Take `event.quantity` units from the front of the queue.
    ///
    /// Availability is checked before any lot is touched.
    fn match_fifo(&mut self, event: &TradeEvent) -> Result<Vec<RealizedSale>, LedgerError> {
        let key = event.instrument.key();
        let available = self.quantity(&key);
        if available < event.quantity {
            return Err(LedgerError::InsufficientInventory {
                instrument: key,
                requested: event.quantity,
                available,
            });
        }

        let sold = Fill::new(event.date, event.price);
        let mut remaining = event.quantity;
        let mut sales = Vec::new();

        if let Some(queue) = self.instruments.get_mut(&key) {
            while remaining > Decimal::ZERO {
                let Some(lot) = queue.pop_front() else {
                    break;
                };

                let taken = if lot.quantity <= remaining {
                    lot
                } else {
                    let (taken, rest) = lot.split(remaining);
                    queue.push_front(rest);
                    taken
                };

                remaining -= taken.quantity;
                debug!(
                    instrument = %key,
                    quantity = %taken.quantity,
                    bought = %taken.acquisition_date,
                    "matched lot"
                );
                sales.push(RealizedSale::new(
                    key.clone(),
                    Fill::new(taken.acquisition_date, taken.unit_price),
                    sold,
                    taken.quantity,
                ));
            }

            if queue.is_empty() {
                self.instruments.remove(&key);
            }
        }

        Ok(sales)
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }

        for (i, (key, queue)) in self
            .instruments
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .enumerate()
        {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{key}: ")?;
            for (j, lot) in queue.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{lot}")?;
            }
        }
        Ok(())
    }
}
