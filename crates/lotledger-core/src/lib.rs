//! Core types for lotledger
//!
//! This crate provides the data model and the FIFO lot ledger:
//!
//! - [`Lot`] - Units of an instrument bought at one price on one date
//! - [`Instrument`] - A stock ticker or an [`OptionContract`]
//! - [`TradeEvent`] / [`SplitEvent`] - Normalized inputs to the ledger
//! - [`Event`] and [`sequence`] - One chronological stream of inputs
//! - [`Portfolio`] - Per-instrument FIFO queues of open lots
//! - [`RealizedSale`] - A sell matched against (part of) one lot
//! - [`Transfer`] - Cash moved in or out of the account
//!
//! # Example
//!
//! ```
//! use lotledger_core::{sequence, Portfolio, SplitEvent, TradeEvent};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let day = |m, d| NaiveDate::from_ymd_opt(2020, m, d).unwrap();
//! let events = sequence(
//!     vec![
//!         TradeEvent::buy("AAPL", day(1, 2), dec!(30), dec!(10)),
//!         TradeEvent::sell("AAPL", day(3, 2), dec!(12), dec!(30)),
//!     ],
//!     vec![SplitEvent::new("AAPL", day(2, 3), 1, 3)],
//!     vec![],
//! );
//!
//! let mut portfolio = Portfolio::new();
//! let mut sales = Vec::new();
//! for event in &events {
//!     sales.extend(portfolio.apply(event).unwrap());
//! }
//!
//! // 10 @ 30 became 30 @ 10 after the split
//! assert_eq!(sales[0].earnings, dec!(60));
//! assert!(portfolio.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod event;
pub mod instrument;
pub mod lot;
pub mod portfolio;
pub mod sale;
pub mod sequence;
pub mod transfer;

pub use event::{EventError, Side, SplitEvent, TradeEvent};
pub use instrument::{Instrument, OptionContract, OptionType, OPTION_MULTIPLIER};
pub use lot::Lot;
pub use portfolio::{LedgerError, Portfolio};
pub use sale::{total_earnings, Fill, RealizedSale};
pub use sequence::{sequence, sort_events, Event, EventPriority};
pub use transfer::{Transfer, TransferDirection};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
