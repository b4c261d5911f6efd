//! Replay driver and reports for lotledger.
//!
//! This crate provides:
//! - Replaying a sequenced event stream ([`replay`], [`compute_realized_sales`])
//! - The realized-gains report ([`SaleReport`])
//! - Open positions after a replay ([`holdings`])
//! - Net deposits from cash transfers ([`net_deposits`])
//!
//! # Realized gains
//!
//! ```
//! use lotledger_booking::{compute_realized_sales, SaleReport};
//! use lotledger_core::{sequence, TradeEvent};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let day = |m, d| NaiveDate::from_ymd_opt(2020, m, d).unwrap();
//! let events = sequence(
//!     vec![
//!         TradeEvent::buy("AAPL", day(1, 1), dec!(10), dec!(10)),
//!         TradeEvent::buy("AAPL", day(1, 2), dec!(20), dec!(10)),
//!         TradeEvent::sell("AAPL", day(1, 3), dec!(30), dec!(15)),
//!     ],
//!     vec![],
//!     vec![],
//! );
//!
//! let sales = compute_realized_sales(&events, day(1, 1), day(12, 31)).unwrap();
//! let report = SaleReport::build(&sales, day(1, 1));
//! assert_eq!(report.len(), 2);
//! assert_eq!(report.total(), dec!(250));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cash;
mod holdings;
mod replay;
mod report;
mod window;

pub use cash::net_deposits;
pub use holdings::{holdings, Holding};
pub use replay::{compute_realized_sales, filter_ticker, replay, replay_until};
pub use report::{SaleReport, SaleRow, COLUMNS, DISPLAY_DP};
pub use window::{ReportWindow, WindowError};
