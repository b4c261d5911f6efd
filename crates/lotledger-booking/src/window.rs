//! The date range a gains report covers.

use chrono::NaiveDate;
use lotledger_core::{Event, LedgerError, RealizedSale};
use thiserror::Error;

use crate::replay::compute_realized_sales;

/// An inverted date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("report window starts on {from} but ends on {to}")]
pub struct WindowError {
    /// Requested start.
    pub from: NaiveDate,
    /// Requested end.
    pub to: NaiveDate,
}

/// An inclusive date range with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl ReportWindow {
    /// Create a window, rejecting `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, WindowError> {
        if from > to {
            return Err(WindowError { from, to });
        }
        Ok(Self { from, to })
    }

    /// First day included.
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day included.
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Realized sales sold inside this window.
    pub fn realized_sales(&self, events: &[Event]) -> Result<Vec<RealizedSale>, LedgerError> {
        compute_realized_sales(events, self.from, self.to)
    }
}
