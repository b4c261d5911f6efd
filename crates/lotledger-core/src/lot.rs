//! A lot: units of one instrument acquired at one price on one date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open, still-held slice of an instrument.
///
/// Lots are created by buys, consumed from the front of their queue by
/// sells, and rewritten only when a split changes the share count.
///
/// # Examples
///
/// ```
/// use lotledger_core::Lot;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let lot = Lot::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), dec!(30), dec!(10));
/// let (sold, kept) = lot.split(dec!(4));
/// assert_eq!(sold.quantity, dec!(4));
/// assert_eq!(kept.quantity, dec!(6));
/// assert_eq!(kept.unit_price, dec!(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lot {
    /// Date the units were bought.
    pub acquisition_date: NaiveDate,
    /// Price paid per unit.
    pub unit_price: Decimal,
    /// Units still held.
    pub quantity: Decimal,
}

impl Lot {
    /// Create a new lot.
    #[must_use]
    pub const fn new(acquisition_date: NaiveDate, unit_price: Decimal, quantity: Decimal) -> Self {
        Self {
            acquisition_date,
            unit_price,
            quantity,
        }
    }

    /// Whether no units remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Total cost of the units still held.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        self.unit_price * self.quantity
    }

    /// Split into `(taken, remaining)` where `taken` holds `quantity` units.
    ///
    /// Both halves keep the acquisition date and unit price.
    #[must_use]
    pub fn split(&self, quantity: Decimal) -> (Self, Self) {
        let taken = Self::new(self.acquisition_date, self.unit_price, quantity);
        let remaining = Self::new(
            self.acquisition_date,
            self.unit_price,
            self.quantity - quantity,
        );
        (taken, remaining)
    }

    /// The same lot after a `from_amount`-to-`to_amount` split.
    #[must_use]
    pub fn after_split(&self, from_amount: u32, to_amount: u32) -> Self {
        let from = Decimal::from(from_amount);
        let to = Decimal::from(to_amount);
        Self::new(
            self.acquisition_date,
            self.unit_price * from / to,
            self.quantity * to / from,
        )
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({})",
            self.quantity, self.unit_price, self.acquisition_date
        )
    }
}
