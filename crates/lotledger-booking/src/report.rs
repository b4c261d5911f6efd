//! Tabular realized-gains report.

use chrono::NaiveDate;
use lotledger_core::{total_earnings, RealizedSale};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Decimal places shown for prices and earnings.
pub const DISPLAY_DP: u32 = 2;

/// Column headers, in row order.
pub const COLUMNS: [&str; 7] = [
    "Name",
    "Date Bought",
    "Price Bought",
    "Date Sold",
    "Price Sold",
    "Quantity",
    "Earnings",
];

/// One report row, rounded for display.
///
/// Prices and earnings use banker's rounding to [`DISPLAY_DP`] places.
/// Quantity is truncated toward zero to a whole number, so fractional-share
/// sales lose their fraction here; use the underlying [`RealizedSale`] for
/// exact values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRow {
    /// Instrument key.
    #[serde(rename = "Name")]
    pub name: String,
    /// Acquisition date of the matched lot.
    #[serde(rename = "Date Bought")]
    pub date_bought: NaiveDate,
    /// Acquisition price per unit.
    #[serde(rename = "Price Bought")]
    pub price_bought: Decimal,
    /// Sell date.
    #[serde(rename = "Date Sold")]
    pub date_sold: NaiveDate,
    /// Sell price per unit.
    #[serde(rename = "Price Sold")]
    pub price_sold: Decimal,
    /// Whole units sold.
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    /// Realized gain.
    #[serde(rename = "Earnings")]
    pub earnings: Decimal,
}

impl From<&RealizedSale> for SaleRow {
    fn from(sale: &RealizedSale) -> Self {
        Self {
            name: sale.instrument.clone(),
            date_bought: sale.bought.date,
            price_bought: sale.bought.price.round_dp(DISPLAY_DP),
            date_sold: sale.sold.date,
            price_sold: sale.sold.price.round_dp(DISPLAY_DP),
            quantity: sale.quantity.trunc().to_i64().unwrap_or_default(),
            earnings: sale.earnings.round_dp(DISPLAY_DP),
        }
    }
}

impl SaleRow {
    /// Cell values in [`COLUMNS`] order.
    pub fn cells(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.date_bought.to_string(),
            format!("{:.2}", self.price_bought),
            self.date_sold.to_string(),
            format!("{:.2}", self.price_sold),
            self.quantity.to_string(),
            format!("{:.2}", self.earnings),
        ]
    }
}

/// Realized sales on or after a start date, as display rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleReport {
    rows: Vec<SaleRow>,
    total: Decimal,
}

impl SaleReport {
    /// Build the report from the sales sold on or after `from`.
    ///
    /// The total sums the unrounded earnings and rounds once.
    pub fn build(sales: &[RealizedSale], from: NaiveDate) -> Self {
        let included: Vec<RealizedSale> = sales
            .iter()
            .filter(|sale| sale.sold.date >= from)
            .cloned()
            .collect();

        Self {
            rows: included.iter().map(SaleRow::from).collect(),
            total: total_earnings(&included).round_dp(DISPLAY_DP),
        }
    }

    /// Report rows in sale order.
    pub fn rows(&self) -> &[SaleRow] {
        &self.rows
    }

    /// Total earnings, rounded.
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
