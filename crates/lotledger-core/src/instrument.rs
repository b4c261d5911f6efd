//! Tradable instruments and the option-contract identifier.
//!
//! Every lot queue in the [`Portfolio`](crate::Portfolio) is keyed by an
//! instrument key. Stocks use their ticker. Options use a synthesized
//! contract signature so that repeated trades in the same contract always
//! land in the same queue.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of underlying shares controlled by one option contract.
pub const OPTION_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy the underlying.
    Call,
    /// Right to sell the underlying.
    Put,
}

impl OptionType {
    /// Single-letter code used in contract identifiers.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            _ => Err(format!("unknown option type: {s}")),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A single listed option contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price per share.
    pub strike: Decimal,
}

impl OptionContract {
    /// Create a new contract description.
    pub fn new(
        ticker: impl Into<String>,
        expiration: NaiveDate,
        option_type: OptionType,
        strike: Decimal,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            expiration,
            option_type,
            strike,
        }
    }

    /// The contract identifier: `{ticker}{YYMMDD}{C|P}{strike}`.
    ///
    /// The strike is written in thousandths of a dollar, zero padded to
    /// eight digits (five integer digits and three decimals without the
    /// point), so `150` becomes `00150000`.
    ///
    /// ```
    /// use lotledger_core::{OptionContract, OptionType};
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    ///
    /// let contract = OptionContract::new(
    ///     "AAPL",
    ///     NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
    ///     OptionType::Call,
    ///     dec!(150),
    /// );
    /// assert_eq!(contract.key(), "AAPL210115C00150000");
    /// ```
    #[must_use]
    pub fn key(&self) -> String {
        let thousandths = (self.strike * Decimal::ONE_THOUSAND).round();
        format!(
            "{}{}{}{:0>8}",
            self.ticker,
            self.expiration.format("%y%m%d"),
            self.option_type.code(),
            thousandths.to_string()
        )
    }
}

impl fmt::Display for OptionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.ticker, self.expiration, self.strike, self.option_type
        )
    }
}

/// Something that can be held in a lot queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Instrument {
    /// Common stock, keyed by ticker.
    Stock {
        /// Ticker symbol.
        ticker: String,
    },
    /// A single option contract.
    Option(OptionContract),
}

impl Instrument {
    /// Shorthand for a stock instrument.
    pub fn stock(ticker: impl Into<String>) -> Self {
        Self::Stock {
            ticker: ticker.into(),
        }
    }

    /// Key of the lot queue this instrument trades in.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Stock { ticker } => ticker.clone(),
            Self::Option(contract) => contract.key(),
        }
    }

    /// Underlying ticker (the stock itself, or the option's underlying).
    #[must_use]
    pub fn ticker(&self) -> &str {
        match self {
            Self::Stock { ticker } => ticker,
            Self::Option(contract) => &contract.ticker,
        }
    }

    /// Earnings multiplier: 1 for stocks, [`OPTION_MULTIPLIER`] for options.
    #[must_use]
    pub const fn multiplier(&self) -> Decimal {
        match self {
            Self::Stock { .. } => Decimal::ONE,
            Self::Option(_) => OPTION_MULTIPLIER,
        }
    }

    /// Whether this is an option contract.
    #[must_use]
    pub const fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
