//! Cash transfers between a bank account and the brokerage account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    /// Into the brokerage account.
    Deposit,
    /// Out of the brokerage account.
    Withdraw,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// One ACH transfer as reported by the broker.
///
/// Only transfers in the [`COMPLETED`](Self::COMPLETED) state moved money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Broker identifier.
    pub id: String,
    /// Direction of the transfer.
    pub direction: TransferDirection,
    /// Broker state, e.g. `completed`, `pending` or `cancelled`.
    pub state: String,
    /// Amount moved, always positive.
    pub amount: Decimal,
    /// Date the transfer last changed state.
    pub date: NaiveDate,
}

impl Transfer {
    /// State of a transfer that has settled.
    pub const COMPLETED: &'static str = "completed";

    /// Whether the transfer settled.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == Self::COMPLETED
    }

    /// Amount with deposits positive and withdrawals negative.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            TransferDirection::Deposit => self.amount,
            TransferDirection::Withdraw => -self.amount,
        }
    }
}
