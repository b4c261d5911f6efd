//! Net cash put into the account.

use chrono::NaiveDate;
use lotledger_core::Transfer;
use rust_decimal::Decimal;
use tracing::debug;

/// Completed deposits minus completed withdrawals dated on or before `as_of`.
///
/// Pending, cancelled and failed transfers are ignored.
pub fn net_deposits(transfers: &[Transfer], as_of: NaiveDate) -> Decimal {
    let counted: Vec<&Transfer> = transfers
        .iter()
        .filter(|transfer| transfer.is_completed() && transfer.date <= as_of)
        .collect();

    debug!(
        counted = counted.len(),
        ignored = transfers.len() - counted.len(),
        %as_of,
        "summing transfers"
    );
    counted.iter().map(|transfer| transfer.signed_amount()).sum()
}
