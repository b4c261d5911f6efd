//! Open positions after a replay.

use chrono::NaiveDate;
use lotledger_core::Portfolio;
use rust_decimal::Decimal;
use serde::Serialize;

/// Summary of the open lots of one instrument.
///
/// Cost figures are in per-unit price terms: for options that is the
/// per-share premium times the contract count, without the multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holding {
    /// Instrument key.
    pub instrument: String,
    /// Number of open lots.
    pub lots: usize,
    /// Units held.
    pub quantity: Decimal,
    /// Cost basis divided by quantity.
    pub average_cost: Decimal,
    /// Sum of price times quantity over the open lots.
    pub cost_basis: Decimal,
    /// Acquisition date of the oldest open lot.
    pub first_acquired: NaiveDate,
}

/// One [`Holding`] per instrument with open lots, sorted by instrument key.
pub fn holdings(portfolio: &Portfolio) -> Vec<Holding> {
    portfolio
        .instruments()
        .into_iter()
        .filter_map(|key| {
            let lots = portfolio.lots(key);
            let first_acquired = lots.first()?.acquisition_date;
            let quantity: Decimal = lots.iter().map(|lot| lot.quantity).sum();
            let cost_basis: Decimal = lots.iter().map(|lot| lot.cost_basis()).sum();
            let average_cost = if quantity.is_zero() {
                Decimal::ZERO
            } else {
                cost_basis / quantity
            };

            Some(Holding {
                instrument: key.to_string(),
                lots: lots.len(),
                quantity,
                average_cost,
                cost_basis,
                first_acquired,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotledger_core::TradeEvent;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_holdings_sorted_with_averages() {
        let mut portfolio = Portfolio::new();
        portfolio.buy(&TradeEvent::buy("MSFT", date(2020, 1, 5), dec!(100), dec!(1)));
        portfolio.buy(&TradeEvent::buy("AAPL", date(2020, 1, 1), dec!(10), dec!(10)));
        portfolio.buy(&TradeEvent::buy("AAPL", date(2020, 1, 2), dec!(20), dec!(10)));

        let holdings = holdings(&portfolio);
        assert_eq!(holdings.len(), 2);

        let aapl = &holdings[0];
        assert_eq!(aapl.instrument, "AAPL");
        assert_eq!(aapl.lots, 2);
        assert_eq!(aapl.quantity, dec!(20));
        assert_eq!(aapl.cost_basis, dec!(300));
        assert_eq!(aapl.average_cost, dec!(15));
        assert_eq!(aapl.first_acquired, date(2020, 1, 1));

        assert_eq!(holdings[1].instrument, "MSFT");
    }

    #[test]
    fn test_empty_portfolio_has_no_holdings() {
        assert!(holdings(&Portfolio::new()).is_empty());
    }
}
