//! Property-based tests for lotledger-core.
//!
//! These tests verify ledger invariants hold for arbitrary buy/sell
//! sequences using proptest.
//!
//! Run with: cargo test -p lotledger-core --test `property_tests`

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use lotledger_core::{
    total_earnings, Event, LedgerError, Portfolio, RealizedSale, SplitEvent, TradeEvent,
};

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_price() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// A buy or a sell request; `true` means buy.
fn arb_orders() -> impl Strategy<Value = Vec<(bool, Decimal, Decimal)>> {
    prop::collection::vec((any::<bool>(), arb_price(), arb_quantity()), 1..40)
}

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(offset as u64)
}

/// Turn orders into events, skipping sells that would oversell.
fn feasible_events(orders: &[(bool, Decimal, Decimal)]) -> Vec<Event> {
    let mut held = Decimal::ZERO;
    let mut events = Vec::new();
    for (i, (is_buy, price, quantity)) in orders.iter().enumerate() {
        if *is_buy {
            held += quantity;
            events.push(Event::Stock(TradeEvent::buy("AAPL", day(i), *price, *quantity)));
        } else if *quantity <= held {
            held -= quantity;
            events.push(Event::Stock(TradeEvent::sell("AAPL", day(i), *price, *quantity)));
        }
    }
    events
}

fn replay(events: &[Event]) -> Result<(Portfolio, Vec<RealizedSale>), LedgerError> {
    let mut portfolio = Portfolio::new();
    let mut sales = Vec::new();
    for event in events {
        sales.extend(portfolio.apply(event)?);
    }
    Ok((portfolio, sales))
}

// ============================================================================
// Ledger Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Held quantity equals buys minus sells and is never negative.
    #[test]
    fn prop_quantity_conserved(orders in arb_orders()) {
        let events = feasible_events(&orders);
        let mut portfolio = Portfolio::new();
        let mut expected = Decimal::ZERO;

        for event in &events {
            portfolio.apply(event).unwrap();
            if let Event::Stock(trade) = event {
                match trade.side {
                    lotledger_core::Side::Buy => expected += trade.quantity,
                    lotledger_core::Side::Sell => expected -= trade.quantity,
                }
            }
            let held = portfolio.quantity("AAPL");
            prop_assert!(held >= Decimal::ZERO);
            prop_assert_eq!(held, expected);
        }
    }

    /// Every sale's quantity adds up to the sell it came from.
    #[test]
    fn prop_sales_cover_sell_quantity(orders in arb_orders()) {
        let events = feasible_events(&orders);
        let mut portfolio = Portfolio::new();

        for event in &events {
            let sales = portfolio.apply(event).unwrap();
            if let Event::Stock(trade) = event {
                if trade.side == lotledger_core::Side::Sell {
                    let matched: Decimal = sales.iter().map(|s| s.quantity).sum();
                    prop_assert_eq!(matched, trade.quantity);
                    prop_assert!(sales.iter().all(|s| s.quantity > Decimal::ZERO));
                }
            }
        }
    }

    /// Open lots stay in acquisition order and none is empty.
    #[test]
    fn prop_lots_ordered_and_non_empty(orders in arb_orders()) {
        let events = feasible_events(&orders);
        let (portfolio, _) = replay(&events).unwrap();
        let lots = portfolio.lots("AAPL");

        prop_assert!(lots.iter().all(|lot| !lot.is_empty()));
        prop_assert!(lots
            .windows(2)
            .all(|pair| pair[0].acquisition_date <= pair[1].acquisition_date));
    }

    /// Replaying the same stream twice gives identical sales.
    #[test]
    fn prop_replay_deterministic(orders in arb_orders()) {
        let events = feasible_events(&orders);
        let (first_portfolio, first) = replay(&events).unwrap();
        let (second_portfolio, second) = replay(&events).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_portfolio, second_portfolio);
    }

    /// Realized earnings equal proceeds minus the cost of what was removed.
    #[test]
    fn prop_earnings_match_cost_removed(orders in arb_orders()) {
        let events = feasible_events(&orders);
        let (portfolio, sales) = replay(&events).unwrap();

        let mut bought_cost = Decimal::ZERO;
        let mut proceeds = Decimal::ZERO;
        for event in &events {
            if let Event::Stock(trade) = event {
                match trade.side {
                    lotledger_core::Side::Buy => bought_cost += trade.price * trade.quantity,
                    lotledger_core::Side::Sell => proceeds += trade.price * trade.quantity,
                }
            }
        }
        let open_cost: Decimal = portfolio.lots("AAPL").iter().map(|lot| lot.cost_basis()).sum();

        prop_assert_eq!(total_earnings(&sales), proceeds - (bought_cost - open_cost));
    }

    /// A sell of more than is held fails and leaves the portfolio unchanged.
    #[test]
    fn prop_oversell_rolls_back(orders in arb_orders(), extra in arb_quantity()) {
        let events = feasible_events(&orders);
        let (mut portfolio, _) = replay(&events).unwrap();
        let before = portfolio.clone();
        let held = portfolio.quantity("AAPL");

        let result = portfolio.sell(&TradeEvent::sell("AAPL", day(100), Decimal::ONE, held + extra));

        let is_insufficient = matches!(result, Err(LedgerError::InsufficientInventory { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(portfolio, before);
    }

    /// A forward split keeps total cost basis and scales quantity by the ratio.
    #[test]
    fn prop_split_preserves_basis(
        orders in arb_orders(),
        from_amount in 1u32..5,
        extra in 1u32..10,
    ) {
        let to_amount = from_amount + extra;
        let events = feasible_events(&orders);
        let (mut portfolio, _) = replay(&events).unwrap();
        let held = portfolio.quantity("AAPL");
        let basis: Decimal = portfolio.lots("AAPL").iter().map(|lot| lot.cost_basis()).sum();

        portfolio
            .apply_split(&SplitEvent::new("AAPL", day(100), from_amount, to_amount))
            .unwrap();

        let ratio = Decimal::from(to_amount) / Decimal::from(from_amount);
        let split_basis: Decimal = portfolio.lots("AAPL").iter().map(|lot| lot.cost_basis()).sum();
        let tolerance = Decimal::new(1, 12);

        prop_assert!((portfolio.quantity("AAPL") - held * ratio).abs() <= tolerance);
        prop_assert!((split_basis - basis).abs() <= tolerance);
    }
}
