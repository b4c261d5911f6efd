//! Replaying an event stream through a fresh portfolio.

use chrono::NaiveDate;
use lotledger_core::{Event, LedgerError, Portfolio, RealizedSale};
use tracing::{debug, info};

/// Replay every event on a fresh [`Portfolio`].
///
/// Returns the final portfolio and every realized sale in the order the
/// sells occurred. The first ledger error aborts the replay.
pub fn replay(events: &[Event]) -> Result<(Portfolio, Vec<RealizedSale>), LedgerError> {
    let mut portfolio = Portfolio::new();
    let mut sales = Vec::new();

    for event in events {
        sales.extend(portfolio.apply(event)?);
    }

    info!(
        events = events.len(),
        sales = sales.len(),
        open_instruments = portfolio.instruments().len(),
        "replay complete"
    );
    Ok((portfolio, sales))
}

/// Replay the events dated on or before `to`.
pub fn replay_until(
    events: &[Event],
    to: NaiveDate,
) -> Result<(Portfolio, Vec<RealizedSale>), LedgerError> {
    let included: Vec<Event> = events
        .iter()
        .filter(|event| event.date() <= to)
        .cloned()
        .collect();
    debug!(
        included = included.len(),
        skipped = events.len() - included.len(),
        %to,
        "replaying up to date"
    );
    replay(&included)
}

/// Realized sales sold within `from..=to`.
///
/// Every event dated on or before `to` is replayed, including those before
/// `from`, since earlier buys supply the lots later sells consume. Only the
/// sales whose sell date is on or after `from` are returned. On error no
/// sales are returned.
pub fn compute_realized_sales(
    events: &[Event],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<RealizedSale>, LedgerError> {
    let (_, sales) = replay_until(events, to)?;
    Ok(sales.into_iter().filter(|sale| sale.sold.date >= from).collect())
}

/// Events that touch `ticker`: its stock trades, its splits, and trades of
/// options on it.
///
/// Instruments never interact, so replaying the subset yields exactly the
/// sales of that ticker.
pub fn filter_ticker(events: &[Event], ticker: &str) -> Vec<Event> {
    events
        .iter()
        .filter(|event| match event {
            Event::Split(split) => split.ticker == ticker,
            Event::Stock(trade) | Event::Option(trade) => trade.instrument.ticker() == ticker,
        })
        .cloned()
        .collect()
}
