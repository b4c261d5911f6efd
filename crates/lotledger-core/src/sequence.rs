//! Merging trade and split sources into one chronological stream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{SplitEvent, TradeEvent};

/// Any event the ledger replays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A stock split.
    Split(SplitEvent),
    /// A stock buy or sell.
    Stock(TradeEvent),
    /// A single option leg buy or sell.
    Option(TradeEvent),
}

/// Ordering of event kinds that share a date.
///
/// Splits come first so that trades reported on the split date, which the
/// broker already quotes in post-split shares, meet adjusted lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    /// Stock splits.
    Split = 0,
    /// Stock trades.
    Stock = 1,
    /// Option leg trades.
    Option = 2,
}

impl Event {
    /// Effective date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Split(split) => split.date,
            Self::Stock(trade) | Self::Option(trade) => trade.date,
        }
    }

    /// Tie-break rank for events on the same date.
    #[must_use]
    pub const fn priority(&self) -> EventPriority {
        match self {
            Self::Split(_) => EventPriority::Split,
            Self::Stock(_) => EventPriority::Stock,
            Self::Option(_) => EventPriority::Option,
        }
    }

    /// Short name of the event kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Split(_) => "split",
            Self::Stock(_) => "stock",
            Self::Option(_) => "option",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Split(split) => write!(f, "{split}"),
            Self::Stock(trade) | Self::Option(trade) => write!(f, "{trade}"),
        }
    }
}

/// Sort events by date, then by [`EventPriority`].
///
/// The sort is stable, so events of one kind on one date keep their input
/// order.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| a.priority().cmp(&b.priority()))
    });
}

/// Merge the three event sources into one date-ascending stream.
///
/// Inputs need not be sorted. Output order is deterministic for a given
/// input: date, then kind (splits, stock trades, option trades), then the
/// position within the source.
#[must_use]
pub fn sequence(
    stock_trades: Vec<TradeEvent>,
    splits: Vec<SplitEvent>,
    option_trades: Vec<TradeEvent>,
) -> Vec<Event> {
    let mut events: Vec<Event> =
        Vec::with_capacity(stock_trades.len() + splits.len() + option_trades.len());
    events.extend(splits.into_iter().map(Event::Split));
    events.extend(stock_trades.into_iter().map(Event::Stock));
    events.extend(option_trades.into_iter().map(Event::Option));
    sort_events(&mut events);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_sequence_orders_by_date() {
        let events = sequence(
            vec![
                TradeEvent::sell("AAPL", date(2020, 3, 1), dec!(12), dec!(5)),
                TradeEvent::buy("AAPL", date(2020, 1, 1), dec!(30), dec!(5)),
            ],
            vec![SplitEvent::new("AAPL", date(2020, 2, 1), 1, 3)],
            vec![],
        );

        let dates: Vec<NaiveDate> = events.iter().map(Event::date).collect();
        assert_eq!(dates, [date(2020, 1, 1), date(2020, 2, 1), date(2020, 3, 1)]);
        assert_eq!(events[1].type_name(), "split");
    }

    #[test]
    fn test_same_date_tie_break() {
        let day = date(2020, 8, 31);
        let events = sequence(
            vec![TradeEvent::buy("AAPL", day, dec!(125), dec!(4))],
            vec![SplitEvent::new("AAPL", day, 1, 4)],
            vec![TradeEvent::buy("SPY", day, dec!(3), dec!(1))],
        );

        let kinds: Vec<&str> = events.iter().map(Event::type_name).collect();
        assert_eq!(kinds, ["split", "stock", "option"]);
    }

    #[test]
    fn test_stable_within_source() {
        let day = date(2020, 5, 5);
        let first = TradeEvent::buy("AAPL", day, dec!(10), dec!(1));
        let second = TradeEvent::sell("AAPL", day, dec!(11), dec!(1));
        let events = sequence(vec![first.clone(), second.clone()], vec![], vec![]);

        assert_eq!(events, [Event::Stock(first), Event::Stock(second)]);
    }

    #[test]
    fn test_sequence_empty() {
        assert!(sequence(vec![], vec![], vec![]).is_empty());
    }
}
