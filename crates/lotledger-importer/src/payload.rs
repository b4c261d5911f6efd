//! Raw brokerage order payloads.
//!
//! These are the order objects returned by the broker's order endpoints,
//! dumped to JSON arrays. Only the fields the ledger needs are read.

use chrono::{NaiveDate, NaiveDateTime};
use lotledger_core::Side;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::cache::TickerCache;
use crate::normalize::{
    instrument_id, NormalizeError, OptionLegRecord, OptionStrategyRecord, StockTradeRecord,
};

/// Order state of a completely executed order.
pub const FILLED: &str = "filled";

/// Parse a broker timestamp such as `2020-11-20T15:28:20.706000Z`.
///
/// The trailing `Z` and the fractional seconds are optional, since some
/// payloads omit them.
pub fn parse_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, NormalizeError> {
    let trimmed = value.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| NormalizeError::invalid(field, value, e))
}

/// The date part of a broker timestamp.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDate, NormalizeError> {
    parse_datetime(field, value).map(|datetime| datetime.date())
}

fn parse_decimal(field: &'static str, value: Option<&str>) -> Result<Decimal, NormalizeError> {
    let value = value.ok_or_else(|| NormalizeError::invalid(field, "", "missing"))?;
    Decimal::from_str(value.trim()).map_err(|e| NormalizeError::invalid(field, value, e))
}

/// A stock order.
#[derive(Debug, Clone, Deserialize)]
pub struct StockOrder {
    /// Order identifier.
    pub id: String,
    /// Order state.
    pub state: String,
    /// Buy or sell.
    pub side: Side,
    /// Instrument URL.
    pub instrument: String,
    /// Average fill price; absent until something fills.
    #[serde(default)]
    pub average_price: Option<String>,
    /// Shares filled so far.
    #[serde(default)]
    pub cumulative_quantity: Option<String>,
    /// Time of the last fill.
    #[serde(default)]
    pub last_transaction_at: Option<String>,
}

impl StockOrder {
    /// Whether the order executed completely.
    pub fn is_filled(&self) -> bool {
        self.state == FILLED
    }

    /// Time of the last fill.
    pub fn executed_at(&self) -> Result<NaiveDateTime, NormalizeError> {
        parse_datetime("last_transaction_at", self.timestamp()?)
    }

    fn timestamp(&self) -> Result<&str, NormalizeError> {
        self.last_transaction_at
            .as_deref()
            .ok_or_else(|| NormalizeError::invalid("last_transaction_at", "", "missing"))
    }

    /// Convert to a trade record, resolving the ticker through `tickers`.
    pub fn to_record(&self, tickers: &TickerCache) -> Result<StockTradeRecord, NormalizeError> {
        let ticker = tickers
            .ticker(instrument_id(&self.instrument))
            .ok_or_else(|| NormalizeError::UnresolvedInstrument {
                reference: self.instrument.clone(),
            })?;
        let timestamp = self.timestamp()?;

        Ok(StockTradeRecord {
            id: self.id.clone(),
            ticker: ticker.to_string(),
            side: self.side,
            date: parse_timestamp("last_transaction_at", timestamp)?,
            price: parse_decimal("average_price", self.average_price.as_deref())?,
            quantity: parse_decimal("cumulative_quantity", self.cumulative_quantity.as_deref())?,
        })
    }
}

/// One fill of an option leg.
#[derive(Debug, Clone, Deserialize)]
pub struct Execution {
    /// Premium per share.
    pub price: String,
    /// Contracts filled.
    pub quantity: String,
    /// Fill time.
    pub timestamp: String,
}

/// One leg of an option order.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionLeg {
    /// Option instrument URL.
    pub option: String,
    /// Buy or sell.
    pub side: Side,
    /// Fills of this leg.
    #[serde(default)]
    pub executions: Vec<Execution>,
}

impl OptionLeg {
    /// Aggregate the executions into one leg record.
    ///
    /// The date is the first execution's; price and quantity are averaged
    /// over all executions.
    pub fn to_record(&self) -> Result<OptionLegRecord, NormalizeError> {
        let first = self
            .executions
            .first()
            .ok_or_else(|| NormalizeError::invalid("executions", &self.option, "leg has no executions"))?;

        let mut price = Decimal::ZERO;
        let mut quantity = Decimal::ZERO;
        for execution in &self.executions {
            price += parse_decimal("price", Some(&execution.price))?;
            quantity += parse_decimal("quantity", Some(&execution.quantity))?;
        }
        let count = Decimal::from(self.executions.len());

        Ok(OptionLegRecord {
            instrument: self.option.clone(),
            side: self.side,
            date: parse_timestamp("timestamp", &first.timestamp)?,
            price: price / count,
            quantity: quantity / count,
        })
    }
}

/// An option order.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionOrder {
    /// Order identifier.
    pub id: String,
    /// Order state.
    pub state: String,
    /// Underlying ticker.
    #[serde(default)]
    pub chain_symbol: Option<String>,
    /// Strategy opened by this order, if it opens one.
    #[serde(default)]
    pub opening_strategy: Option<String>,
    /// Strategy closed by this order, if it closes one.
    #[serde(default)]
    pub closing_strategy: Option<String>,
    /// Legs of the order.
    #[serde(default)]
    pub legs: Vec<OptionLeg>,
}

impl OptionOrder {
    /// Whether the order executed completely.
    pub fn is_filled(&self) -> bool {
        self.state == FILLED
    }

    /// Earliest first-execution time over the legs, if any leg executed.
    ///
    /// This is the time the normalized legs are dated by.
    pub fn executed_at(&self) -> Result<Option<NaiveDateTime>, NormalizeError> {
        let mut earliest: Option<NaiveDateTime> = None;
        for leg in &self.legs {
            if let Some(first) = leg.executions.first() {
                let at = parse_datetime("timestamp", &first.timestamp)?;
                earliest = Some(earliest.map_or(at, |current| current.min(at)));
            }
        }
        Ok(earliest)
    }

    /// Convert to a strategy record with one aggregated record per leg.
    pub fn to_record(&self) -> Result<OptionStrategyRecord, NormalizeError> {
        let strategy_type = self
            .opening_strategy
            .as_deref()
            .or(self.closing_strategy.as_deref())
            .ok_or_else(|| NormalizeError::invalid("strategy", &self.id, "order has no strategy"))?;

        let legs = self
            .legs
            .iter()
            .map(OptionLeg::to_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OptionStrategyRecord {
            id: self.id.clone(),
            strategy_type: strategy_type.to_string(),
            legs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const STOCK_ORDER: &str = r#"{
        "id": "o1",
        "instrument": "https://api.broker.com/instruments/8f6e5846/",
        "cumulative_quantity": "34.00000000",
        "average_price": "45.22260000",
        "fees": "0.04",
        "state": "filled",
        "side": "sell",
        "last_transaction_at": "2020-11-20T15:28:20.706000Z"
    }"#;

    const OPTION_ORDER: &str = r#"{
        "id": "s1",
        "state": "filled",
        "chain_symbol": "OKTA",
        "opening_strategy": null,
        "closing_strategy": "long_call",
        "legs": [{
            "option": "https://api.broker.com/options/instruments/2cf55d12/",
            "side": "sell",
            "executions": [
                {"price": "40.00000000", "quantity": "1.00000", "timestamp": "2020-11-30T14:59:31.455000Z"},
                {"price": "42.00000000", "quantity": "1.00000", "timestamp": "2020-12-01T10:00:00Z"}
            ]
        }]
    }"#;

    fn tickers() -> TickerCache {
        let mut cache = TickerCache::default();
        cache.insert("8f6e5846", "WB");
        cache
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2020, 11, 20).unwrap();
        assert_eq!(parse_timestamp("t", "2020-11-20T15:28:20.706000Z").unwrap(), expected);
        assert_eq!(parse_timestamp("t", "2020-11-20T15:28:20Z").unwrap(), expected);
        assert_eq!(parse_timestamp("t", "2020-11-20T15:28:20").unwrap(), expected);
        assert!(matches!(
            parse_timestamp("t", "20/11/2020"),
            Err(NormalizeError::InvalidField { field: "t", .. })
        ));
    }

    #[test]
    fn test_parse_datetime_keeps_time_of_day() {
        let parsed = parse_datetime("t", "2020-11-20T15:28:20.706000Z").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2020, 11, 20).unwrap());
        assert_eq!(parsed.format("%H:%M:%S%.3f").to_string(), "15:28:20.706");
        assert!(parse_datetime("t", "2020-11-20T15:28:20Z").unwrap() < parsed);
    }

    #[test]
    fn test_stock_order_executed_at() {
        let order: StockOrder = serde_json::from_str(STOCK_ORDER).unwrap();
        let at = order.executed_at().unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2020-11-20 15:28:20");

        let missing = StockOrder {
            last_transaction_at: None,
            ..order
        };
        assert!(matches!(
            missing.executed_at(),
            Err(NormalizeError::InvalidField { field: "last_transaction_at", .. })
        ));
    }

    #[test]
    fn test_option_order_executed_at() {
        let order: OptionOrder = serde_json::from_str(OPTION_ORDER).unwrap();
        let at = order.executed_at().unwrap().unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2020-11-30 14:59:31");

        let json = r#"{"id": "s3", "state": "filled", "legs": []}"#;
        let order: OptionOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.executed_at().unwrap(), None);
    }

    #[test]
    fn test_stock_order_to_record() {
        let order: StockOrder = serde_json::from_str(STOCK_ORDER).unwrap();
        assert!(order.is_filled());

        let record = order.to_record(&tickers()).unwrap();
        assert_eq!(record.ticker, "WB");
        assert_eq!(record.side, Side::Sell);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2020, 11, 20).unwrap());
        assert_eq!(record.price, dec!(45.2226));
        assert_eq!(record.quantity, dec!(34));
    }

    #[test]
    fn test_stock_order_unknown_instrument() {
        let order: StockOrder = serde_json::from_str(STOCK_ORDER).unwrap();
        let err = order.to_record(&TickerCache::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::UnresolvedInstrument { .. }));
    }

    #[test]
    fn test_cancelled_order_without_fills_parses() {
        let json = r#"{"id": "o2", "state": "cancelled", "side": "buy",
            "instrument": "x", "average_price": null, "cumulative_quantity": "0.00000000",
            "last_transaction_at": "2020-11-20T15:28:20Z"}"#;
        let order: StockOrder = serde_json::from_str(json).unwrap();
        assert!(!order.is_filled());
    }

    #[test]
    fn test_option_order_averages_executions() {
        let order: OptionOrder = serde_json::from_str(OPTION_ORDER).unwrap();
        let record = order.to_record().unwrap();

        assert_eq!(record.strategy_type, "long_call");
        assert_eq!(record.legs.len(), 1);
        let leg = &record.legs[0];
        assert_eq!(leg.date, NaiveDate::from_ymd_opt(2020, 11, 30).unwrap());
        assert_eq!(leg.price, dec!(41));
        assert_eq!(leg.quantity, dec!(1));
        assert_eq!(leg.side, Side::Sell);
    }

    #[test]
    fn test_option_order_prefers_opening_strategy() {
        let json = r#"{"id": "s2", "state": "filled", "opening_strategy": "short_put",
            "closing_strategy": null, "legs": []}"#;
        let order: OptionOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.to_record().unwrap().strategy_type, "short_put");
    }

    #[test]
    fn test_option_leg_without_executions() {
        let leg = OptionLeg {
            option: "abc".to_string(),
            side: Side::Buy,
            executions: Vec::new(),
        };
        assert!(matches!(
            leg.to_record(),
            Err(NormalizeError::InvalidField { field: "executions", .. })
        ));
    }
}
