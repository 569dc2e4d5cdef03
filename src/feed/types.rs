//! Ticker source types

use crate::error::CollectorError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single ticker snapshot as returned by an exchange.
///
/// Price fields are `None` exactly when the response omitted them. `raw`
/// preserves the unparsed response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerQuote {
    /// Last traded price
    pub last: Option<Decimal>,
    /// Best bid
    pub bid: Option<Decimal>,
    /// Best ask
    pub ask: Option<Decimal>,
    /// Timestamp reported by the exchange, when it reports one
    pub exchange_ts: Option<DateTime<Utc>>,
    /// Unparsed response body
    pub raw: serde_json::Value,
}

/// Parse an optional decimal string field from an exchange payload.
///
/// A missing field maps to `None`; a present but unparsable one is a
/// malformed response.
pub(crate) fn parse_price(
    value: Option<&str>,
    field: &str,
) -> Result<Option<Decimal>, CollectorError> {
    match value {
        None => Ok(None),
        Some(s) => Decimal::from_str(s)
            .map(Some)
            .map_err(|_| CollectorError::Malformed(format!("unparsable {field}: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_price_present() {
        let price = parse_price(Some("42500.50"), "lastPrice").unwrap();
        assert_eq!(price, Some(dec!(42500.50)));
    }

    #[test]
    fn test_parse_price_missing() {
        assert_eq!(parse_price(None, "lastPrice").unwrap(), None);
    }

    #[test]
    fn test_parse_price_garbage() {
        let err = parse_price(Some("n/a"), "bidPrice").unwrap_err();
        assert_eq!(err.kind(), "parse");
        assert!(err.to_string().contains("bidPrice"));
    }
}
