//! Ticker source module
//!
//! REST polling clients for exchange ticker endpoints

mod binance;
mod kraken;
mod types;

pub use binance::BinanceTicker;
pub use kraken::KrakenTicker;
pub use types::TickerQuote;

use crate::error::CollectorError;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for exchange ticker sources
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Exchange identifier (e.g. "binance")
    fn exchange(&self) -> &str;

    /// Canonical symbol this source polls (e.g. "BTC/USDT")
    fn symbol(&self) -> &str;

    /// Fetch the latest ticker for the configured symbol
    async fn fetch_ticker(&self) -> Result<TickerQuote, CollectorError>;
}

/// Build a ticker source for the named exchange.
///
/// The symbol is canonical ("BTC/USDT"); each source maps it to the
/// exchange's native form. Unknown exchange names are a configuration error.
pub fn make_source(
    exchange: &str,
    symbol: &str,
    timeout: Duration,
) -> Result<Box<dyn TickerSource>, CollectorError> {
    match exchange.to_lowercase().as_str() {
        "binance" => Ok(Box::new(BinanceTicker::new(symbol, timeout))),
        "kraken" => Ok(Box::new(KrakenTicker::new(symbol, timeout))),
        other => Err(CollectorError::Config(format!("unknown exchange: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_source_binance() {
        let source = make_source("binance", "BTC/USDT", Duration::from_secs(10)).unwrap();
        assert_eq!(source.exchange(), "binance");
        assert_eq!(source.symbol(), "BTC/USDT");
    }

    #[test]
    fn test_make_source_case_insensitive() {
        let source = make_source("Kraken", "BTC/USDT", Duration::from_secs(10)).unwrap();
        assert_eq!(source.exchange(), "kraken");
    }

    #[test]
    fn test_make_source_unknown() {
        let result = make_source("mtgox", "BTC/USDT", Duration::from_secs(10));
        assert!(matches!(result, Err(CollectorError::Config(_))));
    }
}
