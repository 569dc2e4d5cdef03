//! Binance REST ticker source

use super::types::{parse_price, TickerQuote};
use super::TickerSource;
use crate::error::CollectorError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Binance REST base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Subset of the 24hr ticker payload the collector cares about.
///
/// Everything else stays in the raw JSON column.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    last_price: Option<String>,
    bid_price: Option<String>,
    ask_price: Option<String>,
    close_time: Option<i64>,
}

/// REST ticker source for Binance's `/api/v3/ticker/24hr` endpoint
pub struct BinanceTicker {
    symbol: String,
    native_symbol: String,
    base_url: String,
    client: Client,
}

impl BinanceTicker {
    /// Create a source for the given canonical symbol
    pub fn new(symbol: impl Into<String>, timeout: Duration) -> Self {
        Self::with_base_url(symbol, BINANCE_API_URL, timeout)
    }

    /// Create a source against a custom base URL
    pub fn with_base_url(
        symbol: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let symbol = symbol.into();
        let native_symbol = to_native_symbol(&symbol);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            symbol,
            native_symbol,
            base_url: base_url.into(),
            client,
        }
    }

    /// Extract a quote from a 24hr ticker response body
    fn parse_quote(raw: Value) -> Result<TickerQuote, CollectorError> {
        let ticker: Ticker24h = serde_json::from_value(raw.clone())
            .map_err(|e| CollectorError::Malformed(format!("unexpected Binance ticker shape: {e}")))?;

        let last = parse_price(ticker.last_price.as_deref(), "lastPrice")?;
        let bid = parse_price(ticker.bid_price.as_deref(), "bidPrice")?;
        let ask = parse_price(ticker.ask_price.as_deref(), "askPrice")?;
        let exchange_ts = ticker
            .close_time
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

        Ok(TickerQuote {
            last,
            bid,
            ask,
            exchange_ts,
            raw,
        })
    }
}

/// Map a canonical symbol to Binance's native form: "BTC/USDT" -> "BTCUSDT"
fn to_native_symbol(canonical: &str) -> String {
    canonical.replace('/', "").to_uppercase()
}

#[async_trait]
impl TickerSource for BinanceTicker {
    fn exchange(&self) -> &str {
        "binance"
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn fetch_ticker(&self) -> Result<TickerQuote, CollectorError> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);

        tracing::debug!(url = %url, symbol = %self.native_symbol, "Fetching Binance ticker");

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", self.native_symbol.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollectorError::Api { status, body });
        }

        let raw: Value = response.json().await?;
        Self::parse_quote(raw)
    }
}
