//! Kraken REST ticker source

use super::types::{parse_price, TickerQuote};
use super::TickerSource;
use crate::error::CollectorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Kraken REST base URL
pub const KRAKEN_API_URL: &str = "https://api.kraken.com";

/// Kraken public API envelope
#[derive(Debug, Deserialize)]
struct KrakenResponse {
    #[serde(default)]
    error: Vec<String>,
    result: Option<HashMap<String, KrakenPairTicker>>,
}

/// Per-pair ticker entry. Kraken encodes quote sides as string arrays:
/// `a` = [ask, whole lot volume, lot volume], `b` = likewise for bid,
/// `c` = [last trade price, lot volume].
#[derive(Debug, Deserialize)]
struct KrakenPairTicker {
    a: Option<Vec<String>>,
    b: Option<Vec<String>>,
    c: Option<Vec<String>>,
}

/// REST ticker source for Kraken's `/0/public/Ticker` endpoint
pub struct KrakenTicker {
    symbol: String,
    native_symbol: String,
    base_url: String,
    client: Client,
}

impl KrakenTicker {
    /// Create a source for the given canonical symbol
    pub fn new(symbol: impl Into<String>, timeout: Duration) -> Self {
        Self::with_base_url(symbol, KRAKEN_API_URL, timeout)
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

    /// Extract a quote from a Ticker response body
    fn parse_quote(raw: Value) -> Result<TickerQuote, CollectorError> {
        let response: KrakenResponse = serde_json::from_value(raw.clone())
            .map_err(|e| CollectorError::Malformed(format!("unexpected Kraken ticker shape: {e}")))?;

        if !response.error.is_empty() {
            return Err(CollectorError::Malformed(format!(
                "Kraken API error: {}",
                response.error.join(", ")
            )));
        }

        let pair = response
            .result
            .and_then(|mut result| result.drain().next().map(|(_, v)| v))
            .ok_or_else(|| CollectorError::Malformed("empty Kraken result".to_string()))?;

        let last = parse_price(pair.c.as_deref().and_then(first), "c[0]")?;
        let bid = parse_price(pair.b.as_deref().and_then(first), "b[0]")?;
        let ask = parse_price(pair.a.as_deref().and_then(first), "a[0]")?;

        // Kraken's ticker payload carries no event timestamp
        Ok(TickerQuote {
            last,
            bid,
            ask,
            exchange_ts: None,
            raw,
        })
    }
}

fn first(values: &[String]) -> Option<&str> {
    values.first().map(String::as_str)
}

/// Map a canonical symbol to Kraken's native form.
///
/// Kraken names bitcoin XBT: "BTC/USDT" -> "XBTUSDT", "ETH/USD" -> "ETHUSD".
fn to_native_symbol(canonical: &str) -> String {
    let upper = canonical.to_uppercase();
    match upper.split_once('/') {
        Some((base, quote)) => {
            let base = if base == "BTC" { "XBT" } else { base };
            format!("{base}{quote}")
        }
        None => upper,
    }
}

#[async_trait]
impl TickerSource for KrakenTicker {
    fn exchange(&self) -> &str {
        "kraken"
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn fetch_ticker(&self) -> Result<TickerQuote, CollectorError> {
        let url = format!("{}/0/public/Ticker", self.base_url);

        tracing::debug!(url = %url, pair = %self.native_symbol, "Fetching Kraken ticker");

        let response = self
            .client
            .get(&url)
            .query(&[("pair", self.native_symbol.as_str())])
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
