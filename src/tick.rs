//! Tick data model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One timestamped price observation for an (exchange, symbol) pair.
///
/// Ticks are append-only: created once per successful poll cycle, written
/// once, never mutated. Price fields are `None` exactly when the exchange
/// response omitted them; the derived fields are `None` until the rolling
/// window holds enough history (deltas) or until both quote sides are
/// present (spread).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Exchange identifier (e.g. "binance")
    pub exchange: String,
    /// Canonical trading pair (e.g. "BTC/USDT")
    pub symbol: String,
    /// UTC instant of observation
    pub ts: DateTime<Utc>,
    /// Last traded price
    pub last: Option<Decimal>,
    /// Best bid
    pub bid: Option<Decimal>,
    /// Best ask
    pub ask: Option<Decimal>,
    /// ask - bid
    pub spread_abs: Option<Decimal>,
    /// (ask - bid) / mid, with mid = (bid + ask) / 2
    pub spread_pct: Option<Decimal>,
    /// Price change vs. the reading 10 seconds prior
    pub delta_10s: Option<Decimal>,
    /// delta_10s as a ratio of the prior reading
    pub pct_10s: Option<Decimal>,
    /// Price change vs. the reading 60 seconds prior
    pub delta_1m: Option<Decimal>,
    /// delta_1m as a ratio of the prior reading
    pub pct_1m: Option<Decimal>,
    /// Unparsed exchange response, kept for forward compatibility
    pub raw_json: serde_json::Value,
}
