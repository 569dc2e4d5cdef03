//! Prometheus metrics
//!
//! Counter, gauge and histogram names match the deployed scrape config, so
//! dashboards keep working across collector versions.

use crate::tick::Tick;
use chrono::{DateTime, Utc};
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Install the Prometheus exporter and register metric descriptions.
///
/// Serves `/metrics` on `0.0.0.0:port` for the lifetime of the process.
pub fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter on {}: {}", addr, e))?;

    describe();
    tracing::info!(%addr, "Prometheus metrics exposed on /metrics");
    Ok(())
}

fn describe() {
    describe_histogram!(
        "collector_scrape_latency_seconds",
        Unit::Seconds,
        "Time spent fetching market data from the exchange"
    );
    describe_histogram!(
        "collector_db_write_latency_seconds",
        Unit::Seconds,
        "Time spent writing ticks to PostgreSQL"
    );
    describe_counter!(
        "collector_api_errors_total",
        "Total number of exchange API errors"
    );
    describe_counter!("collector_db_errors_total", "Total number of database errors");
    describe_gauge!(
        "collector_last_success_timestamp",
        "Unix timestamp of the last fully successful cycle"
    );
    describe_gauge!(
        "collector_last_symbol_timestamp",
        "Unix timestamp when the symbol was last updated"
    );
    describe_gauge!("crypto_price_last", "Last traded price");
    describe_gauge!("crypto_price_bid", "Best bid price");
    describe_gauge!("crypto_price_ask", "Best ask price");
    describe_gauge!("crypto_spread_abs", "Absolute spread (ask-bid)");
    describe_gauge!("crypto_spread_pct", "Spread as a ratio of the mid price");
}

/// Record how long the exchange fetch took
pub fn observe_fetch_latency(exchange: &str, elapsed: Duration) {
    histogram!("collector_scrape_latency_seconds", "exchange" => exchange.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record how long the database write took
pub fn observe_write_latency(elapsed: Duration) {
    histogram!("collector_db_write_latency_seconds").record(elapsed.as_secs_f64());
}

/// Count a failed fetch or parse
pub fn inc_api_error(exchange: &str, symbol: &str, kind: &'static str) {
    counter!(
        "collector_api_errors_total",
        "exchange" => exchange.to_string(),
        "symbol" => symbol.to_string(),
        "error_type" => kind
    )
    .increment(1);
}

/// Count a failed store write
pub fn inc_db_error(kind: &'static str) {
    counter!("collector_db_errors_total", "error_type" => kind).increment(1);
}

/// Publish the price gauges for a freshly fetched quote.
///
/// Gauges for absent fields keep their previous value rather than being
/// reset, matching scrape expectations.
pub fn publish_quote(tick: &Tick) {
    set_price_gauge("crypto_price_last", tick, tick.last);
    set_price_gauge("crypto_price_bid", tick, tick.bid);
    set_price_gauge("crypto_price_ask", tick, tick.ask);
    set_price_gauge("crypto_spread_abs", tick, tick.spread_abs);
    set_price_gauge("crypto_spread_pct", tick, tick.spread_pct);

    gauge!(
        "collector_last_symbol_timestamp",
        "exchange" => tick.exchange.clone(),
        "symbol" => tick.symbol.clone()
    )
    .set(tick.ts.timestamp() as f64);
}

/// Mark a fully successful cycle (fetch and store)
pub fn record_success(ts: DateTime<Utc>) {
    gauge!("collector_last_success_timestamp").set(ts.timestamp() as f64);
}

fn set_price_gauge(name: &'static str, tick: &Tick, value: Option<Decimal>) {
    if let Some(v) = value.and_then(|d| d.to_f64()) {
        gauge!(
            name,
            "exchange" => tick.exchange.clone(),
            "symbol" => tick.symbol.clone()
        )
        .set(v);
    }
}
