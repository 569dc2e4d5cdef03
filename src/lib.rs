//! crypto-collector: polling collector for cryptocurrency ticker prices
//!
//! This library provides the core components for:
//! - Ticker polling from exchange REST APIs (Binance, Kraken)
//! - Spread and short-horizon delta derivation over a rolling window
//! - Append-only tick storage in PostgreSQL
//! - Prometheus metrics for scraping
//! - TOML plus environment-variable configuration

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod feed;
pub mod store;
pub mod telemetry;
pub mod tick;
pub mod window;
