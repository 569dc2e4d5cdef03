//! Once command implementation
//!
//! Dry run: one full cycle against the in-memory store. Useful for checking
//! exchange and symbol configuration before pointing at a database.

use crate::collector::Collector;
use crate::config::Config;
use crate::feed;
use crate::store::MemoryStore;
use chrono::Utc;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct OnceArgs {
    /// Override the configured exchange
    #[arg(long)]
    pub exchange: Option<String>,

    /// Override the configured symbol
    #[arg(long)]
    pub symbol: Option<String>,
}

impl OnceArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(exchange) = &self.exchange {
            config.collector.exchange = exchange.clone();
        }
        if let Some(symbol) = &self.symbol {
            config.collector.symbol = symbol.clone();
        }

        let source = feed::make_source(
            &config.collector.exchange,
            &config.collector.symbol,
            config.collector.request_timeout(),
        )?;

        let store = Arc::new(MemoryStore::new());
        let mut collector = Collector::new(source, store, config.collector.clone());

        let tick = collector.cycle_at(Utc::now()).await?;
        println!("{}", serde_json::to_string_pretty(&tick)?);

        Ok(())
    }
}
