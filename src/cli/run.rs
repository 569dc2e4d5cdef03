//! Run command implementation

use crate::collector::Collector;
use crate::config::Config;
use crate::feed;
use crate::store::PostgresStore;
use crate::telemetry;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the configured exchange
    #[arg(long)]
    pub exchange: Option<String>,

    /// Override the configured symbol
    #[arg(long)]
    pub symbol: Option<String>,
}

impl RunArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(exchange) = &self.exchange {
            config.collector.exchange = exchange.clone();
        }
        if let Some(symbol) = &self.symbol {
            config.collector.symbol = symbol.clone();
        }

        telemetry::metrics::serve(config.telemetry.metrics_port)?;

        let store = PostgresStore::connect(&config.database).await?;
        let source = feed::make_source(
            &config.collector.exchange,
            &config.collector.symbol,
            config.collector.request_timeout(),
        )?;

        tracing::info!(
            exchange = %config.collector.exchange,
            symbol = %config.collector.symbol,
            interval_secs = config.collector.poll_interval_secs,
            "Starting collector loop"
        );

        let mut collector = Collector::new(source, Arc::new(store), config.collector.clone());

        tokio::select! {
            () = collector.run() => Ok(()),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received stop signal, shutting down");
                Ok(())
            }
        }
    }
}
