//! Collector loop
//!
//! Fetch, derive, persist, expose. One timer-driven cycle per poll interval;
//! every failure is logged, counted, and skipped.

use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::feed::TickerSource;
use crate::store::TickStore;
use crate::telemetry::metrics;
use crate::tick::Tick;
use crate::window::{self, RollingWindow, WindowDeltas};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::MissedTickBehavior;

/// Single-owner collector state: one source, one store, one rolling window.
///
/// There is exactly one logical actor; no locking is needed.
pub struct Collector {
    source: Box<dyn TickerSource>,
    store: Arc<dyn TickStore>,
    window: RollingWindow,
    config: CollectorConfig,
}

impl Collector {
    /// Create a collector over the given source and store
    pub fn new(
        source: Box<dyn TickerSource>,
        store: Arc<dyn TickStore>,
        config: CollectorConfig,
    ) -> Self {
        Self {
            source,
            store,
            window: RollingWindow::new(),
            config,
        }
    }

    /// Run the poll loop forever.
    ///
    /// The cadence is fixed at the configured interval; a cycle that
    /// overruns delays the next tick rather than bursting to catch up.
    /// Shutdown is external (the CLI races this future against Ctrl-C).
    pub async fn run(&mut self) {
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match self.cycle_at(Utc::now()).await {
                Ok(tick) => {
                    tracing::info!(
                        exchange = %tick.exchange,
                        symbol = %tick.symbol,
                        last = ?tick.last,
                        "Tick stored"
                    );
                }
                Err(e) => self.record_failure(&e),
            }
        }
    }

    /// Execute one poll cycle at the given observation time.
    ///
    /// On success exactly one row is appended and the returned tick mirrors
    /// it. On any failure nothing is written; the window keeps whatever it
    /// observed before the failure point.
    pub async fn cycle_at(&mut self, now: DateTime<Utc>) -> Result<Tick, CollectorError> {
        let fetch_started = Instant::now();
        let quote = self.source.fetch_ticker().await?;
        metrics::observe_fetch_latency(self.source.exchange(), fetch_started.elapsed());

        // Deltas are derived against pre-existing history only, then the new
        // reading joins the window.
        let deltas = match quote.last {
            Some(price) => self.window.deltas(now, price),
            None => WindowDeltas::default(),
        };
        if let Some(price) = quote.last {
            self.window.observe(now, price);
        }

        let (spread_abs, spread_pct) = match (quote.bid, quote.ask) {
            (Some(bid), Some(ask)) => {
                let (abs, pct) = window::spread(bid, ask);
                (Some(abs), pct)
            }
            _ => (None, None),
        };

        let tick = Tick {
            exchange: self.source.exchange().to_string(),
            symbol: self.source.symbol().to_string(),
            ts: now,
            last: quote.last,
            bid: quote.bid,
            ask: quote.ask,
            spread_abs,
            spread_pct,
            delta_10s: deltas.delta_10s,
            pct_10s: deltas.pct_10s,
            delta_1m: deltas.delta_1m,
            pct_1m: deltas.pct_1m,
            raw_json: quote.raw,
        };

        metrics::publish_quote(&tick);

        let write_started = Instant::now();
        self.store.insert(&tick).await?;
        metrics::observe_write_latency(write_started.elapsed());
        metrics::record_success(now);

        Ok(tick)
    }

    fn record_failure(&self, err: &CollectorError) {
        if err.is_store() {
            metrics::inc_db_error(err.kind());
            tracing::warn!(error = %err, "Store write failed, skipping cycle");
        } else {
            metrics::inc_api_error(self.source.exchange(), self.source.symbol(), err.kind());
            tracing::warn!(
                exchange = %self.source.exchange(),
                symbol = %self.source.symbol(),
                error = %err,
                "Fetch failed, skipping cycle"
            );
        }
    }
}
