//! PostgreSQL tick store

use super::TickStore;
use crate::config::DatabaseConfig;
use crate::error::CollectorError;
use crate::tick::Tick;
use async_trait::async_trait;
use deadpool_postgres::{ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

/// Idempotent schema, applied at connect time.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ticks (
    id          BIGSERIAL PRIMARY KEY,
    ts          TIMESTAMPTZ NOT NULL,
    exchange    TEXT NOT NULL,
    symbol      TEXT NOT NULL,
    last        NUMERIC,
    bid         NUMERIC,
    ask         NUMERIC,
    spread_abs  NUMERIC,
    spread_pct  NUMERIC,
    delta_10s   NUMERIC,
    pct_10s     NUMERIC,
    delta_1m    NUMERIC,
    pct_1m      NUMERIC,
    raw_json    JSONB
);
CREATE INDEX IF NOT EXISTS ticks_exchange_symbol_ts_idx
    ON ticks (exchange, symbol, ts);
"#;

/// One row per successful poll cycle.
const INSERT_TICK_SQL: &str = "\
    INSERT INTO ticks \
        (ts, exchange, symbol, last, bid, ask, spread_abs, spread_pct, \
         delta_10s, pct_10s, delta_1m, pct_1m, raw_json) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)";

/// Append-only tick store backed by a PostgreSQL connection pool.
///
/// The pool re-establishes connections as needed, so a database restart
/// costs failed cycles rather than a collector restart.
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    /// Connect, apply the schema, and verify liveness.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, CollectorError> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.name.clone());
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.application_name = Some("crypto-collector".to_string());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| CollectorError::Config(format!("failed to create database pool: {e}")))?;

        let client = pool.get().await?;
        client.batch_execute(SCHEMA_SQL).await?;
        client.simple_query("SELECT 1").await?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }
}

#[async_trait]
impl TickStore for PostgresStore {
    async fn insert(&self, tick: &Tick) -> Result<(), CollectorError> {
        let client = self.pool.get().await?;
        client
            .execute(
                INSERT_TICK_SQL,
                &[
                    &tick.ts,
                    &tick.exchange,
                    &tick.symbol,
                    &tick.last,
                    &tick.bid,
                    &tick.ask,
                    &tick.spread_abs,
                    &tick.spread_pct,
                    &tick.delta_10s,
                    &tick.pct_10s,
                    &tick.delta_1m,
                    &tick.pct_1m,
                    &tick.raw_json,
                ],
            )
            .await?;
        Ok(())
    }
}
