//! Configuration types for crypto-collector

use crate::error::CollectorError;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub collector: CollectorConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Exchange to poll (e.g. "binance", "kraken")
    #[serde(default = "default_exchange")]
    pub exchange: String,

    /// Canonical trading pair (e.g. "BTC/USDT")
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Seconds between poll cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Upper bound on a single outbound request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl CollectorConfig {
    /// Poll cadence as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            exchange: default_exchange(),
            symbol: default_symbol(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Port the Prometheus exporter listens on
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_exchange() -> String {
    "binance".to_string()
}
fn default_symbol() -> String {
    "BTC/USDT".to_string()
}
fn default_poll_interval() -> u64 {
    15
}
fn default_request_timeout() -> u64 {
    10_000
}
fn default_db_port() -> u16 {
    5432
}
fn default_metrics_port() -> u16 {
    8000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of the file values.
    ///
    /// Honors a `.env` file when present. Recognized variables: `EXCHANGE`,
    /// `SYMBOL`, `POLL_INTERVAL_SECONDS`, `REQUEST_TIMEOUT_MS`, `DB_HOST`,
    /// `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `METRICS_PORT`,
    /// `LOG_LEVEL`.
    pub fn apply_env_overrides(&mut self) -> Result<(), CollectorError> {
        let _ = dotenvy::dotenv();

        override_string("EXCHANGE", &mut self.collector.exchange);
        override_string("SYMBOL", &mut self.collector.symbol);
        override_parsed("POLL_INTERVAL_SECONDS", &mut self.collector.poll_interval_secs)?;
        override_parsed("REQUEST_TIMEOUT_MS", &mut self.collector.request_timeout_ms)?;

        override_string("DB_HOST", &mut self.database.host);
        override_parsed("DB_PORT", &mut self.database.port)?;
        override_string("DB_NAME", &mut self.database.name);
        override_string("DB_USER", &mut self.database.user);
        override_string("DB_PASSWORD", &mut self.database.password);

        override_parsed("METRICS_PORT", &mut self.telemetry.metrics_port)?;
        override_string("LOG_LEVEL", &mut self.telemetry.log_level);

        Ok(())
    }
}

fn override_string(var: &str, target: &mut String) {
    if let Ok(value) = env::var(var) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

fn override_parsed<T: FromStr>(var: &str, target: &mut T) -> Result<(), CollectorError> {
    if let Ok(value) = env::var(var) {
        if !value.is_empty() {
            *target = value
                .parse()
                .map_err(|_| CollectorError::Config(format!("invalid value for {var}: {value}")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_CONFIG: &str = r#"
        [collector]
        exchange = "kraken"
        symbol = "ETH/USD"
        poll_interval_secs = 5
        request_timeout_ms = 2500

        [database]
        host = "db.internal"
        port = 5433
        name = "crypto"
        user = "crypto"
        password = "secret"

        [telemetry]
        metrics_port = 9100
        log_level = "debug"
    "#;

    #[test]
    fn test_config_deserialize() {
        let config: Config = toml::from_str(FULL_CONFIG).unwrap();
        assert_eq!(config.collector.exchange, "kraken");
        assert_eq!(config.collector.symbol, "ETH/USD");
        assert_eq!(config.collector.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.collector.request_timeout(), Duration::from_millis(2500));
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.telemetry.metrics_port, 9100);
    }

    #[test]
    fn test_config_defaults() {
        let toml = r#"
            [collector]

            [database]
            host = "localhost"
            name = "crypto"
            user = "crypto"
            password = "crypto"

            [telemetry]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.collector.exchange, "binance");
        assert_eq!(config.collector.symbol, "BTC/USDT");
        assert_eq!(config.collector.poll_interval_secs, 15);
        assert_eq!(config.collector.request_timeout_ms, 10_000);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.telemetry.metrics_port, 8000);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database.host, "db.internal");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    // Environment mutation is process-global; serialize the tests that do it.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut config: Config = toml::from_str(FULL_CONFIG).unwrap();

        env::set_var("EXCHANGE", "binance");
        env::set_var("SYMBOL", "SOL/USDT");
        env::set_var("POLL_INTERVAL_SECONDS", "30");
        let result = config.apply_env_overrides();
        env::remove_var("EXCHANGE");
        env::remove_var("SYMBOL");
        env::remove_var("POLL_INTERVAL_SECONDS");

        result.unwrap();
        assert_eq!(config.collector.exchange, "binance");
        assert_eq!(config.collector.symbol, "SOL/USDT");
        assert_eq!(config.collector.poll_interval_secs, 30);
        // Untouched fields keep their file values
        assert_eq!(config.database.host, "db.internal");
    }

    #[test]
    fn test_env_override_invalid_number() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut config: Config = toml::from_str(FULL_CONFIG).unwrap();

        env::set_var("DB_PORT", "not-a-port");
        let result = config.apply_env_overrides();
        env::remove_var("DB_PORT");

        let err = result.unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_collector_config_default() {
        let config = CollectorConfig::default();
        assert_eq!(config.exchange, "binance");
        assert_eq!(config.symbol, "BTC/USDT");
        assert_eq!(config.poll_interval(), Duration::from_secs(15));
    }
}
