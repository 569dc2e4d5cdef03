//! Collector error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised during a poll cycle.
///
/// Every variant is non-fatal at the loop boundary: a failed cycle is logged,
/// counted, and skipped. Only startup (configuration, initial pool creation)
/// treats errors as terminal.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Transport-level failure talking to the exchange, including timeouts
    #[error("exchange request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Exchange replied with a non-success status
    #[error("exchange API error: {status}: {body}")]
    Api {
        /// HTTP status returned by the exchange
        status: StatusCode,
        /// Response body, kept for the log line
        body: String,
    },
    /// Response parsed as JSON but did not have the expected shape
    #[error("unexpected exchange response: {0}")]
    Malformed(String),
    /// Database write or query failure
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    /// Database pool failure
    #[error("database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl CollectorError {
    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable label for the `error_type` dimension of the error counters.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(e) if e.is_decode() => "parse",
            Self::Http(_) => "network",
            Self::Api { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS => "rate_limit",
            Self::Api { .. } => "exchange",
            Self::Malformed(_) => "parse",
            Self::Database(_) => "db_write",
            Self::Pool(_) => "db_pool",
            Self::Config(_) => "config",
        }
    }

    /// True when the failure happened on the store side of the cycle.
    ///
    /// Store failures feed the database error counter; everything else feeds
    /// the per-exchange API error counter.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Pool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_kind() {
        let err = CollectorError::Malformed("bad shape".to_string());
        assert_eq!(err.kind(), "parse");
        assert!(!err.is_store());
    }

    #[test]
    fn test_api_kind() {
        let err = CollectorError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert_eq!(err.kind(), "exchange");
    }

    #[test]
    fn test_rate_limit_kind() {
        let err = CollectorError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert_eq!(err.kind(), "rate_limit");
    }

    #[test]
    fn test_config_kind() {
        let err = CollectorError::config("missing symbol");
        assert_eq!(err.kind(), "config");
        assert!(!err.is_store());
    }

    #[test]
    fn test_display_includes_body() {
        let err = CollectorError::Api {
            status: StatusCode::IM_A_TEAPOT,
            body: "short and stout".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("418"));
        assert!(msg.contains("short and stout"));
    }
}
