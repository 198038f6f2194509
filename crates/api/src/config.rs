//! Application configuration loaded from environment variables.

use std::time::Duration;

use domain::{DEFAULT_MAX_ITEMS, RetryPolicy, ServiceConfig};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `DATABASE_URL`: PostgreSQL connection string; unset selects the
///   in-memory store
/// - `STORE_TIMEOUT_MS`: per-call store timeout (default: `2000`)
/// - `MAX_SAVE_RETRIES`: retries after a version conflict (default: `3`)
/// - `RETRY_BASE_DELAY_MS`: first retry delay (default: `10`)
/// - `WISHLIST_MAX_ITEMS`: wishlist capacity (default: `20`)
///
/// Unparseable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub store_timeout: Duration,
    pub max_save_retries: u32,
    pub retry_base_delay: Duration,
    pub max_items: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .and_then(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            store_timeout: parsed("STORE_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            max_save_retries: lookup("MAX_SAVE_RETRIES")
                .and_then(|r| r.trim().parse::<u32>().ok())
                .unwrap_or(defaults.max_save_retries),
            retry_base_delay: parsed("RETRY_BASE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            max_items: lookup("WISHLIST_MAX_ITEMS")
                .and_then(|n| n.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_items),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the wishlist service configuration.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_items: self.max_items,
            retry: RetryPolicy::default()
                .with_max_retries(self.max_save_retries)
                .with_base_delay(self.retry_base_delay),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            database_url: None,
            store_timeout: document_store::DEFAULT_STORE_TIMEOUT,
            max_save_retries: 3,
            retry_base_delay: Duration::from_millis(10),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}
