//! Collector configuration.
//!
//! Layering, lowest precedence first: built-in defaults, an optional config
//! file (any format the `config` crate recognises by extension), `SLIPPAGE_*`
//! environment variables, then CLI flags applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::market_data::adapters::binance::BINANCE_US_REST_URL;

pub const ENV_PREFIX: &str = "SLIPPAGE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Trading pair, e.g. "BTC/USDT".
    pub symbol: String,
    /// Hypothetical order quantity in base units.
    pub order_size: f64,
    /// Records per flush.
    pub batch_size: usize,
    /// Pause between ticks, applied after failed ticks too.
    pub delay_seconds: f64,
    /// Stop after this many successful samples; unbounded when absent.
    pub total_points: Option<u64>,
    /// Levels per side requested from the exchange.
    pub depth_limit: usize,
    /// Fetch attempts per tick.
    pub max_retries: u32,
    pub output_path: PathBuf,
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Log progress every N samples; 0 disables.
    pub progress_every: u64,
    pub metrics_port: u16,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".to_string(),
            order_size: 1.0,
            batch_size: 1000,
            delay_seconds: 1.0,
            total_points: None,
            depth_limit: 50,
            max_retries: 3,
            output_path: PathBuf::from("slippage_data.csv"),
            base_url: BINANCE_US_REST_URL.to_string(),
            request_timeout_secs: 10,
            progress_every: 100,
            metrics_port: 9000,
        }
    }
}

impl CollectorConfig {
    /// Merge defaults, `file` (if any) and the environment. Does not validate,
    /// so callers can layer CLI overrides first.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason: reason.to_string() })
        };

        if self.symbol.trim().is_empty() {
            return invalid("symbol", "must not be empty");
        }
        if !(self.order_size.is_finite() && self.order_size > 0.0) {
            return invalid("order_size", "must be a positive number");
        }
        if self.batch_size == 0 {
            return invalid("batch_size", "must be at least 1");
        }
        if Duration::try_from_secs_f64(self.delay_seconds).is_err() {
            return invalid("delay_seconds", "must be a non-negative number of seconds");
        }
        if self.total_points == Some(0) {
            return invalid("total_points", "must be at least 1 when set");
        }
        if self.depth_limit == 0 {
            return invalid("depth_limit", "must be at least 1");
        }
        if self.max_retries == 0 {
            return invalid("max_retries", "must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            return invalid("request_timeout_secs", "must be at least 1");
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
