//! Runtime configuration for the stats server and the dashboard client.
//!
//! Both configs follow the same pattern: `Default` values, `with_*` builder
//! setters for CLI overrides, `from_env()` for `CITRATE_*` variables and a
//! `validate()` pass before use.
//!
//! # Example
//!
//! ```ignore
//! use citrate::config::ServerConfig;
//!
//! let config = ServerConfig::from_env()?
//!     .with_tick_interval(std::time::Duration::from_millis(500));
//! config.validate()?;
//! ```

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CitrateError, CitrateResult};

/// Default broadcast period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(2000);
/// Default number of samples kept client-side (about one minute at 2s).
pub const DEFAULT_HISTORY_CAPACITY: usize = 31;
/// Default per-connection outbound queue length.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 16;
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_STREAM_URL: &str = "ws://127.0.0.1:5000/ws/stats";

pub const ENV_ADDR: &str = "CITRATE_ADDR";
pub const ENV_TICK_MS: &str = "CITRATE_TICK_MS";
pub const ENV_SUBSCRIBER_BUFFER: &str = "CITRATE_SUBSCRIBER_BUFFER";
pub const ENV_WS_URL: &str = "CITRATE_WS_URL";
pub const ENV_MAX_RETRIES: &str = "CITRATE_MAX_RETRIES";
pub const ENV_MAX_BACKOFF_SECS: &str = "CITRATE_MAX_BACKOFF_SECS";
pub const ENV_HISTORY_CAPACITY: &str = "CITRATE_HISTORY_CAPACITY";

/// Read and parse an environment variable. Unset or empty means `None`.
fn env_parse<T>(key: &str) -> CitrateResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CitrateError::config(key, format!("'{}': {}", raw, e))),
        Err(_) => Ok(None),
    }
}

/// Configuration for `citrate serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address
    pub addr: SocketAddr,
    /// Broadcast period (default: 2s)
    pub tick_interval: Duration,
    /// Samples queued per connection before it counts as lagging
    pub subscriber_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            tick_interval: DEFAULT_TICK_INTERVAL,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_subscriber_buffer(mut self, capacity: usize) -> Self {
        self.subscriber_buffer = capacity;
        self
    }

    /// Build from `CITRATE_ADDR`, `CITRATE_TICK_MS` and
    /// `CITRATE_SUBSCRIBER_BUFFER`, falling back to defaults.
    pub fn from_env() -> CitrateResult<Self> {
        let mut config = Self::default();
        if let Some(addr) = env_parse::<SocketAddr>(ENV_ADDR)? {
            config.addr = addr;
        }
        if let Some(ms) = env_parse::<u64>(ENV_TICK_MS)? {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = env_parse::<usize>(ENV_SUBSCRIBER_BUFFER)? {
            config.subscriber_buffer = capacity;
        }
        Ok(config)
    }

    pub fn validate(&self) -> CitrateResult<()> {
        if self.tick_interval.is_zero() {
            return Err(CitrateError::config(
                "tick_interval",
                "must be greater than zero",
            ));
        }
        if self.subscriber_buffer == 0 {
            return Err(CitrateError::config(
                "subscriber_buffer",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Configuration for `citrate watch`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket URL of the stats stream
    pub url: String,
    /// Reconnect attempts after a drop; 0 disables reconnect
    pub max_retries: u8,
    pub max_backoff_secs: u64,
    /// Samples kept for the charts
    pub history_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            max_retries: 5,
            max_backoff_secs: 30,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Disable reconnect entirely: a dropped stream stays disconnected.
    pub fn without_reconnect(self) -> Self {
        self.with_max_retries(0)
    }

    pub fn with_max_backoff_secs(mut self, secs: u64) -> Self {
        self.max_backoff_secs = secs;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn reconnect_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Build from `CITRATE_WS_URL`, `CITRATE_MAX_RETRIES`,
    /// `CITRATE_MAX_BACKOFF_SECS` and `CITRATE_HISTORY_CAPACITY`.
    pub fn from_env() -> CitrateResult<Self> {
        let mut config = Self::default();
        if let Some(url) = env_parse::<String>(ENV_WS_URL)? {
            config.url = url;
        }
        if let Some(retries) = env_parse::<u8>(ENV_MAX_RETRIES)? {
            config.max_retries = retries;
        }
        if let Some(secs) = env_parse::<u64>(ENV_MAX_BACKOFF_SECS)? {
            config.max_backoff_secs = secs;
        }
        if let Some(capacity) = env_parse::<usize>(ENV_HISTORY_CAPACITY)? {
            config.history_capacity = capacity;
        }
        Ok(config)
    }

    pub fn validate(&self) -> CitrateResult<()> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(CitrateError::config(
                "url",
                format!("'{}' is not a ws:// or wss:// URL", self.url),
            ));
        }
        if self.history_capacity == 0 {
            return Err(CitrateError::config(
                "history_capacity",
                "must be greater than zero",
            ));
        }
        if self.max_backoff_secs == 0 {
            return Err(CitrateError::config(
                "max_backoff_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// HTTP base URL of the server hosting the stream.
    ///
    /// `ws://host:5000/ws/stats` becomes `http://host:5000`.
    pub fn api_base(&self) -> String {
        let (scheme, rest) = if let Some(rest) = self.url.strip_prefix("wss://") {
            ("https://", rest)
        } else if let Some(rest) = self.url.strip_prefix("ws://") {
            ("http://", rest)
        } else {
            ("http://", self.url.as_str())
        };
        let host = rest.split('/').next().unwrap_or(rest);
        format!("{}{}", scheme, host)
    }
}
