//! Configuration types for the DNS platform SDK
//!
//! This module defines the client and watcher configuration structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Production API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.dns-platform.jp/dpf/v1";

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API token sent as a bearer credential
    /// ⚠️ NEVER log this value
    pub token: String,

    /// Timeout of a single HTTP exchange (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Job watcher settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl ClientConfig {
    /// Create a new configuration for `token` with defaults
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            token: token.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            watch: WatchConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(crate::Error::config(format!(
                "endpoint must be an http(s) URL, got `{}`",
                self.endpoint
            )));
        }
        if self.token.is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("timeout_secs must be greater than 0"));
        }
        self.watch.validate()
    }

    /// HTTP exchange timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<REDACTED>")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("watch", &self.watch)
            .finish()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("dpf-sdk-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Job watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Delay between two polls (in seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Give up after this long (in seconds)
    #[serde(default = "default_watch_timeout_secs")]
    pub timeout_secs: u64,
}

impl WatchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("watch interval_secs must be greater than 0"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("watch timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    /// Delay between two polls
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Overall watch timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_watch_timeout_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

fn default_watch_timeout_secs() -> u64 {
    600
}
