//! Configuration type definitions for jobwatch.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:5000"
//! request_timeout_secs = 30
//!
//! [polling]
//! interval_ms = 8000
//! max_errors = 3
//! reload_delay_ms = 3000
//!
//! [refresh]
//! interval_ms = 15000
//! enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.jobwatch/config.toml`
/// 2. Project config: `./.jobwatch/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobwatchConfig {
    /// Backend location and transport settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-job status polling policy
    #[serde(default)]
    pub polling: PollingConfig,

    /// Bulk records-count refresh policy
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Backend server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Base URL of the web application.
    /// Default: http://127.0.0.1:5000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds. Unset means the transport default
    /// (no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Job status poller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PollingConfig {
    /// Period between status requests in milliseconds.
    /// Default: 8000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// Consecutive failures before a poller gives up.
    /// Default: 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_errors: Option<u32>,

    /// Delay between a terminal status and the reload request.
    /// Default: 3000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_delay_ms: Option<u64>,
}

/// Bulk refresher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Period between bulk records refreshes in milliseconds.
    /// Default: 15000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// Whether the bulk refresher runs at all.
    #[serde(default = "super::defaults::default_refresh_enabled")]
    pub enabled: bool,
}

impl ServerConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(super::defaults::DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(
            self.interval_ms
                .unwrap_or(super::defaults::DEFAULT_POLL_INTERVAL_MS),
        )
    }

    pub fn max_errors(&self) -> u32 {
        self.max_errors
            .unwrap_or(super::defaults::DEFAULT_MAX_ERRORS)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(
            self.reload_delay_ms
                .unwrap_or(super::defaults::DEFAULT_RELOAD_DELAY_MS),
        )
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(
            self.interval_ms
                .unwrap_or(super::defaults::DEFAULT_REFRESH_INTERVAL_MS),
        )
    }
}
