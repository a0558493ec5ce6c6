//! Default values for configuration types.
//!
//! The polling constants are policy values, not structural requirements.

use crate::config::types::RefreshConfig;

/// Flask development server address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Period between per-job status requests (8000ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 8000;

/// Consecutive failures a poller tolerates before giving up (3).
pub const DEFAULT_MAX_ERRORS: u32 = 3;

/// Settle delay between a terminal status and the reload request (3000ms).
pub const DEFAULT_RELOAD_DELAY_MS: u64 = 3000;

/// Period between bulk records-count refreshes (15000ms).
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 15000;

/// Returns whether the bulk refresher runs by default.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_refresh_enabled() -> bool {
    true
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: None,
            enabled: default_refresh_enabled(),
        }
    }
}
