use crate::config::types::JobwatchConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// Periods, timeouts and the error budget must all be non-zero.
pub fn validate_config(config: &JobwatchConfig) -> Result<(), ConfigError> {
    let base_url = config.server.base_url();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
        });
    }

    if config.server.request_timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "server.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.polling.interval_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "polling.interval_ms must be greater than 0".to_string(),
        });
    }

    if config.polling.max_errors == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "polling.max_errors must be at least 1".to_string(),
        });
    }

    if config.refresh.interval_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "refresh.interval_ms must be greater than 0".to_string(),
        });
    }

    Ok(())
}
