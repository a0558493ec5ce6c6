//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.jobwatch/config.toml` (global user preferences)
//! 3. **Project config** - `./.jobwatch/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority, applied by the CLI)

use crate::config::types::{JobwatchConfig, PollingConfig, RefreshConfig, ServerConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".jobwatch";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if
/// validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<JobwatchConfig, ConfigError> {
    let mut config = JobwatchConfig::default();

    for path in [user_config_path(), project_config_path()]
        .into_iter()
        .flatten()
    {
        match load_config_file(&path) {
            Ok(file_config) => config = merge_configs(config, file_config),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }

    validate_config(&config)?;

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<JobwatchConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields are replaced only when the override sets them.
pub fn merge_configs(base: JobwatchConfig, override_config: JobwatchConfig) -> JobwatchConfig {
    JobwatchConfig {
        server: ServerConfig {
            base_url: override_config.server.base_url.or(base.server.base_url),
            request_timeout_secs: override_config
                .server
                .request_timeout_secs
                .or(base.server.request_timeout_secs),
        },
        polling: PollingConfig {
            interval_ms: override_config
                .polling
                .interval_ms
                .or(base.polling.interval_ms),
            max_errors: override_config
                .polling
                .max_errors
                .or(base.polling.max_errors),
            reload_delay_ms: override_config
                .polling
                .reload_delay_ms
                .or(base.polling.reload_delay_ms),
        },
        refresh: RefreshConfig {
            interval_ms: override_config
                .refresh
                .interval_ms
                .or(base.refresh.interval_ms),
            // Disabling anywhere in the hierarchy wins
            enabled: override_config.refresh.enabled && base.refresh.enabled,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_hierarchy_integration() {
        let temp_dir = tempfile::tempdir().unwrap();
        let user_path = temp_dir.path().join("user.toml");
        let project_path = temp_dir.path().join("project.toml");

        fs::write(
            &user_path,
            r#"
[server]
base_url = "http://crawler-box:5000"
request_timeout_secs = 20

[polling]
interval_ms = 10000
max_errors = 5
"#,
        )
        .unwrap();

        fs::write(
            &project_path,
            r#"
[polling]
interval_ms = 4000

[refresh]
enabled = false
"#,
        )
        .unwrap();

        let user_config = load_config_file(&user_path).unwrap();
        assert_eq!(user_config.server.base_url(), "http://crawler-box:5000");
        assert_eq!(user_config.polling.max_errors(), 5);

        let project_config = load_config_file(&project_path).unwrap();
        assert!(!project_config.refresh.enabled);

        let merged = merge_configs(user_config, project_config);
        assert_eq!(merged.server.base_url(), "http://crawler-box:5000"); // From user
        assert_eq!(merged.server.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(merged.polling.interval(), Duration::from_millis(4000)); // Overridden
        assert_eq!(merged.polling.max_errors(), 5); // From user
        assert_eq!(merged.polling.reload_delay(), Duration::from_millis(3000)); // Default
        assert!(!merged.refresh.enabled);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_config_file(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_toml_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "invalid toml [[[").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn test_empty_override_keeps_base() {
        let base: JobwatchConfig = toml::from_str(
            r#"
[refresh]
interval_ms = 30000
"#,
        )
        .unwrap();

        let merged = merge_configs(base, JobwatchConfig::default());
        assert_eq!(merged.refresh.interval(), Duration::from_millis(30000));
        assert!(merged.refresh.enabled);
    }
}
