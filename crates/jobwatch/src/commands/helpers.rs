use clap::ArgMatches;
use tracing::warn;

use jobwatch_core::ApiClient;
use jobwatch_core::config::JobwatchConfig;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
pub fn load_config_with_warning() -> JobwatchConfig {
    match JobwatchConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.jobwatch/config.toml and ./.jobwatch/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            JobwatchConfig::default()
        }
    }
}

/// Config with the global `--base-url` override applied.
pub fn load_config(matches: &ArgMatches) -> JobwatchConfig {
    let mut config = load_config_with_warning();
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.server.base_url = Some(base_url.clone());
    }
    config
}

pub fn build_client(config: &JobwatchConfig) -> Result<ApiClient, Box<dyn std::error::Error>> {
    Ok(ApiClient::new(&config.server)?)
}

/// All network work runs on one cooperative thread.
pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub fn is_confirmation_accepted(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    normalized == "y" || normalized == "yes"
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
