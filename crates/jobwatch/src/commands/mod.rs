use clap::ArgMatches;
use tracing::error;

use jobwatch_core::events;

pub mod helpers;

mod actions;
mod catalog;
mod completions;
mod status;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    // Global args are propagated to subcommand matches as well
    let result = match matches.subcommand() {
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("status", sub_matches)) => status::handle_status_command(sub_matches),
        Some(("check-stuck", sub_matches)) => actions::handle_check_stuck_command(sub_matches),
        Some(("reset", sub_matches)) => actions::handle_reset_command(sub_matches),
        Some(("force-update", sub_matches)) => actions::handle_force_update_command(sub_matches),
        Some(("models", sub_matches)) => catalog::handle_models_command(sub_matches),
        Some(("car-types", sub_matches)) => catalog::handle_car_types_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}
