use clap::ArgMatches;
use tracing::{error, info};

use jobwatch_core::display::BadgeStyle;
use jobwatch_core::events;
use jobwatch_core::{JobKind, StatusEndpoint, StatusSource};

use super::helpers::{build_client, load_config, print_json, runtime};

pub(crate) fn handle_status_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let job_id = matches
        .get_one::<String>("id")
        .ok_or("Job id argument is required")?;
    let kind = if matches.get_flag("processing") {
        JobKind::Processing
    } else {
        JobKind::Crawl
    };
    let json_output = matches.get_flag("json");
    let endpoint = StatusEndpoint::new(kind, job_id.as_str());

    info!(event = "cli.status_started", endpoint = %endpoint);

    let config = load_config(matches);
    let client = build_client(&config)?;
    let response = match runtime()?.block_on(client.fetch_status(&endpoint)) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("❌ Failed to fetch status of {} job '{}': {}", kind, job_id, e);
            error!(event = "cli.status_failed", endpoint = %endpoint, error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    info!(
        event = "cli.status_completed",
        endpoint = %endpoint,
        status = %response.status
    );

    if json_output {
        return print_json(&response);
    }

    let style = BadgeStyle::for_status(&response.status);
    println!("{} {} job '{}'", style.icon(), kind, job_id);
    println!("   Status:  {}", response.status);
    println!("   Records: {}", response.records_display());
    if let Some(start_time) = &response.start_time {
        println!("   Started: {}", start_time);
    }
    if let Some(end_time) = &response.end_time {
        println!("   Ended:   {}", end_time);
    }
    if kind == JobKind::Processing
        && let Some(output_file) = &response.output_file
    {
        println!("   Output:  {}", output_file);
    }
    if let Some(message) = &response.error_message {
        println!("   Error:   {}", message);
    }

    Ok(())
}
