use std::io::{self, Write};

use clap::ArgMatches;
use tracing::info;

use jobwatch_core::JobKind;
use jobwatch_core::actions::{self, ActionError};
use jobwatch_core::events;

use super::helpers::{build_client, is_confirmation_accepted, load_config, runtime};

pub(crate) fn handle_check_stuck_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(matches);
    let client = build_client(&config)?;

    match runtime()?.block_on(actions::check_stuck_crawlers(&client)) {
        Ok(outcome) if outcome.reload_required() => {
            println!(
                "✅ Reset {} stuck crawler job(s). Reload the job list to see their new state.",
                outcome.updated_jobs
            );
            Ok(())
        }
        Ok(_) => {
            println!("✅ No stuck crawler jobs found.");
            Ok(())
        }
        Err(e) => report_failure("check stuck crawlers", e),
    }
}

pub(crate) fn handle_reset_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let job_id = matches
        .get_one::<String>("id")
        .ok_or("Job id argument is required")?;
    let kind = if matches.get_flag("processing") {
        JobKind::Processing
    } else {
        JobKind::Crawl
    };

    if !matches.get_flag("yes") {
        print!(
            "Reset {} job '{}' to completed? The job itself is not stopped. [y/N] ",
            kind, job_id
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !is_confirmation_accepted(&input) {
            println!("Aborted.");
            info!(event = "cli.reset_aborted", kind = %kind, job_id = job_id.as_str());
            return Ok(());
        }
    }

    let config = load_config(matches);
    let client = build_client(&config)?;

    match runtime()?.block_on(actions::reset_job(&client, kind, job_id)) {
        Ok(message) => {
            println!("✅ {}", message);
            Ok(())
        }
        Err(e) => report_failure(&format!("reset {} job '{}'", kind, job_id), e),
    }
}

pub(crate) fn handle_force_update_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let job_id = matches
        .get_one::<String>("id")
        .ok_or("Job id argument is required")?;

    let config = load_config(matches);
    let client = build_client(&config)?;

    match runtime()?.block_on(actions::force_update_records(&client, job_id)) {
        Ok(outcome) => {
            match outcome.records_count {
                Some(count) => println!("✅ {} (records: {})", outcome.message, count),
                None => println!("✅ {}", outcome.message),
            }
            Ok(())
        }
        Err(e) => report_failure(&format!("force update records of job '{}'", job_id), e),
    }
}

fn report_failure(what: &str, e: ActionError) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("❌ Failed to {}: {}", what, e);
    events::log_app_error(&e);
    Err(e.into())
}
