use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{info, warn};

use jobwatch_core::display::{MemorySurface, SharedSurface, shared};
use jobwatch_core::{
    ChannelReloader, JobKind, JobRow, JobwatchConfig, PollerExit, StatusEndpoint, start_watching,
};

use super::helpers::{build_client, load_config, print_json, runtime};
use crate::table::{RowSnapshot, TableFormatter, snapshot};

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let rows = collect_rows(
        matches.get_one::<PathBuf>("rows").map(PathBuf::as_path),
        matches
            .get_many::<String>("job")
            .map(|specs| specs.cloned().collect())
            .unwrap_or_default(),
    )?;

    let mut config = load_config(matches);
    apply_overrides(&mut config, matches);
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        return Err(e.into());
    }

    let client = build_client(&config)?;
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.watch_started",
        rows = rows.len(),
        base_url = client.base_url()
    );

    runtime()?.block_on(async move {
        let surfaces: Vec<SharedSurface<MemorySurface>> = rows
            .iter()
            .map(|row| shared(MemorySurface::from_row(row)))
            .collect();
        let (reloader, mut reloads) = ChannelReloader::new();

        let mut handle =
            start_watching(surfaces.clone(), Arc::new(client), Arc::new(reloader), &config).await;

        // JSON mode prints a single report once polling is over
        if !json_output {
            render_table(&surfaces).await;
        }

        if handle.poller_count() == 0 {
            if json_output {
                print_report(&surfaces, &[]).await?;
            } else {
                println!("No rows with status 'running'; nothing to poll.");
            }
            handle.shutdown().await;
            return Ok(());
        }

        let mut reloads_seen = 0usize;
        let mut exits = None;
        {
            let pollers = handle.wait_for_pollers();
            tokio::pin!(pollers);

            loop {
                tokio::select! {
                    finished = &mut pollers => {
                        exits = Some(finished);
                        break;
                    }
                    Some(request) = reloads.recv() => {
                        reloads_seen += 1;
                        info!(event = "cli.watch_reload", job_id = %request.job_id);
                        if !json_output {
                            render_table(&surfaces).await;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        eprintln!("Interrupted.");
                        warn!(event = "cli.watch_interrupted");
                        break;
                    }
                }
            }
        }

        let exits = exits.unwrap_or_default();

        // The last terminal transitions still have reloads in flight
        let expected = exits
            .iter()
            .filter(|(_, exit)| matches!(exit, PollerExit::Finished { .. }))
            .count();
        while reloads_seen < expected {
            tokio::select! {
                Some(request) = reloads.recv() => {
                    reloads_seen += 1;
                    info!(event = "cli.watch_reload", job_id = %request.job_id);
                }
                _ = tokio::signal::ctrl_c() => break,
                else => break,
            }
        }

        if json_output {
            print_report(&surfaces, &exits).await?;
        } else {
            render_table(&surfaces).await;
            print_summary(&exits);
        }

        handle.shutdown().await;
        info!(event = "cli.watch_completed", reloads = reloads_seen);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Rows from the `--rows` file followed by `--job` shorthands.
fn collect_rows(
    rows_file: Option<&Path>,
    job_specs: Vec<String>,
) -> Result<Vec<JobRow>, Box<dyn std::error::Error>> {
    let mut rows = match rows_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read rows file '{}': {}", path.display(), e))?;
            serde_json::from_str::<Vec<JobRow>>(&content)
                .map_err(|e| format!("Invalid rows file '{}': {}", path.display(), e))?
        }
        None => Vec::new(),
    };

    for spec in job_specs {
        let row = JobRow::parse_running_spec(&spec)
            .ok_or_else(|| format!("Invalid job '{}': expected ID[:SOURCE]", spec))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err("No jobs given: use --rows FILE or --job ID[:SOURCE]".into());
    }

    Ok(rows)
}

fn apply_overrides(config: &mut JobwatchConfig, matches: &ArgMatches) {
    if let Some(interval_ms) = matches.get_one::<u64>("interval-ms") {
        config.polling.interval_ms = Some(*interval_ms);
    }
    if let Some(max_errors) = matches.get_one::<u32>("max-errors") {
        config.polling.max_errors = Some(*max_errors);
    }
    if matches.get_flag("no-refresh") {
        config.refresh.enabled = false;
    }
}

async fn render_table(surfaces: &[SharedSurface<MemorySurface>]) {
    let rows: Vec<RowSnapshot> = snapshot(surfaces).await;
    println!(
        "Jobs at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    TableFormatter::new(&rows).print_table(&rows);
}

/// Final JSON document: every row plus how each poller ended.
#[derive(Serialize)]
struct WatchReport<'a> {
    jobs: Vec<RowSnapshot>,
    exits: Vec<ExitEntry<'a>>,
}

#[derive(Serialize)]
struct ExitEntry<'a> {
    id: &'a str,
    kind: JobKind,
    #[serde(flatten)]
    exit: &'a PollerExit,
}

async fn print_report(
    surfaces: &[SharedSurface<MemorySurface>],
    exits: &[(StatusEndpoint, PollerExit)],
) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&build_report(surfaces, exits).await)
}

async fn build_report<'a>(
    surfaces: &[SharedSurface<MemorySurface>],
    exits: &'a [(StatusEndpoint, PollerExit)],
) -> WatchReport<'a> {
    WatchReport {
        jobs: snapshot(surfaces).await,
        exits: exits
            .iter()
            .map(|(endpoint, exit)| ExitEntry {
                id: &endpoint.job_id,
                kind: endpoint.kind,
                exit,
            })
            .collect(),
    }
}

fn print_summary(exits: &[(StatusEndpoint, PollerExit)]) {
    for (endpoint, exit) in exits {
        match exit {
            PollerExit::Finished { status } if status == "completed" => {
                println!("✅ {} job '{}' completed", endpoint.kind, endpoint.job_id)
            }
            PollerExit::Finished { status } => {
                println!("❌ {} job '{}' ended as '{}'", endpoint.kind, endpoint.job_id, status)
            }
            PollerExit::GaveUp => println!(
                "⚠️  {} job '{}': stopped polling after repeated errors",
                endpoint.kind, endpoint.job_id
            ),
            PollerExit::Interrupted => {
                println!("   {} job '{}': polling interrupted", endpoint.kind, endpoint.job_id)
            }
        }
    }
}
