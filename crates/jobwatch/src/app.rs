use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("jobwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Follow crawl and processing jobs of the car-price backend")
        .long_about("jobwatch polls the status endpoints of running crawl and processing jobs, keeps a live table of their records counts and final state, and wraps the operator endpoints for stuck or broken jobs.")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only emit error-level log events")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("Base URL of the web application (overrides config)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("watch")
                .about("Poll running jobs until they finish")
                .long_about(
                    "Loads job rows, attaches a status poller to every row whose status is exactly 'running' \
                    and periodically refreshes records counts of all running rows.\n\n\
                    The table is re-rendered whenever a job reaches a final state.",
                )
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .help("JSON file with an array of job rows ({id, source, status, records_count, ...})")
                        .value_parser(value_parser!(std::path::PathBuf)),
                )
                .arg(
                    Arg::new("job")
                        .long("job")
                        .short('j')
                        .help("Running job as ID[:SOURCE]; a SOURCE containing '/' marks a processing job")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Poll interval in milliseconds (overrides config, default: 8000)")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("max-errors")
                        .long("max-errors")
                        .help("Consecutive failures before a poller gives up (overrides config, default: 3)")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("no-refresh")
                        .long("no-refresh")
                        .help("Do not run the bulk records refresher")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Fetch the current status of one job")
                .arg(
                    Arg::new("id")
                        .help("Job id")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("processing")
                        .long("processing")
                        .short('p')
                        .help("Query the processing-status endpoint instead of crawl-status")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check-stuck")
                .about("Ask the backend to reset crawlers that have been running too long"),
        )
        .subcommand(
            Command::new("reset")
                .about("Reset a running job to completed")
                .arg(
                    Arg::new("id")
                        .help("Job id")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("processing")
                        .long("processing")
                        .short('p')
                        .help("Reset a processing job instead of a crawl")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("force-update")
                .about("Recount a running crawl's records from its output file")
                .arg(
                    Arg::new("id")
                        .help("Crawl job id")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("models")
                .about("List car models of a brand")
                .arg(
                    Arg::new("brand-id")
                        .help("Brand id")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("car-types")
                .about("List car types of a model")
                .arg(
                    Arg::new("model-id")
                        .help("Model id")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}
