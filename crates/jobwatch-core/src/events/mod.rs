use tracing::{error, info, warn};

use crate::jobs::StatusEndpoint;
use crate::poller::PollerExit;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}

/// One event per poller that stopped, keyed by the endpoint it watched.
///
/// A give-up is a warning: the row keeps its last polled state and is only
/// corrected by the next full reload.
pub fn log_job_watch_ended(endpoint: &StatusEndpoint, exit: &PollerExit) {
    match exit {
        PollerExit::Finished { status } => info!(
            event = "core.job.watch_ended",
            job_id = %endpoint.job_id,
            kind = %endpoint.kind,
            outcome = exit.as_str(),
            status = %status
        ),
        PollerExit::GaveUp | PollerExit::Interrupted => warn!(
            event = "core.job.watch_ended",
            job_id = %endpoint.job_id,
            kind = %endpoint.kind,
            outcome = exit.as_str()
        ),
    }
}
