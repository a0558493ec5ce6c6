use tracing::{error, info, warn};

use crate::actions::errors::ActionError;
use crate::client::{ApiClient, ForceUpdateResponse, ResetResponse, StuckCheckResponse};
use crate::jobs::JobKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckCheckOutcome {
    pub updated_jobs: u32,
}

impl StuckCheckOutcome {
    /// Rows on screen are stale once the server reset anything.
    pub fn reload_required(&self) -> bool {
        self.updated_jobs > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceUpdateOutcome {
    pub updated: bool,
    pub records_count: Option<u64>,
    pub message: String,
}

/// Ask the backend to reset crawlers that have been running too long.
pub async fn check_stuck_crawlers(client: &ApiClient) -> Result<StuckCheckOutcome, ActionError> {
    info!(event = "core.actions.stuck_check_started");

    let response = client.check_stuck_crawlers().await.inspect_err(|e| {
        error!(event = "core.actions.stuck_check_failed", error = %e);
    })?;
    let outcome = interpret_stuck_check(response)?;

    info!(
        event = "core.actions.stuck_check_completed",
        updated_jobs = outcome.updated_jobs
    );
    Ok(outcome)
}

/// Reset one running job to `completed` on the backend.
pub async fn reset_job(
    client: &ApiClient,
    kind: JobKind,
    job_id: &str,
) -> Result<String, ActionError> {
    info!(
        event = "core.actions.reset_started",
        kind = %kind,
        job_id = job_id
    );

    let response = client.reset_job(kind, job_id).await.inspect_err(|e| {
        error!(
            event = "core.actions.reset_failed",
            kind = %kind,
            job_id = job_id,
            error = %e
        );
    })?;
    let message = interpret_reset(response)?;

    info!(
        event = "core.actions.reset_completed",
        kind = %kind,
        job_id = job_id
    );
    Ok(message)
}

/// Make the backend recount a running crawl's records from its output file.
pub async fn force_update_records(
    client: &ApiClient,
    job_id: &str,
) -> Result<ForceUpdateOutcome, ActionError> {
    info!(event = "core.actions.force_update_started", job_id = job_id);

    let response = client.force_update_records(job_id).await?;
    let outcome = interpret_force_update(response)?;

    info!(
        event = "core.actions.force_update_completed",
        job_id = job_id,
        updated = outcome.updated,
        records_count = outcome.records_count
    );
    Ok(outcome)
}

pub fn interpret_stuck_check(response: StuckCheckResponse) -> Result<StuckCheckOutcome, ActionError> {
    if !response.success {
        warn!(event = "core.actions.stuck_check_rejected");
        return Err(ActionError::Rejected {
            message: "Stuck crawler check did not succeed".to_string(),
        });
    }
    Ok(StuckCheckOutcome {
        updated_jobs: response.updated_jobs,
    })
}

pub fn interpret_reset(response: ResetResponse) -> Result<String, ActionError> {
    if response.success {
        Ok(response.message)
    } else {
        warn!(
            event = "core.actions.reset_rejected",
            message = %response.message
        );
        Err(ActionError::Rejected {
            message: response.message,
        })
    }
}

pub fn interpret_force_update(response: ForceUpdateResponse) -> Result<ForceUpdateOutcome, ActionError> {
    if !response.success {
        return Err(ActionError::Rejected {
            message: response
                .error
                .or(response.message)
                .unwrap_or_else(|| "Force update did not succeed".to_string()),
        });
    }

    let message = response.message.unwrap_or_else(|| {
        if response.updated {
            "Records count updated".to_string()
        } else {
            "Records count is already up to date".to_string()
        }
    });

    Ok(ForceUpdateOutcome {
        updated: response.updated,
        records_count: response.records_count,
        message,
    })
}
