//! Job Status Poller.
//!
//! One poller per job row observed as running. It owns a [`PeriodicTask`]
//! and is the only thing that ever stops it: the task ends when the job
//! reaches a terminal status or the error budget runs out.

pub mod session;

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::StatusSource;
use crate::config::PollingConfig;
use crate::display::{DisplaySurface, FieldWrite, SharedSurface};
use crate::jobs::StatusEndpoint;
use crate::reload::PageReloader;
use crate::scheduler::PeriodicTask;

pub use session::{PollSession, SessionState, TickOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollerExit {
    Finished { status: String },
    GaveUp,
    /// The task stopped without the session reaching an end state.
    Interrupted,
}

impl PollerExit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollerExit::Finished { .. } => "finished",
            PollerExit::GaveUp => "gave_up",
            PollerExit::Interrupted => "interrupted",
        }
    }
}

pub struct JobStatusPoller {
    endpoint: StatusEndpoint,
    session: Arc<Mutex<PollSession>>,
    task: PeriodicTask,
}

impl JobStatusPoller {
    /// Attach a poller to a surface currently showing a running job.
    ///
    /// Sets the surface's updating marker and starts polling one interval
    /// from now. An unvalidated zero interval is clamped to
    /// [`MIN_PERIOD`](crate::scheduler::MIN_PERIOD).
    pub async fn start<S, D, R>(
        surface: SharedSurface<D>,
        source: Arc<S>,
        reloader: Arc<R>,
        config: &PollingConfig,
    ) -> Self
    where
        S: StatusSource,
        D: DisplaySurface,
        R: PageReloader,
    {
        let endpoint = {
            let mut surface = surface.lock().await;
            if !surface.state().updating {
                surface.apply(&FieldWrite::Updating(true));
            }
            surface.endpoint()
        };

        let session = Arc::new(Mutex::new(PollSession::new(
            endpoint.clone(),
            config.max_errors(),
        )));
        let reload_delay = config.reload_delay();

        info!(
            event = "core.poller.started",
            job_id = %endpoint.job_id,
            endpoint = %endpoint,
            interval_ms = config.interval().as_millis() as u64,
            max_errors = config.max_errors()
        );

        let tick_session = session.clone();
        let task = PeriodicTask::spawn(
            format!("poll {}", endpoint),
            config.interval(),
            move || {
                let session = tick_session.clone();
                let surface = surface.clone();
                let source = source.clone();
                let reloader = reloader.clone();
                async move {
                    poll_tick(
                        source.as_ref(),
                        &surface,
                        &session,
                        reloader.as_ref(),
                        reload_delay,
                    )
                    .await
                }
            },
        );

        Self {
            endpoint,
            session,
            task,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.endpoint.job_id
    }

    pub fn endpoint(&self) -> &StatusEndpoint {
        &self.endpoint
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn consecutive_errors(&self) -> u32 {
        self.session.lock().await.consecutive_errors()
    }

    /// Wait for the poller to stop on its own.
    pub async fn join(self) -> PollerExit {
        self.task.join().await;
        match self.session.lock().await.state() {
            SessionState::Active => PollerExit::Interrupted,
            SessionState::Finished { status } => PollerExit::Finished {
                status: status.clone(),
            },
            SessionState::GaveUp => PollerExit::GaveUp,
        }
    }
}

async fn poll_tick<S, D, R>(
    source: &S,
    surface: &Mutex<D>,
    session: &Mutex<PollSession>,
    reloader: &R,
    reload_delay: Duration,
) -> ControlFlow<()>
where
    S: StatusSource,
    D: DisplaySurface,
    R: PageReloader,
{
    let endpoint = session.lock().await.endpoint().clone();
    let result = source.fetch_status(&endpoint).await;

    let mut surface = surface.lock().await;
    let mut session = session.lock().await;

    let outcome = match result {
        Ok(response) => {
            debug!(
                event = "core.poller.response_received",
                job_id = %endpoint.job_id,
                status = %response.status,
                records_count = response.records_display()
            );
            session.on_response(surface.state(), &response)
        }
        Err(e) => {
            let outcome = session.on_failure(surface.state());
            warn!(
                event = "core.poller.request_failed",
                job_id = %endpoint.job_id,
                endpoint = %endpoint,
                consecutive_errors = session.consecutive_errors(),
                error = %e
            );
            outcome
        }
    };

    for write in &outcome.writes {
        surface.apply(write);
    }

    match outcome.state {
        SessionState::Active => ControlFlow::Continue(()),
        SessionState::Finished { status } => {
            info!(
                event = "core.poller.job_finished",
                job_id = %endpoint.job_id,
                status = %status
            );
            reloader.schedule_reload(&endpoint.job_id, reload_delay);
            ControlFlow::Break(())
        }
        SessionState::GaveUp => {
            warn!(
                event = "core.poller.gave_up",
                job_id = %endpoint.job_id,
                endpoint = %endpoint,
                "Too many consecutive errors, stopping polling"
            );
            ControlFlow::Break(())
        }
    }
}
