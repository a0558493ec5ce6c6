//! Bulk Refresher.
//!
//! Independently of the per-job pollers, periodically re-queries every
//! surface whose badge is still in the running family and applies only the
//! records-count update. It catches rows whose poller missed a tick or was
//! never started. Failures are logged and otherwise ignored.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::StatusSource;
use crate::display::{BadgeStyle, DisplaySurface, SharedSurface};
use crate::jobs::is_running_status;
use crate::reconcile::refresh_records;
use crate::scheduler::PeriodicTask;

pub struct BulkRefresher {
    task: PeriodicTask,
}

impl BulkRefresher {
    /// Start refreshing every `period`; a zero period is clamped to
    /// [`MIN_PERIOD`](crate::scheduler::MIN_PERIOD).
    pub fn start<S, D>(surfaces: Vec<SharedSurface<D>>, source: Arc<S>, period: Duration) -> Self
    where
        S: StatusSource,
        D: DisplaySurface,
    {
        let surfaces = Arc::new(surfaces);
        let task = PeriodicTask::spawn("bulk-refresh", period, move || {
            let surfaces = surfaces.clone();
            let source = source.clone();
            async move {
                refresh_tick(&surfaces, &source).await;
                ControlFlow::Continue(())
            }
        });

        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_cancelled()
    }

    /// Stop refreshing. Only called when the whole watch is torn down.
    pub async fn stop(self) {
        self.task.cancel();
        self.task.join().await;
    }
}

async fn refresh_tick<S, D>(surfaces: &[SharedSurface<D>], source: &Arc<S>)
where
    S: StatusSource,
    D: DisplaySurface,
{
    let mut dispatched = 0usize;

    for surface in surfaces {
        let endpoint = {
            let guard = surface.lock().await;
            let state = guard.state();
            if !(is_running_status(&state.status) && state.style == BadgeStyle::Running) {
                continue;
            }
            guard.endpoint()
        };

        // Fire-and-forget, one request per row
        let surface = surface.clone();
        let source = source.clone();
        dispatched += 1;
        tokio::spawn(async move {
            match source.fetch_status(&endpoint).await {
                Ok(response) => {
                    let mut guard = surface.lock().await;
                    if let Some(write) = refresh_records(guard.state(), &response) {
                        debug!(
                            event = "core.refresher.records_updated",
                            job_id = %endpoint.job_id,
                            records_count = response.records_display()
                        );
                        guard.apply(&write);
                    }
                }
                Err(e) => {
                    warn!(
                        event = "core.refresher.request_failed",
                        job_id = %endpoint.job_id,
                        endpoint = %endpoint,
                        error = %e
                    );
                }
            }
        });
    }

    debug!(event = "core.refresher.tick_completed", dispatched = dispatched);
}
