//! Watch initialization.
//!
//! Enumerates an injected list of display surfaces, attaches a
//! [`JobStatusPoller`] to every row showing `running`, and starts the
//! [`BulkRefresher`] over all of them.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::client::StatusSource;
use crate::config::JobwatchConfig;
use crate::display::{DisplaySurface, SharedSurface};
use crate::events;
use crate::jobs::{RUNNING_STATUS, StatusEndpoint};
use crate::poller::{JobStatusPoller, PollerExit};
use crate::refresher::BulkRefresher;
use crate::reload::PageReloader;

pub struct WatchHandle {
    pollers: Vec<JobStatusPoller>,
    refresher: Option<BulkRefresher>,
}

impl WatchHandle {
    pub fn poller_count(&self) -> usize {
        self.pollers.len()
    }

    pub fn watched_jobs(&self) -> Vec<StatusEndpoint> {
        self.pollers.iter().map(|p| p.endpoint().clone()).collect()
    }

    pub fn active_pollers(&self) -> usize {
        self.pollers.iter().filter(|p| !p.is_finished()).count()
    }

    pub fn has_refresher(&self) -> bool {
        self.refresher.is_some()
    }

    /// Wait until every poller has stopped on its own. The refresher keeps
    /// running; call [`WatchHandle::shutdown`] to stop it.
    pub async fn wait_for_pollers(&mut self) -> Vec<(StatusEndpoint, PollerExit)> {
        let pollers = std::mem::take(&mut self.pollers);
        join_all(pollers.into_iter().map(|poller| async move {
            let endpoint = poller.endpoint().clone();
            let exit = poller.join().await;
            events::log_job_watch_ended(&endpoint, &exit);
            (endpoint, exit)
        }))
        .await
    }

    /// Tear the watch down. Pollers that are still active end with the
    /// runtime; only the refresher is stopped here.
    pub async fn shutdown(self) {
        if let Some(refresher) = self.refresher {
            refresher.stop().await;
        }
        info!(
            event = "core.watch.shutdown_completed",
            remaining_pollers = self.pollers.len()
        );
    }
}

/// Start watching the given surfaces.
///
/// Only rows whose status text is exactly `running` get a poller; rows in a
/// `running-*` sub-phase at start-up are covered by the bulk refresher. A
/// second surface for an already watched `(kind, id)` is skipped.
pub async fn start_watching<S, D, R>(
    surfaces: Vec<SharedSurface<D>>,
    source: Arc<S>,
    reloader: Arc<R>,
    config: &JobwatchConfig,
) -> WatchHandle
where
    S: StatusSource,
    D: DisplaySurface,
    R: PageReloader,
{
    info!(event = "core.watch.start_started", surfaces = surfaces.len());

    let mut seen = HashSet::new();
    let mut pollers = Vec::new();

    for surface in &surfaces {
        let (endpoint, is_running) = {
            let guard = surface.lock().await;
            (guard.endpoint(), guard.state().status == RUNNING_STATUS)
        };

        if !is_running {
            continue;
        }

        if !seen.insert(endpoint.clone()) {
            warn!(
                event = "core.watch.duplicate_row_skipped",
                job_id = %endpoint.job_id,
                endpoint = %endpoint
            );
            continue;
        }

        pollers.push(
            JobStatusPoller::start(
                surface.clone(),
                source.clone(),
                reloader.clone(),
                &config.polling,
            )
            .await,
        );
    }

    let refresher = if config.refresh.enabled {
        Some(BulkRefresher::start(
            surfaces.clone(),
            source.clone(),
            config.refresh.interval(),
        ))
    } else {
        None
    };

    info!(
        event = "core.watch.start_completed",
        surfaces = surfaces.len(),
        pollers = pollers.len(),
        refresher = refresher.is_some()
    );

    WatchHandle { pollers, refresher }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{MemorySurface, shared};
    use crate::jobs::{JobKind, JobRow};
    use crate::testing::{RecordingReloader, ScriptedSource};

    fn surfaces(rows: &[JobRow]) -> Vec<SharedSurface<MemorySurface>> {
        rows.iter()
            .map(|row| shared(MemorySurface::from_row(row)))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_running_rows_get_pollers() {
        let rows = surfaces(&[
            JobRow::new("1", "cars.csv", "running"),
            JobRow::new("2", "raw/cars.csv", "running"),
            JobRow::new("3", "cars.csv", "completed"),
            JobRow::new("4", "cars.csv", "running-page-2"),
        ]);
        let source = Arc::new(ScriptedSource::new([]));
        let reloader = Arc::new(RecordingReloader::default());

        let handle = start_watching(
            rows.clone(),
            source,
            reloader,
            &JobwatchConfig::default(),
        )
        .await;

        assert_eq!(handle.poller_count(), 2);
        assert!(handle.has_refresher());
        assert_eq!(
            handle.watched_jobs(),
            vec![
                StatusEndpoint::new(JobKind::Crawl, "1"),
                StatusEndpoint::new(JobKind::Processing, "2"),
            ]
        );
        assert!(rows[0].lock().await.state().updating);
        assert!(!rows[2].lock().await.state().updating);
        assert!(!rows[3].lock().await.state().updating);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_rows_share_one_poller() {
        let rows = surfaces(&[
            JobRow::new("8", "cars.csv", "running"),
            JobRow::new("8", "cars.csv", "running"),
            // Same id, different kind: a separate job
            JobRow::new("8", "raw/cars.csv", "running"),
        ]);
        let source = Arc::new(ScriptedSource::new([]));
        let reloader = Arc::new(RecordingReloader::default());

        let handle = start_watching(rows, source, reloader, &JobwatchConfig::default()).await;

        assert_eq!(handle.poller_count(), 2);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresher_can_be_disabled() {
        let rows = surfaces(&[JobRow::new("1", "cars.csv", "running")]);
        let mut config = JobwatchConfig::default();
        config.refresh.enabled = false;

        let handle = start_watching(
            rows,
            Arc::new(ScriptedSource::new([])),
            Arc::new(RecordingReloader::default()),
            &config,
        )
        .await;

        assert!(!handle.has_refresher());
        assert_eq!(handle.active_pollers(), 1);
        handle.shutdown().await;
    }
}
