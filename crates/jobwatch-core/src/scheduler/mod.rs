//! Owned, cancellable periodic tasks.
//!
//! A [`PeriodicTask`] runs its tick closure once per period, starting one
//! period after spawn. Ticks of one task never overlap: the next tick waits
//! for the previous tick's future, and ticks missed in the meantime are
//! skipped rather than queued.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shortest period a task will tick at; a zero period is raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct PeriodicTask {
    name: String,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn a periodic task on the current tokio runtime.
    ///
    /// Returning `ControlFlow::Break` from a tick cancels the task from the
    /// inside. Periods below [`MIN_PERIOD`] are clamped to it. Must be called
    /// within a runtime context.
    pub fn spawn<F, Fut>(name: impl Into<String>, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let name = name.into();
        let period = period.max(MIN_PERIOD);
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let flow = tokio::select! {
                    _ = task_token.cancelled() => break,
                    flow = tick() => flow,
                };

                if flow.is_break() {
                    task_token.cancel();
                    break;
                }
            }

            debug!(event = "core.scheduler.task_stopped", task = %task_name);
        });

        debug!(
            event = "core.scheduler.task_spawned",
            task = %name,
            period_ms = period.as_millis() as u64
        );

        Self {
            name,
            token,
            handle,
        }
    }

    /// Cancel the task. Returns `true` only for the call that actually
    /// performed the cancellation.
    pub fn cancel(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to stop, either by cancellation or by a tick
    /// returning `Break`.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            debug!(
                event = "core.scheduler.task_join_failed",
                task = %self.name,
                error = %e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let task = PeriodicTask::spawn("test", Duration::from_millis(100), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        assert!(task.cancel());
        assert!(!task.cancel());
        task.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_stops_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let task = PeriodicTask::spawn("test", Duration::from_millis(10), move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 >= 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert!(task.is_cancelled());
        assert!(task.is_finished());
        // Already cancelled from inside
        assert!(!task.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let task = PeriodicTask::spawn("zero", Duration::ZERO, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!task.is_finished(), "a zero period must not panic the task");
        let ticked = ticks.load(Ordering::SeqCst);
        assert!((9..=10).contains(&ticked), "ticked {} times", ticked);

        task.cancel();
        task.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_ticks_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::new(AtomicUsize::new(0));

        let (flight, max, counter) = (in_flight.clone(), max_in_flight.clone(), ticks.clone());
        let task = PeriodicTask::spawn("slow", Duration::from_millis(100), move || {
            let (flight, max, counter) = (flight.clone(), max.clone(), counter.clone());
            async move {
                let now = flight.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(250)).await;
                flight.fetch_sub(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        // 250ms ticks on a 100ms period: skipped ticks are not queued
        assert!(ticks.load(Ordering::SeqCst) <= 4);

        task.cancel();
        task.join().await;
    }
}
