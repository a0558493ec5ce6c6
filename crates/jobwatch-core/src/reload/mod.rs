//! Reload requests issued after a job reaches a terminal status.
//!
//! A browser would reload the whole page so server-rendered state replaces
//! the client-patched cells. Here the front end receives a
//! [`ReloadRequest`] once the settle delay has elapsed and decides how to
//! re-render.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub job_id: String,
    pub delay: Duration,
}

pub trait PageReloader: Send + Sync + 'static {
    /// Request a reload once `delay` has elapsed. Must not block.
    fn schedule_reload(&self, job_id: &str, delay: Duration);
}

/// Delivers reload requests over an mpsc channel after the delay.
#[derive(Debug, Clone)]
pub struct ChannelReloader {
    tx: mpsc::UnboundedSender<ReloadRequest>,
}

impl ChannelReloader {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ReloadRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PageReloader for ChannelReloader {
    fn schedule_reload(&self, job_id: &str, delay: Duration) {
        info!(
            event = "core.reload.scheduled",
            job_id = job_id,
            delay_ms = delay.as_millis() as u64
        );

        let tx = self.tx.clone();
        let request = ReloadRequest {
            job_id: job_id.to_string(),
            delay,
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(request).is_err() {
                debug!(event = "core.reload.receiver_dropped");
            }
        });
    }
}
