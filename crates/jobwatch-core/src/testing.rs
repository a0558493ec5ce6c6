//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::{ClientError, StatusSource};
use crate::jobs::{StatusEndpoint, StatusResponse};
use crate::reload::PageReloader;

pub fn status(status: &str, records: Option<&str>) -> Result<StatusResponse, ClientError> {
    Ok(StatusResponse {
        records_count: records.map(str::to_string),
        ..StatusResponse::with_status(status)
    })
}

pub fn running(records: &str) -> Result<StatusResponse, ClientError> {
    status("running", Some(records))
}

pub fn failure() -> Result<StatusResponse, ClientError> {
    Err(ClientError::Transport {
        path: "/api/crawl-status/test".to_string(),
        message: "connection refused".to_string(),
    })
}

/// Answers from a fixed script, then reports `running` forever.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<StatusResponse, ClientError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    endpoints: Mutex<Vec<StatusEndpoint>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Result<StatusResponse, ClientError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn endpoints(&self) -> Vec<StatusEndpoint> {
        self.endpoints.lock().unwrap().clone()
    }
}

impl StatusSource for ScriptedSource {
    async fn fetch_status(&self, endpoint: &StatusEndpoint) -> Result<StatusResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.endpoints.lock().unwrap().push(endpoint.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| running("0"))
    }
}

#[derive(Default)]
pub struct RecordingReloader {
    requests: Mutex<Vec<(String, Duration)>>,
}

impl RecordingReloader {
    pub fn requests(&self) -> Vec<(String, Duration)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageReloader for RecordingReloader {
    fn schedule_reload(&self, job_id: &str, delay: Duration) {
        self.requests
            .lock()
            .unwrap()
            .push((job_id.to_string(), delay));
    }
}
