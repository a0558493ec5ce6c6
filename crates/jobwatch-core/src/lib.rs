//! jobwatch-core: Status polling for long-running crawl and processing jobs
//!
//! This library watches background jobs exposed by the car-price backend,
//! reconciles the reported state into display surfaces, and wraps the
//! operator endpoints. It is used by the `jobwatch` CLI.
//!
//! # Main Entry Points
//!
//! - [`watch`] - Start pollers and the bulk refresher over a set of surfaces
//! - [`poller`] - Per-job status polling state machine
//! - [`reconcile`] - Pure reconciliation of responses into display writes
//! - [`client`] - HTTP client for the backend API
//! - [`actions`] - Operator-triggered actions (stuck check, resets)
//! - [`catalog`] - Brand/model/car type lookups
//! - [`config`] - Configuration management

pub mod actions;
pub mod catalog;
pub mod client;
pub mod config;
pub mod display;
pub mod errors;
pub mod events;
pub mod jobs;
pub mod logging;
pub mod poller;
pub mod reconcile;
pub mod refresher;
pub mod reload;
pub mod scheduler;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types at crate root for convenience
pub use client::{ApiClient, ClientError, StatusSource};
pub use config::JobwatchConfig;
pub use display::{BadgeStyle, DisplayState, DisplaySurface, FieldWrite, MemorySurface};
pub use jobs::{JobKind, JobRow, StatusEndpoint, StatusResponse};
pub use poller::{JobStatusPoller, PollSession, PollerExit};
pub use reload::{ChannelReloader, PageReloader, ReloadRequest};
pub use scheduler::PeriodicTask;
pub use watch::{WatchHandle, start_watching};

// Re-export logging initialization
pub use logging::init_logging;
