//! Operator-triggered actions.
//!
//! Unlike passive polling, these are user-initiated: every outcome, success
//! or failure, is returned to the caller to be shown synchronously.

pub mod errors;
pub mod handler;

// Re-export commonly used types
pub use errors::ActionError;
pub use handler::{
    ForceUpdateOutcome, StuckCheckOutcome, check_stuck_crawlers, force_update_records, reset_job,
};
