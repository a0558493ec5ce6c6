pub mod types;

// Re-export commonly used types
pub use types::{
    COMPLETED_STATUS, DEFAULT_RECORDS_COUNT, JobKind, JobRow, RUNNING_PREFIX, RUNNING_STATUS,
    StatusEndpoint, StatusResponse, is_running_status, is_terminal_status,
};
