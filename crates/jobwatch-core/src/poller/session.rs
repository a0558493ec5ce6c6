use crate::display::{DisplayState, FieldWrite};
use crate::jobs::{StatusEndpoint, StatusResponse};
use crate::reconcile::reconcile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// A terminal status was observed; the session never polls again.
    Finished { status: String },
    /// The error budget was exhausted.
    GaveUp,
}

/// Result of feeding one tick's response (or failure) into a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub writes: Vec<FieldWrite>,
    pub state: SessionState,
}

/// Polling state for one job, free of any I/O.
#[derive(Debug, Clone)]
pub struct PollSession {
    endpoint: StatusEndpoint,
    consecutive_errors: u32,
    max_errors: u32,
    state: SessionState,
}

impl PollSession {
    pub fn new(endpoint: StatusEndpoint, max_errors: u32) -> Self {
        Self {
            endpoint,
            consecutive_errors: 0,
            max_errors,
            state: SessionState::Active,
        }
    }

    pub fn endpoint(&self) -> &StatusEndpoint {
        &self.endpoint
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn on_response(&mut self, current: &DisplayState, response: &StatusResponse) -> TickOutcome {
        if !self.is_active() {
            return self.inert();
        }

        self.consecutive_errors = 0;
        let reconciliation = reconcile(current, response, self.endpoint.kind);
        if reconciliation.terminal {
            self.state = SessionState::Finished {
                status: response.status.clone(),
            };
        }

        TickOutcome {
            writes: reconciliation.writes,
            state: self.state.clone(),
        }
    }

    pub fn on_failure(&mut self, current: &DisplayState) -> TickOutcome {
        if !self.is_active() {
            return self.inert();
        }

        self.consecutive_errors += 1;
        let mut writes = Vec::new();
        if self.consecutive_errors >= self.max_errors {
            self.state = SessionState::GaveUp;
            // Leave the last known state on screen, just stop "updating"
            if current.updating {
                writes.push(FieldWrite::Updating(false));
            }
        }

        TickOutcome {
            writes,
            state: self.state.clone(),
        }
    }

    fn inert(&self) -> TickOutcome {
        TickOutcome {
            writes: Vec::new(),
            state: self.state.clone(),
        }
    }
}
