use std::sync::Arc;

use tokio::sync::Mutex;

use crate::display::types::{DisplayState, FieldWrite};
use crate::jobs::{JobKind, JobRow, StatusEndpoint};

/// The visible cells representing one job.
///
/// Pollers and the bulk refresher only ever read the current state and
/// apply individual [`FieldWrite`]s; everything else about rendering is
/// up to the implementation.
pub trait DisplaySurface: Send + 'static {
    fn job_id(&self) -> &str;

    /// Secondary identifier cell, used to infer the job kind.
    fn source(&self) -> &str;

    fn state(&self) -> &DisplayState;

    fn apply(&mut self, write: &FieldWrite);

    fn kind(&self) -> JobKind {
        JobKind::from_source(self.source())
    }

    fn endpoint(&self) -> StatusEndpoint {
        StatusEndpoint::new(self.kind(), self.job_id())
    }
}

/// Surfaces are shared between a poller and the bulk refresher.
pub type SharedSurface<D> = Arc<Mutex<D>>;

pub fn shared<D: DisplaySurface>(surface: D) -> SharedSurface<D> {
    Arc::new(Mutex::new(surface))
}

/// In-memory surface that keeps a log of every write it received.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    job_id: String,
    source: String,
    state: DisplayState,
    writes: Vec<FieldWrite>,
}

impl MemorySurface {
    pub fn from_row(row: &JobRow) -> Self {
        Self {
            job_id: row.id.clone(),
            source: row.source.clone(),
            state: DisplayState::from_row(row),
            writes: Vec::new(),
        }
    }

    pub fn writes(&self) -> &[FieldWrite] {
        &self.writes
    }

    /// Number of writes that touched the records cell.
    pub fn records_writes(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, FieldWrite::RecordsCount(_)))
            .count()
    }
}

impl DisplaySurface for MemorySurface {
    fn job_id(&self) -> &str {
        &self.job_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn state(&self) -> &DisplayState {
        &self.state
    }

    fn apply(&mut self, write: &FieldWrite) {
        self.state.apply(write);
        self.writes.push(write.clone());
    }
}
