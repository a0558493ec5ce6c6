use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const RUNNING_STATUS: &str = "running";
pub const RUNNING_PREFIX: &str = "running-";
pub const COMPLETED_STATUS: &str = "completed";

/// Records count shown when the backend omits it.
pub const DEFAULT_RECORDS_COUNT: &str = "0";

/// Whether a status belongs to the running family (`running` or `running-*`).
pub fn is_running_status(status: &str) -> bool {
    status == RUNNING_STATUS || status.starts_with(RUNNING_PREFIX)
}

/// Any status outside the running family is terminal.
pub fn is_terminal_status(status: &str) -> bool {
    !is_running_status(status)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Crawl,
    Processing,
}

impl JobKind {
    /// Processing rows carry a file path (`input/output`) in their secondary
    /// identifier cell; crawl rows carry a plain filename.
    pub fn from_source(source: &str) -> Self {
        if source.contains('/') {
            JobKind::Processing
        } else {
            JobKind::Crawl
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Crawl => "crawl",
            JobKind::Processing => "processing",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One background job as shown in the jobs table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRow {
    pub id: String,
    /// Secondary identifier cell (crawl filename or processing file path).
    #[serde(default)]
    pub source: String,
    pub status: String,
    #[serde(default = "default_records_count")]
    pub records_count: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub output_file: Option<String>,
}

fn default_records_count() -> String {
    DEFAULT_RECORDS_COUNT.to_string()
}

impl JobRow {
    pub fn new(id: impl Into<String>, source: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            status: status.into(),
            records_count: default_records_count(),
            end_time: None,
            output_file: None,
        }
    }

    pub fn with_records_count(mut self, records_count: impl Into<String>) -> Self {
        self.records_count = records_count.into();
        self
    }

    pub fn kind(&self) -> JobKind {
        JobKind::from_source(&self.source)
    }

    /// Parse the CLI shorthand `ID[:SOURCE]` for a job known to be running.
    pub fn parse_running_spec(spec: &str) -> Option<Self> {
        let (id, source) = match spec.split_once(':') {
            Some((id, source)) => (id.trim(), source.trim()),
            None => (spec.trim(), ""),
        };
        if id.is_empty() {
            return None;
        }
        Some(Self::new(id, source, RUNNING_STATUS))
    }
}

/// Status endpoint for one job, derived once from its kind and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusEndpoint {
    pub kind: JobKind,
    pub job_id: String,
}

impl StatusEndpoint {
    pub fn new(kind: JobKind, job_id: impl Into<String>) -> Self {
        Self {
            kind,
            job_id: job_id.into(),
        }
    }

    pub fn for_row(row: &JobRow) -> Self {
        Self::new(row.kind(), row.id.clone())
    }

    pub fn path(&self) -> String {
        match self.kind {
            JobKind::Crawl => format!("/api/crawl-status/{}", self.job_id),
            JobKind::Processing => format!("/api/processing-status/{}", self.job_id),
        }
    }
}

impl fmt::Display for StatusEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Body returned by the crawl/processing status endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_records_count")]
    pub records_count: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl StatusResponse {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    /// Records count as displayed: absent, null or empty means "0".
    pub fn records_display(&self) -> &str {
        match self.records_count.as_deref() {
            Some(count) if !count.is_empty() => count,
            _ => DEFAULT_RECORDS_COUNT,
        }
    }

    pub fn is_running(&self) -> bool {
        is_running_status(&self.status)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecordsCount {
    Integer(i64),
    Text(String),
}

/// The backend sends an integer; older rows were rendered as strings.
fn deserialize_records_count<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawRecordsCount>::deserialize(deserializer)?.map(|raw| match raw {
            RawRecordsCount::Integer(n) => n.to_string(),
            RawRecordsCount::Text(s) => s,
        }),
    )
}
