use serde::{Deserialize, Serialize};

use crate::jobs::{COMPLETED_STATUS, JobRow, is_running_status};

/// Badge styling for a job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Running, // warning badge
    Success, // completed
    Failure, // any other terminal status
}

impl BadgeStyle {
    pub fn for_status(status: &str) -> Self {
        if is_running_status(status) {
            BadgeStyle::Running
        } else {
            Self::for_terminal(status)
        }
    }

    pub fn for_terminal(status: &str) -> Self {
        if status == COMPLETED_STATUS {
            BadgeStyle::Success
        } else {
            BadgeStyle::Failure
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeStyle::Running => "⏳",
            BadgeStyle::Success => "✅",
            BadgeStyle::Failure => "❌",
        }
    }
}

/// Everything a display surface shows for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub status: String,
    pub style: BadgeStyle,
    /// The "updating" marker shown while a poller is attached.
    pub updating: bool,
    pub records_count: String,
    pub end_time: Option<String>,
    pub output_file: Option<String>,
}

impl DisplayState {
    pub fn from_row(row: &JobRow) -> Self {
        Self {
            status: row.status.clone(),
            style: BadgeStyle::for_status(&row.status),
            updating: false,
            records_count: row.records_count.clone(),
            end_time: row.end_time.clone(),
            output_file: row.output_file.clone(),
        }
    }

    pub fn apply(&mut self, write: &FieldWrite) {
        match write {
            FieldWrite::RecordsCount(count) => self.records_count = count.clone(),
            FieldWrite::StatusText(status) => self.status = status.clone(),
            FieldWrite::Style(style) => self.style = *style,
            FieldWrite::Updating(updating) => self.updating = *updating,
            FieldWrite::EndTime(end_time) => self.end_time = Some(end_time.clone()),
            FieldWrite::OutputFile(output_file) => self.output_file = Some(output_file.clone()),
        }
    }
}

/// A single visible write to a display surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldWrite {
    RecordsCount(String),
    StatusText(String),
    Style(BadgeStyle),
    Updating(bool),
    EndTime(String),
    OutputFile(String),
}
