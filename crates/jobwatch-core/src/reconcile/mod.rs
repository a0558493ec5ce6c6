//! Pure reconciliation of status responses into display writes.
//!
//! Nothing here touches a surface: callers get the next state plus the list
//! of writes needed to reach it and apply them through a
//! [`DisplaySurface`](crate::display::DisplaySurface).

use crate::display::{BadgeStyle, DisplayState, FieldWrite};
use crate::jobs::{JobKind, StatusResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub next: DisplayState,
    /// Only fields whose value changes appear here.
    pub writes: Vec<FieldWrite>,
    pub terminal: bool,
}

/// Reconcile a status response into the current display state.
///
/// Records count and status text are written only when they differ. On a
/// terminal status the updating marker is cleared, the badge switches to
/// success or failure styling, and `end_time` (plus `output_file` for
/// processing jobs) is written when the response carries it.
pub fn reconcile(current: &DisplayState, response: &StatusResponse, kind: JobKind) -> Reconciliation {
    let mut next = current.clone();
    let mut writes = Vec::new();

    let mut write = |next: &mut DisplayState, w: FieldWrite| {
        next.apply(&w);
        writes.push(w);
    };

    let records = response.records_display();
    if next.records_count != records {
        write(&mut next, FieldWrite::RecordsCount(records.to_string()));
    }

    if next.status != response.status {
        write(&mut next, FieldWrite::StatusText(response.status.clone()));
    }

    let terminal = !response.is_running();
    if terminal {
        if next.updating {
            write(&mut next, FieldWrite::Updating(false));
        }

        let style = BadgeStyle::for_terminal(&response.status);
        if next.style != style {
            write(&mut next, FieldWrite::Style(style));
        }

        if let Some(end_time) = &response.end_time
            && next.end_time.as_ref() != Some(end_time)
        {
            write(&mut next, FieldWrite::EndTime(end_time.clone()));
        }

        if kind == JobKind::Processing
            && let Some(output_file) = &response.output_file
            && next.output_file.as_ref() != Some(output_file)
        {
            write(&mut next, FieldWrite::OutputFile(output_file.clone()));
        }
    }

    Reconciliation {
        next,
        writes,
        terminal,
    }
}

/// Records-only reconciliation used by the bulk refresher.
pub fn refresh_records(current: &DisplayState, response: &StatusResponse) -> Option<FieldWrite> {
    let records = response.records_display();
    (current.records_count != records).then(|| FieldWrite::RecordsCount(records.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobRow;

    fn running_state(records: &str) -> DisplayState {
        let row = JobRow::new("42", "cars.csv", "running").with_records_count(records);
        let mut state = DisplayState::from_row(&row);
        state.updating = true;
        state
    }

    fn response(status: &str, records: Option<&str>) -> StatusResponse {
        StatusResponse {
            records_count: records.map(str::to_string),
            ..StatusResponse::with_status(status)
        }
    }

    #[test]
    fn test_running_response_updates_records_only() {
        let current = running_state("100");
        let result = reconcile(&current, &response("running", Some("150")), JobKind::Crawl);

        assert!(!result.terminal);
        assert_eq!(
            result.writes,
            vec![FieldWrite::RecordsCount("150".to_string())]
        );
        assert!(result.next.updating);
        assert_eq!(result.next.style, BadgeStyle::Running);
    }

    #[test]
    fn test_running_subphase_is_not_terminal() {
        let current = running_state("100");
        let result = reconcile(
            &current,
            &response("running-details", Some("100")),
            JobKind::Crawl,
        );

        assert!(!result.terminal);
        assert_eq!(
            result.writes,
            vec![FieldWrite::StatusText("running-details".to_string())]
        );
    }

    #[test]
    fn test_identical_response_produces_no_writes() {
        let current = running_state("100");
        let resp = response("running", Some("150"));

        let first = reconcile(&current, &resp, JobKind::Crawl);
        assert_eq!(first.writes.len(), 1);

        let second = reconcile(&first.next, &resp, JobKind::Crawl);
        assert!(second.writes.is_empty());
        assert_eq!(second.next, first.next);
    }

    #[test]
    fn test_completed_crawl_writes_final_state() {
        let current = running_state("1200");
        let resp = StatusResponse {
            end_time: Some("2024-01-01 10:00".to_string()),
            ..response("completed", Some("1530"))
        };

        let result = reconcile(&current, &resp, JobKind::Crawl);

        assert!(result.terminal);
        assert_eq!(result.next.status, "completed");
        assert_eq!(result.next.style, BadgeStyle::Success);
        assert!(!result.next.updating);
        assert_eq!(result.next.records_count, "1530");
        assert_eq!(result.next.end_time.as_deref(), Some("2024-01-01 10:00"));
        assert!(result.writes.contains(&FieldWrite::Style(BadgeStyle::Success)));
        assert!(result.writes.contains(&FieldWrite::Updating(false)));
    }

    #[test]
    fn test_failed_processing_without_optional_fields() {
        let row = JobRow::new("7", "raw/cars.csv", "running");
        let current = DisplayState::from_row(&row);

        let result = reconcile(&current, &response("failed", None), JobKind::Processing);

        assert!(result.terminal);
        assert_eq!(result.next.style, BadgeStyle::Failure);
        assert!(
            !result
                .writes
                .iter()
                .any(|w| matches!(w, FieldWrite::OutputFile(_) | FieldWrite::EndTime(_)))
        );
    }

    #[test]
    fn test_output_file_only_for_processing() {
        let current = running_state("10");
        let resp = StatusResponse {
            output_file: Some("processed/out.csv".to_string()),
            ..response("completed", Some("10"))
        };

        let crawl = reconcile(&current, &resp, JobKind::Crawl);
        assert_eq!(crawl.next.output_file, None);

        let processing = reconcile(&current, &resp, JobKind::Processing);
        assert_eq!(
            processing.next.output_file.as_deref(),
            Some("processed/out.csv")
        );
    }

    #[test]
    fn test_missing_records_count_displays_zero() {
        let current = running_state("37");
        let result = reconcile(&current, &response("running", None), JobKind::Crawl);
        assert_eq!(result.next.records_count, "0");
    }

    #[test]
    fn test_refresh_records() {
        let current = running_state("100");
        assert_eq!(refresh_records(&current, &response("running", Some("100"))), None);
        assert_eq!(
            refresh_records(&current, &response("running-x", Some("140"))),
            Some(FieldWrite::RecordsCount("140".to_string()))
        );
    }
}
