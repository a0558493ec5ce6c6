use serde::Serialize;

use jobwatch_core::display::{DisplayState, DisplaySurface, SharedSurface};
use jobwatch_core::{BadgeStyle, JobKind};

/// Point-in-time copy of one surface, taken under its lock.
#[derive(Debug, Clone, Serialize)]
pub struct RowSnapshot {
    pub id: String,
    pub source: String,
    pub kind: JobKind,
    #[serde(flatten)]
    pub state: DisplayState,
}

pub async fn snapshot<D: DisplaySurface>(surfaces: &[SharedSurface<D>]) -> Vec<RowSnapshot> {
    let mut rows = Vec::with_capacity(surfaces.len());
    for surface in surfaces {
        let surface = surface.lock().await;
        rows.push(RowSnapshot {
            id: surface.job_id().to_string(),
            source: surface.source().to_string(),
            kind: surface.kind(),
            state: surface.state().clone(),
        });
    }
    rows
}

pub struct TableFormatter {
    id_width: usize,
    kind_width: usize,
    source_width: usize,
    status_width: usize,
    records_width: usize,
    end_width: usize,
    output_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[RowSnapshot]) -> Self {
        let id_width = rows
            .iter()
            .map(|r| r.id.chars().count())
            .max()
            .unwrap_or(4)
            .clamp(2, 12);
        let source_width = rows
            .iter()
            .map(|r| r.source.chars().count())
            .max()
            .unwrap_or(6)
            .clamp(6, 40);
        let status_width = rows
            .iter()
            .map(|r| status_cell(&r.state).chars().count())
            .max()
            .unwrap_or(6)
            .clamp(6, 24);

        Self {
            id_width,
            kind_width: 10,
            source_width,
            status_width,
            records_width: 9,
            end_width: 19,
            output_width: 24,
        }
    }

    pub fn render(&self, rows: &[RowSnapshot]) -> String {
        let mut lines = vec![self.border('┌', '┬', '┐'), self.header_row(), self.border('├', '┼', '┤')];
        lines.extend(rows.iter().map(|row| self.row(row)));
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    pub fn print_table(&self, rows: &[RowSnapshot]) {
        println!("{}", self.render(rows));
    }

    fn widths(&self) -> [usize; 7] {
        [
            self.id_width,
            self.kind_width,
            self.source_width,
            self.status_width,
            self.records_width,
            self.end_width,
            self.output_width,
        ]
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .widths()
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn line(&self, cells: [&str; 7]) -> String {
        let cells: Vec<String> = cells
            .iter()
            .zip(self.widths())
            .map(|(cell, width)| format!(" {} ", truncate(cell, width)))
            .collect();
        format!("│{}│", cells.join("│"))
    }

    fn header_row(&self) -> String {
        self.line(["ID", "Kind", "Source", "Status", "Records", "Ended", "Output"])
    }

    fn row(&self, row: &RowSnapshot) -> String {
        self.line([
            &row.id,
            row.kind.as_str(),
            &row.source,
            &status_cell(&row.state),
            &row.state.records_count,
            row.state.end_time.as_deref().unwrap_or(""),
            row.state.output_file.as_deref().unwrap_or(""),
        ])
    }
}

/// Badge text plus a trailing `*` while a poller is attached.
fn status_cell(state: &DisplayState) -> String {
    let badge = match state.style {
        BadgeStyle::Running => "~",
        BadgeStyle::Success => "+",
        BadgeStyle::Failure => "x",
    };
    let marker = if state.updating { " *" } else { "" };
    format!("{} {}{}", badge, state.status, marker)
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
