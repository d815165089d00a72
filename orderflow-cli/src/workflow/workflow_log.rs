//! One row per workflow run, appended to a log sink

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use super::summary::{RunSummary, StageSummary};
use super::traits::RecordSink;

pub const LOG_HEADERS: [&str; 9] = [
    "Start Time",
    "End Time",
    "Duration",
    "Workflow",
    "Processed",
    "Total Items",
    "Failed",
    "Skipped",
    "Status",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowLogEntry {
    pub start: String,
    pub end: String,
    pub duration: String,
    pub workflow: String,
    pub processed: usize,
    /// Rows added (sheet runs) or attachments stored (staging runs)
    pub items: usize,
    pub failed: usize,
    pub skipped: usize,
    pub status: String,
}

impl WorkflowLogEntry {
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self::build(
            summary.started_at,
            summary.finished_at,
            &summary.workflow,
            [summary.processed, summary.rows_added, summary.failed, summary.skipped],
            summary.status_label(),
        )
    }

    pub fn from_stage_summary(summary: &StageSummary) -> Self {
        Self::build(
            summary.started_at,
            summary.finished_at,
            &summary.workflow,
            [
                summary.processed,
                summary.total_attachments,
                summary.failed,
                summary.skipped,
            ],
            summary.status_label(),
        )
    }

    fn build(
        start: DateTime<Local>,
        end: DateTime<Local>,
        workflow: &str,
        [processed, items, failed, skipped]: [usize; 4],
        status: &str,
    ) -> Self {
        let seconds = (end - start).num_milliseconds().max(0) as f64 / 1000.0;
        WorkflowLogEntry {
            start: start.format(TIMESTAMP_FORMAT).to_string(),
            end: end.format(TIMESTAMP_FORMAT).to_string(),
            duration: format_duration(seconds),
            workflow: workflow.to_string(),
            processed,
            items,
            failed,
            skipped,
            status: status.to_string(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.start.clone(),
            self.end.clone(),
            self.duration.clone(),
            self.workflow.clone(),
            self.processed.to_string(),
            self.items.to_string(),
            self.failed.to_string(),
            self.skipped.to_string(),
            self.status.clone(),
        ]
    }
}

/// `12.34s` below a minute, `2m 5s` from a minute up
pub fn format_duration(seconds: f64) -> String {
    if seconds >= 60.0 {
        let minutes = (seconds / 60.0).floor() as u64;
        let rest = (seconds % 60.0).floor() as u64;
        format!("{}m {}s", minutes, rest)
    } else {
        format!("{:.2}s", seconds)
    }
}

/// Append `entry`, creating the header row if the log is new
pub async fn append_workflow_log(sink: &dyn RecordSink, entry: &WorkflowLogEntry) -> Result<()> {
    let headers: Vec<String> = LOG_HEADERS.iter().map(|h| h.to_string()).collect();
    sink.ensure_headers(&headers)
        .await
        .context("Failed to prepare workflow log headers")?;
    sink.append(&[entry.to_row()])
        .await
        .context("Failed to append workflow log row")?;
    log::info!("Workflow '{}' logged ({})", entry.workflow, entry.status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12.344), "12.34s");
        assert_eq!(format_duration(0.0), "0.00s");
        assert_eq!(format_duration(125.3), "2m 5s");
        assert_eq!(format_duration(60.0), "1m 0s");
    }

    #[test]
    fn test_entry_from_summary() {
        let start = Local.with_ymd_and_hms(2026, 2, 11, 12, 5, 33).unwrap();
        let mut summary = RunSummary::start("Drive to Sheet");
        summary.started_at = start;
        summary.finished_at = start + Duration::milliseconds(12_340);
        summary.processed = 2;
        summary.rows_added = 17;
        summary.skipped = 5;

        let entry = WorkflowLogEntry::from_summary(&summary);
        assert_eq!(
            entry.to_row(),
            vec![
                "2026-02-11 12:05:33",
                "2026-02-11 12:05:45",
                "12.34s",
                "Drive to Sheet",
                "2",
                "17",
                "0",
                "5",
                "Success",
            ]
        );
    }

    #[test]
    fn test_stage_entry_counts_attachments() {
        let mut summary = StageSummary::start("Mail to Drive");
        summary.processed = 2;
        summary.total_attachments = 2;
        summary.skipped = 3;

        let entry = WorkflowLogEntry::from_stage_summary(&summary);
        assert_eq!(entry.items, 2);
        assert_eq!(entry.skipped, 3);
        assert_eq!(entry.status, "Success");
    }
}
