//! Run results

use chrono::{DateTime, Local};
use serde::Serialize;

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Rows appended to the sink
    Processed { rows: usize },
    /// Readable, but no valid line items
    Empty,
    Failed { reason: String },
}

impl DocumentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Processed { .. } => "processed",
            DocumentStatus::Empty => "empty",
            DocumentStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub source_file: String,
    #[serde(flatten)]
    pub status: DocumentStatus,
    pub warnings: Vec<String>,
}

impl DocumentOutcome {
    pub fn failed(source_file: impl Into<String>, reason: impl Into<String>) -> Self {
        DocumentOutcome {
            source_file: source_file.into(),
            status: DocumentStatus::Failed {
                reason: reason.into(),
            },
            warnings: Vec::new(),
        }
    }
}

/// Counters of one inbox -> sink run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub workflow: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Documents listed (after the name filter)
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
    /// Already recorded in the sink
    pub skipped: usize,
    pub rows_added: usize,
    pub outcomes: Vec<DocumentOutcome>,
}

impl RunSummary {
    pub fn start(workflow: impl Into<String>) -> Self {
        let now = Local::now();
        RunSummary {
            workflow: workflow.into(),
            started_at: now,
            finished_at: now,
            total: 0,
            processed: 0,
            failed: 0,
            skipped: 0,
            rows_added: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: DocumentOutcome) {
        match &outcome.status {
            DocumentStatus::Processed { rows } => {
                self.processed += 1;
                self.rows_added += rows;
            }
            DocumentStatus::Empty | DocumentStatus::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Local::now();
        self
    }

    pub fn status_label(&self) -> &'static str {
        status_label(self.processed)
    }
}

/// Counters of one mailbox -> staging run
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub workflow: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Attachments written to the staging area
    pub total_attachments: usize,
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub staged: Vec<String>,
}

impl StageSummary {
    pub fn start(workflow: impl Into<String>) -> Self {
        let now = Local::now();
        StageSummary {
            workflow: workflow.into(),
            started_at: now,
            finished_at: now,
            total_attachments: 0,
            processed: 0,
            failed: 0,
            skipped: 0,
            staged: Vec::new(),
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Local::now();
        self
    }

    pub fn status_label(&self) -> &'static str {
        status_label(self.processed)
    }
}

fn status_label(processed: usize) -> &'static str {
    if processed > 0 { "Success" } else { "No New Files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_counters() {
        let mut summary = RunSummary::start("PO");
        summary.record(DocumentOutcome {
            source_file: "a.xlsx".to_string(),
            status: DocumentStatus::Processed { rows: 4 },
            warnings: Vec::new(),
        });
        summary.record(DocumentOutcome {
            source_file: "b.xlsx".to_string(),
            status: DocumentStatus::Empty,
            warnings: vec!["No valid line items found in b.xlsx".to_string()],
        });
        summary.record(DocumentOutcome::failed("c.xlsx", "missing required columns"));

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.rows_added, 4);
        assert_eq!(summary.status_label(), "Success");
    }

    #[test]
    fn test_nothing_processed_reports_no_new_files() {
        assert_eq!(RunSummary::start("PO").status_label(), "No New Files");
        assert_eq!(StageSummary::start("Mail").status_label(), "No New Files");
    }
}
