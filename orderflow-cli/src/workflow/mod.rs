//! Workflows around the ingest core
//!
//! `stage`: mailbox attachments -> inbox folder.
//! `batch`: inbox workbooks -> record sink, deduplicated on `source_file`.
//! Each run can be appended to a workflow log.

pub mod batch;
pub mod local;
pub mod stage;
pub mod summary;
pub mod traits;
pub mod workflow_log;

pub use batch::{RunOptions, run_batch};
pub use stage::{StageOptions, stage_attachments};
pub use summary::{DocumentOutcome, DocumentStatus, RunSummary, StageSummary};
pub use traits::{Attachment, AttachmentSource, DocumentSource, HeaderSetup, RecordSink, StagingArea};
pub use workflow_log::{WorkflowLogEntry, append_workflow_log};
