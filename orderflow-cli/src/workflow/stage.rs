//! Mailbox -> staging folder
//!
//! Matching attachments are renamed to `<stem>_YYYYMMDD_HHMMSS.<ext>` using
//! the message receipt time, so every report gets a distinct, dated name
//! the filename extractor understands.

use anyhow::Result;
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use super::summary::StageSummary;
use super::traits::{AttachmentSource, StagingArea};

static TIMESTAMP_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_\d{8}_\d{6}$").expect("valid regex"));

#[derive(Debug, Clone)]
pub struct StageOptions {
    pub workflow: String,
    /// Case-insensitive substring; empty matches everything
    pub filter: String,
}

impl StageOptions {
    pub fn new(filter: impl Into<String>) -> Self {
        StageOptions {
            workflow: "Mail to Inbox".to_string(),
            filter: filter.into(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.filter.is_empty() || name.to_lowercase().contains(&self.filter.to_lowercase())
    }
}

/// Name under which an attachment is staged
pub fn staged_name(original: &str, received: DateTime<Local>) -> String {
    let (stem, ext) = match original.rfind('.') {
        Some(idx) if idx > 0 => original.split_at(idx),
        _ => (original, ""),
    };
    if TIMESTAMP_SUFFIX.is_match(stem) {
        return original.to_string();
    }
    format!("{}_{}{}", stem, received.format("%Y%m%d_%H%M%S"), ext)
}

/// Copy matching attachments into the staging area
///
/// Only attachments that match the filter and are not staged yet are
/// downloaded. Errors only when the attachment listing fails.
pub async fn stage_attachments(
    source: &dyn AttachmentSource,
    area: &dyn StagingArea,
    options: &StageOptions,
) -> Result<StageSummary> {
    let mut summary = StageSummary::start(&options.workflow);
    let attachments = source.attachments().await?;

    let matching: Vec<_> = attachments
        .into_iter()
        .filter(|a| options.matches(&a.name))
        .collect();
    log::info!("Found {} matching attachment(s)", matching.len());

    for attachment in matching {
        let name = staged_name(&attachment.name, attachment.received.unwrap_or_else(Local::now));

        match area.exists(&name).await {
            Ok(true) => {
                log::info!("File already exists: {}", name);
                summary.skipped += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to check {}: {:#}", name, e);
                summary.failed += 1;
                continue;
            }
        }

        let bytes = match source.download(&attachment).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to download {}: {:#}", attachment.name, e);
                summary.failed += 1;
                continue;
            }
        };

        match area.store(&name, &bytes).await {
            Ok(()) => {
                log::info!("Staged {}", name);
                summary.processed += 1;
                summary.total_attachments += 1;
                summary.staged.push(name);
            }
            Err(e) => {
                log::error!("Failed to stage {}: {:#}", name, e);
                summary.failed += 1;
            }
        }
    }

    let summary = summary.finish();
    log::info!(
        "Staging complete. Processed: {}, Failed: {}, Skipped: {}",
        summary.processed,
        summary.failed,
        summary.skipped
    );
    Ok(summary)
}
