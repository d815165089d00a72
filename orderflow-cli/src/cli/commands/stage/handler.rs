//! Stage command handler

use std::path::Path;

use anyhow::Result;
use colored::*;

use super::StageCommand;
use crate::config::AppConfig;
use crate::workflow::local::{CsvSink, FolderSource, FolderStaging};
use crate::workflow::{StageOptions, WorkflowLogEntry, append_workflow_log, stage_attachments};

pub async fn handle_stage_command(args: StageCommand, config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::resolve(config_path, args.profile)?;

    let from = args.from.unwrap_or(config.stage.mailbox);
    let to = args.to.unwrap_or(config.run.inbox);
    let filter = args.filter.unwrap_or(config.stage.attachment_filter);
    let log_path = args.log_file.or(config.workflow_log.path);

    if !from.is_dir() {
        anyhow::bail!("Attachment directory does not exist: {}", from.display());
    }

    println!(
        "Staging attachments matching '{}' from {} to {}",
        filter.cyan(),
        from.display().to_string().cyan(),
        to.display().to_string().cyan()
    );

    let source = FolderSource::new(&from).with_days_back(args.days_back);
    let area = FolderStaging::new(&to);
    let summary = stage_attachments(&source, &area, &StageOptions::new(filter)).await?;

    for name in &summary.staged {
        println!("  {} {}", "✓".green(), name);
    }
    println!();
    println!("{}", summary.status_label().bold());
    println!("  Staged:   {}", summary.processed.to_string().green());
    println!("  Skipped:  {}", summary.skipped);
    if summary.failed > 0 {
        println!("  Failed:   {}", summary.failed.to_string().red());
    } else {
        println!("  Failed:   0");
    }

    if let Some(path) = log_path {
        let entry = WorkflowLogEntry::from_stage_summary(&summary);
        if let Err(e) = append_workflow_log(&CsvSink::new(path), &entry).await {
            log::warn!("Failed to log workflow: {:#}", e);
        }
    }

    Ok(())
}
