//! Run command handler

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use colored::*;

use super::RunCommand;
use crate::config::AppConfig;
use crate::workflow::local::{CsvSink, FolderSource};
use crate::workflow::{
    DocumentStatus, RunOptions, RunSummary, WorkflowLogEntry, append_workflow_log, run_batch,
};

pub async fn handle_run_command(args: RunCommand, config_path: Option<&Path>) -> Result<()> {
    let mut config = AppConfig::resolve(config_path, args.profile)?;

    // Command line overrides
    if let Some(inbox) = args.inbox {
        config.run.inbox = inbox;
    }
    if let Some(sink) = args.sink {
        config.run.sink = sink;
    }
    if let Some(log_file) = args.log_file {
        config.workflow_log.path = Some(log_file);
    }
    if args.no_skip_existing {
        config.run.skip_existing = false;
    }
    if args.max_files.is_some() {
        config.run.max_files = args.max_files;
    }
    if args.days_back.is_some() {
        config.run.days_back = args.days_back;
    }

    println!(
        "Processing {} documents from {} into {}",
        config.ingest.name.bright_green().bold(),
        config.run.inbox.display().to_string().cyan(),
        config.run.sink.display().to_string().cyan()
    );

    let source = FolderSource::new(&config.run.inbox).with_days_back(config.run.days_back);
    let sink = CsvSink::new(&config.run.sink);
    let options = RunOptions {
        skip_existing: config.run.skip_existing,
        name_filter: config.run.name_filter.clone(),
        max_files: config.run.max_files,
        concurrency: config.run.concurrency,
        today: Local::now().date_naive(),
    };

    let summary = run_batch(&source, &sink, &config.ingest, &options).await?;
    print_summary(&summary, args.details);

    if let Some(path) = &config.workflow_log.path {
        let entry = WorkflowLogEntry::from_summary(&summary);
        if let Err(e) = append_workflow_log(&CsvSink::new(path), &entry).await {
            log::warn!("Failed to log workflow: {:#}", e);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary, details: bool) {
    println!();
    for outcome in &summary.outcomes {
        let failed = matches!(outcome.status, DocumentStatus::Failed { .. });
        if !details && !failed {
            continue;
        }
        match &outcome.status {
            DocumentStatus::Processed { rows } => {
                println!("  {} {} ({} rows)", "✓".green(), outcome.source_file, rows)
            }
            DocumentStatus::Empty => {
                println!("  {} {} (no valid line items)", "-".yellow(), outcome.source_file)
            }
            DocumentStatus::Failed { reason } => {
                println!("  {} {}: {}", "✗".red(), outcome.source_file, reason.dimmed())
            }
        }
        if details {
            for warning in &outcome.warnings {
                println!("      {}", warning.yellow());
            }
        }
    }

    let status = if summary.processed > 0 {
        summary.status_label().green().bold()
    } else {
        summary.status_label().yellow().bold()
    };
    println!("{}", status);
    println!("  Total files:     {}", summary.total);
    println!("  Processed:       {}", summary.processed.to_string().green());
    println!("  Failed:          {}", colorize_failed(summary.failed));
    println!("  Skipped:         {}", summary.skipped);
    println!("  Rows added:      {}", summary.rows_added.to_string().bold());
}

fn colorize_failed(count: usize) -> ColoredString {
    if count > 0 {
        count.to_string().red()
    } else {
        count.to_string().normal()
    }
}
