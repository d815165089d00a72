//! Inbox -> sink batch runner
//!
//! Lists documents, drops the ones the sink already holds, transforms the
//! rest on the blocking pool and appends each document's rows as one batch.
//! A failing document is counted and logged, never fatal for the run.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};

use crate::ingest::dedup::ProcessedSet;
use crate::ingest::types::{DocumentRef, Extraction, IngestConfig, SourceDocument};
use crate::ingest::extract_source;

use super::summary::{DocumentOutcome, DocumentStatus, RunSummary};
use super::traits::{DocumentSource, RecordSink};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub skip_existing: bool,
    /// Substring a document name must contain
    pub name_filter: Option<String>,
    pub max_files: Option<usize>,
    /// Documents fetched and transformed at once
    pub concurrency: usize,
    /// Fallback date for file names without one
    pub today: NaiveDate,
}

impl RunOptions {
    pub fn new(today: NaiveDate) -> Self {
        RunOptions {
            skip_existing: true,
            name_filter: None,
            max_files: None,
            concurrency: 4,
            today,
        }
    }
}

enum Prepared {
    Extracted(Extraction),
    Failed(String),
}

/// Run one batch
///
/// Errors only for listing, the identifier snapshot and header setup;
/// everything per document ends up in the summary.
pub async fn run_batch(
    source: &dyn DocumentSource,
    sink: &dyn RecordSink,
    config: &IngestConfig,
    options: &RunOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary::start(&config.name);

    let processed = if options.skip_existing {
        snapshot(sink, config).await?
    } else {
        ProcessedSet::new()
    };

    let mut documents = source.list().await.context("Failed to list documents")?;
    if let Some(filter) = &options.name_filter {
        documents.retain(|doc| doc.name.contains(filter.as_str()));
    }
    summary.total = documents.len();
    log::info!("Found {} document(s)", summary.total);

    let outcome = processed.filter_new(documents);
    let mut candidates = outcome.candidates;
    summary.skipped = outcome.duplicates.len();
    if summary.skipped > 0 {
        log::warn!("Skipped {} already processed document(s)", summary.skipped);
    }

    if let Some(max) = options.max_files {
        if candidates.len() > max {
            candidates.truncate(max);
            log::info!("Limited to {} document(s)", max);
        }
    }

    if candidates.is_empty() {
        log::info!("No new documents to process");
        return Ok(summary.finish());
    }

    let headers = config.headers();
    let setup = sink
        .ensure_headers(&headers)
        .await
        .context("Failed to set up sink headers")?;
    log::debug!("Sink headers: {:?}", setup);

    let shared = Arc::new(config.clone());
    let today = options.today;
    let mut prepared = stream::iter(candidates.into_iter().map(|doc| {
        let config = Arc::clone(&shared);
        async move {
            let result = prepare(source, &doc, config, today).await;
            (doc, result)
        }
    }))
    .buffered(options.concurrency.max(1));

    while let Some((doc, result)) = prepared.next().await {
        let outcome = match result {
            Prepared::Failed(reason) => DocumentOutcome::failed(&doc.name, reason),
            Prepared::Extracted(extraction) => commit(sink, extraction).await,
        };
        match &outcome.status {
            DocumentStatus::Processed { rows } => {
                log::info!("Appended {} row(s) from {}", rows, outcome.source_file)
            }
            DocumentStatus::Empty => log::warn!("No rows appended for {}", outcome.source_file),
            DocumentStatus::Failed { reason } => {
                log::error!("Failed to process {}: {}", outcome.source_file, reason)
            }
        }
        summary.record(outcome);
    }

    let summary = summary.finish();
    log::info!(
        "Run complete: total={}, processed={}, failed={}, skipped={}, rows_added={}",
        summary.total,
        summary.processed,
        summary.failed,
        summary.skipped,
        summary.rows_added
    );
    Ok(summary)
}

async fn snapshot(sink: &dyn RecordSink, config: &IngestConfig) -> Result<ProcessedSet> {
    let Some(column) = config.source_file_header() else {
        return Ok(ProcessedSet::new());
    };
    let ids = sink
        .existing_identifiers(column)
        .await
        .context("Failed to read processed documents from sink")?;
    log::info!("Found {} already processed document(s)", ids.len());
    Ok(ProcessedSet::from(ids))
}

async fn prepare(
    source: &dyn DocumentSource,
    doc: &DocumentRef,
    config: Arc<IngestConfig>,
    today: NaiveDate,
) -> Prepared {
    let bytes = match source.fetch(doc).await {
        Ok(bytes) => bytes,
        Err(e) => return Prepared::Failed(format!("download failed: {:#}", e)),
    };

    let document = SourceDocument::new(doc.name.clone(), bytes);
    let task = tokio::task::spawn_blocking(move || extract_source(document, &config, today));

    match task.await {
        Ok(Ok(extraction)) => Prepared::Extracted(extraction),
        Ok(Err(e)) => Prepared::Failed(e.to_string()),
        Err(e) => Prepared::Failed(format!("transform task panicked: {}", e)),
    }
}

async fn commit(sink: &dyn RecordSink, extraction: Extraction) -> DocumentOutcome {
    let warnings = extraction.stats.warnings.clone();
    let status = if extraction.is_empty() {
        DocumentStatus::Empty
    } else {
        match sink.append(&extraction.rows()).await {
            Ok(rows) => DocumentStatus::Processed { rows },
            Err(e) => DocumentStatus::Failed {
                reason: format!("append failed: {:#}", e),
            },
        }
    };

    DocumentOutcome {
        source_file: extraction.source_file,
        status,
        warnings,
    }
}
