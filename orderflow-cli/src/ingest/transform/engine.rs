//! Extraction engine - turns one workbook into output records

use chrono::NaiveDate;

use crate::ingest::error::ExtractError;
use crate::ingest::excel::read_table;
use crate::ingest::filename::extract_filename_meta;
use crate::ingest::types::{ExtractStats, Extraction, IngestConfig, SourceDocument, Table};

use super::aggregate::{Grouping, aggregate};
use super::build::{DocumentMeta, build_records};
use super::columns::{ResolvedColumns, check_required};
use super::validate::valid_rows;

/// Extract records from raw workbook bytes
///
/// Pure function of its inputs; `today` is only used when the filename
/// carries no date.
pub fn extract_document(
    bytes: &[u8],
    filename: &str,
    config: &IngestConfig,
    today: NaiveDate,
) -> Result<Extraction, ExtractError> {
    let table = read_table(bytes).map_err(|e| ExtractError::Workbook {
        file: filename.to_string(),
        message: e.to_string(),
    })?;

    log::info!("Read {} rows from {}", table.len(), filename);
    log::debug!("Columns found: {:?}", table.headers());

    extract_table(&table, filename, config, today)
}

/// Extract a fetched document; it is consumed and its bytes dropped afterwards
pub fn extract_source(
    document: SourceDocument,
    config: &IngestConfig,
    today: NaiveDate,
) -> Result<Extraction, ExtractError> {
    log::debug!(
        "Extracting {} ({} bytes, fetched {})",
        document.filename,
        document.bytes.len(),
        document.discovered_at.format("%Y-%m-%d %H:%M:%S")
    );
    extract_document(&document.bytes, &document.filename, config, today)
}

/// Same as `extract_document`, for an already decoded table
pub fn extract_table(
    table: &Table,
    filename: &str,
    config: &IngestConfig,
    today: NaiveDate,
) -> Result<Extraction, ExtractError> {
    let mut stats = ExtractStats {
        rows_read: table.len(),
        ..Default::default()
    };

    let meta = extract_filename_meta(filename, today);
    if let Some(warning) = &meta.warning {
        stats.warn(warning.clone());
    }

    check_required(table, config).map_err(|missing| {
        let err = ExtractError::MissingColumns {
            file: filename.to_string(),
            missing,
        };
        log::error!("{}", err);
        err
    })?;

    let columns = ResolvedColumns::resolve_all(table, &config.columns);
    let rows = valid_rows(table.rows(), &columns, &config.primary_key_field);
    stats.rows_valid = rows.len();

    if rows.is_empty() {
        stats.warn(format!("No valid line items found in {}", filename));
        return Ok(Extraction {
            source_file: filename.to_string(),
            records: Vec::new(),
            stats,
        });
    }

    let grouping = Grouping::from_config(config, &columns, filename);
    let aggregates = aggregate(&rows, &columns, config, grouping);
    stats.groups = aggregates.len();
    stats.unparsable_numbers = aggregates.unparsable_numbers();
    if stats.unparsable_numbers > 0 {
        stats.warn(format!(
            "{} quantity/amount cell(s) in {} could not be parsed or summed and were counted as 0",
            stats.unparsable_numbers, filename
        ));
    }

    for group in aggregates.groups() {
        log::info!(
            "Totals [{}]: items={}, qty={}, amount={}",
            group.key,
            group.count,
            group.sum_quantity,
            group.sum_amount
        );
    }

    let records = build_records(
        &rows,
        &columns,
        config,
        grouping,
        &aggregates,
        DocumentMeta {
            identifier: &meta.identifier,
            date: &meta.date,
            source_file: filename,
        },
    );

    log::info!("Extracted {} rows from {}", records.len(), filename);

    Ok(Extraction {
        source_file: filename.to_string(),
        records,
        stats,
    })
}
