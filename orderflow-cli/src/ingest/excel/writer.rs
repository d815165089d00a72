//! Write extracted records to an Excel file

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use crate::ingest::types::{IngestConfig, OutputRecord};

/// Write records under the configured display headers
pub fn write_records_excel(config: &IngestConfig, records: &[OutputRecord], path: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name(sheet_name(&config.name))?;

    for (col, header) in config.headers().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, (_, value)) in record.fields().iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row, col as u16, value)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path))?;

    Ok(())
}

/// Excel caps sheet names at 31 chars and forbids a few characters
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "records".to_string()
    } else {
        cleaned
    }
}
