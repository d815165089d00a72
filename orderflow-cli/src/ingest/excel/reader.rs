//! Decode workbook bytes into a `Table`

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::ingest::types::{Row, Table};

/// Workbook could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookError(pub String);

impl std::fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for WorkbookError {}

/// Read the first worksheet of an xlsx/xls/ods payload
///
/// Row 1 is the header. Completely blank data rows are dropped; every other
/// cell is rendered to a string so downstream stages never see typed cells.
pub fn read_table(bytes: &[u8]) -> Result<Table, WorkbookError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| WorkbookError(format!("Failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| WorkbookError("Workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| WorkbookError(format!("Failed to read sheet {}: {}", sheet_name, e)))?;

    // calamine ranges start at the first used cell
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| cell_to_string(c).trim().to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let data: Vec<Row> = rows
        .enumerate()
        .map(|(idx, cells)| {
            // header is sheet row first_row + 1 (1-based)
            let number = first_row + idx + 2;
            Row::new(number, cells.iter().map(cell_to_string).collect())
        })
        .filter(|row| !row.is_blank())
        .collect();

    log::debug!(
        "Read sheet '{}': {} columns, {} non-blank rows",
        sheet_name,
        headers.len(),
        data.len()
    );

    Ok(Table::new(headers, data))
}

/// Render a cell the way it would read in the sheet
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers (item codes, quantities) lose the trailing .0
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) if naive.time() == chrono::NaiveTime::MIN => {
                naive.format("%Y-%m-%d").to_string()
            }
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
