//! Shared fixtures for ingest tests

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use crate::config::Profile;
use crate::ingest::types::IngestConfig;

pub fn po_config() -> IngestConfig {
    Profile::Po.ingest_config()
}

pub fn grn_config() -> IngestConfig {
    Profile::Grn.ingest_config()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Single-sheet xlsx; numeric-looking cells are written as numbers, empty cells skipped
pub fn workbook_bytes(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let (row_idx, col_idx) = ((r + 1) as u32, col as u16);
            match cell.parse::<f64>() {
                Ok(n) if n.is_finite() => sheet.write_number(row_idx, col_idx, n).unwrap(),
                _ => sheet.write_string(row_idx, col_idx, *cell).unwrap(),
            };
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Fresh directory under the system temp dir, removed when dropped
pub fn temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("orderflow-test-")
        .tempdir()
        .expect("create temp dir")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let dir = temp_dir();
        let path = dir.path().to_path_buf();
        std::fs::write(path.join("ledger.csv"), b"a,b\n").unwrap();
        assert!(path.is_dir());

        drop(dir);
        assert!(!path.exists());
    }
}
