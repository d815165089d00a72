//! CSV file as record sink; row 1 is the header

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::workflow::traits::{HeaderSetup, RecordSink};

#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("CSV task panicked")?
}

/// All rows including the header; missing file reads as empty
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to parse {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[Vec<String>], append: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn existing_identifiers(&self, column: &str) -> Result<HashSet<String>> {
        let path = self.path.clone();
        let column = column.to_string();
        blocking(move || {
            let rows = read_rows(&path)?;
            let Some(header) = rows.first() else {
                return Ok(HashSet::new());
            };
            let Some(idx) = header.iter().position(|h| h.trim() == column) else {
                log::warn!("Column '{}' not found in {}", column, path.display());
                return Ok(HashSet::new());
            };

            Ok(rows
                .iter()
                .skip(1)
                .filter_map(|row| row.get(idx))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect())
        })
        .await
    }

    async fn ensure_headers(&self, headers: &[String]) -> Result<HeaderSetup> {
        let path = self.path.clone();
        let headers = headers.to_vec();
        blocking(move || {
            let mut rows = read_rows(&path)?;
            if rows.is_empty() {
                write_rows(&path, &[headers], false)?;
                log::info!("Created headers in {}", path.display());
                return Ok(HeaderSetup::Created);
            }
            if rows[0] == headers {
                return Ok(HeaderSetup::Unchanged);
            }

            rows[0] = headers;
            write_rows(&path, &rows, false)?;
            log::info!("Updated headers in {}", path.display());
            Ok(HeaderSetup::Updated)
        })
        .await
    }

    async fn append(&self, rows: &[Vec<String>]) -> Result<usize> {
        let path = self.path.clone();
        let rows = rows.to_vec();
        blocking(move || {
            write_rows(&path, &rows, true)?;
            Ok(rows.len())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testutil::temp_dir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_header_setup_is_idempotent() {
        let dir = temp_dir();
        let sink = CsvSink::new(dir.path().join("out").join("ledger.csv"));
        let headers = strings(&["PO Number", "source_file"]);

        assert_eq!(sink.ensure_headers(&headers).await.unwrap(), HeaderSetup::Created);
        assert_eq!(sink.ensure_headers(&headers).await.unwrap(), HeaderSetup::Unchanged);

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "PO Number,source_file\n");
    }

    #[tokio::test]
    async fn test_changed_headers_rewrite_first_row_only() {
        let dir = temp_dir();
        let sink = CsvSink::new(dir.path().join("ledger.csv"));
        sink.ensure_headers(&strings(&["a", "b"])).await.unwrap();
        sink.append(&[strings(&["1", "x.xlsx"])]).await.unwrap();

        let setup = sink.ensure_headers(&strings(&["A", "source_file"])).await.unwrap();

        assert_eq!(setup, HeaderSetup::Updated);
        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "A,source_file\n1,x.xlsx\n");
    }

    #[tokio::test]
    async fn test_existing_identifiers() {
        let dir = temp_dir();
        let sink = CsvSink::new(dir.path().join("ledger.csv"));
        assert!(sink.existing_identifiers("source_file").await.unwrap().is_empty());

        sink.ensure_headers(&strings(&["id", "source_file"])).await.unwrap();
        sink.append(&[
            strings(&["1", "f1.xlsx"]),
            strings(&["2", "f1.xlsx"]),
            strings(&["3", ""]),
            strings(&["4", "f2.xlsx"]),
        ])
        .await
        .unwrap();

        let ids = sink.existing_identifiers("source_file").await.unwrap();
        assert_eq!(ids, HashSet::from(["f1.xlsx".to_string(), "f2.xlsx".to_string()]));
        assert!(sink.existing_identifiers("missing").await.unwrap().is_empty());
    }
}
