//! Directory-backed document source and staging area

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};

use crate::ingest::types::DocumentRef;
use crate::workflow::traits::{Attachment, AttachmentSource, DocumentSource, StagingArea};

const WORKBOOK_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Workbooks (or attachments) lying in one directory
#[derive(Debug, Clone)]
pub struct FolderSource {
    dir: PathBuf,
    days_back: Option<u32>,
}

struct Entry {
    path: PathBuf,
    name: String,
    modified: Option<DateTime<Utc>>,
}

impl FolderSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FolderSource {
            dir: dir.into(),
            days_back: None,
        }
    }

    /// Ignore files not modified within the last `days` days
    pub fn with_days_back(mut self, days: Option<u32>) -> Self {
        self.days_back = days;
        self
    }

    async fn scan(&self, workbooks_only: bool) -> Result<Vec<Entry>> {
        let cutoff = self
            .days_back
            .map(|days| Utc::now() - Duration::days(i64::from(days)));

        let mut reader = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", self.dir.display()))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                log::warn!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };
            if workbooks_only && !is_workbook(&path) {
                continue;
            }

            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
            if let (Some(cutoff), Some(modified)) = (cutoff, modified) {
                if modified < cutoff {
                    log::debug!("Skipping {} (modified {})", name, modified);
                    continue;
                }
            }

            entries.push(Entry {
                path,
                name,
                modified,
            });
        }

        // Newest first, name as tie-breaker
        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        Ok(entries)
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| WORKBOOK_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl DocumentSource for FolderSource {
    async fn list(&self) -> Result<Vec<DocumentRef>> {
        let entries = self.scan(true).await?;
        Ok(entries
            .into_iter()
            .map(|e| DocumentRef {
                id: e.path.to_string_lossy().into_owned(),
                name: e.name,
                modified: e.modified,
            })
            .collect())
    }

    async fn fetch(&self, doc: &DocumentRef) -> Result<Vec<u8>> {
        tokio::fs::read(&doc.id)
            .await
            .with_context(|| format!("Failed to read {}", doc.id))
    }
}

#[async_trait]
impl AttachmentSource for FolderSource {
    async fn attachments(&self) -> Result<Vec<Attachment>> {
        let attachments = self
            .scan(false)
            .await?
            .into_iter()
            .map(|entry| Attachment {
                id: entry.path.to_string_lossy().into_owned(),
                name: entry.name,
                received: entry.modified.map(|m| m.with_timezone(&Local)),
            })
            .collect();
        Ok(attachments)
    }

    async fn download(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        tokio::fs::read(&attachment.id)
            .await
            .with_context(|| format!("Failed to read {}", attachment.id))
    }
}

/// Staging area writing into a directory
#[derive(Debug, Clone)]
pub struct FolderStaging {
    dir: PathBuf,
}

impl FolderStaging {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FolderStaging { dir: dir.into() }
    }

    fn target(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            anyhow::bail!("Invalid staged file name: '{}'", name);
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl StagingArea for FolderStaging {
    async fn exists(&self, name: &str) -> Result<bool> {
        let path = self.target(name)?;
        tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))
    }

    async fn store(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.target(name)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testutil::temp_dir;
    use std::fs;
    use std::time::{Duration as StdDuration, SystemTime};

    #[tokio::test]
    async fn test_lists_only_workbooks() {
        let tmp = temp_dir();
        let dir = tmp.path();
        fs::write(dir.join("PO1_20260201_100000.xlsx"), b"x").unwrap();
        fs::write(dir.join("legacy.XLS"), b"x").unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.join("nested.xlsx")).unwrap();

        let mut names: Vec<_> = FolderSource::new(dir)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["PO1_20260201_100000.xlsx", "legacy.XLS"]);
    }

    #[tokio::test]
    async fn test_days_back_window() {
        let tmp = temp_dir();
        let dir = tmp.path();
        fs::write(dir.join("fresh.xlsx"), b"x").unwrap();
        let old = dir.join("old.xlsx");
        fs::write(&old, b"x").unwrap();
        let long_ago = SystemTime::now() - StdDuration::from_secs(30 * 24 * 3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(long_ago)
            .unwrap();

        let docs = FolderSource::new(dir).with_days_back(Some(7)).list().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "fresh.xlsx");

        let all = FolderSource::new(dir).list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_reads_bytes() {
        let tmp = temp_dir();
        let dir = tmp.path();
        fs::write(dir.join("a.xlsx"), b"payload").unwrap();
        let source = FolderSource::new(dir);
        let docs = source.list().await.unwrap();

        assert_eq!(source.fetch(&docs[0]).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_attachments_listed_then_downloaded() {
        let tmp = temp_dir();
        let dir = tmp.path();
        fs::write(dir.join("Consolidated-GRN-Report.xlsx"), b"grn").unwrap();
        fs::write(dir.join("notes.txt"), b"txt").unwrap();
        let source = FolderSource::new(dir);

        let mut listed = source.attachments().await.unwrap();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        let names: Vec<_> = listed.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Consolidated-GRN-Report.xlsx", "notes.txt"]);
        assert!(listed[0].received.is_some());

        assert_eq!(source.download(&listed[0]).await.unwrap(), b"grn");
        fs::remove_file(dir.join("notes.txt")).unwrap();
        assert!(source.download(&listed[1]).await.is_err());
    }

    #[tokio::test]
    async fn test_staging_roundtrip() {
        let tmp = temp_dir();
        let dir = tmp.path().join("staged");
        let area = FolderStaging::new(&dir);

        assert!(!area.exists("a.xlsx").await.unwrap());
        area.store("a.xlsx", b"data").await.unwrap();
        assert!(area.exists("a.xlsx").await.unwrap());
        assert_eq!(fs::read(dir.join("a.xlsx")).unwrap(), b"data");
        assert!(area.store("../escape.xlsx", b"x").await.is_err());
    }
}
