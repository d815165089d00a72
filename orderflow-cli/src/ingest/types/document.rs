//! Discovered documents

use chrono::{DateTime, Utc};

/// Anything that carries the `source_file` idempotency key
pub trait SourceIdentity {
    fn source_id(&self) -> &str;
}

/// A document as listed by a source, before its bytes are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Source-specific handle (file path, drive id, ...)
    pub id: String,
    /// File name; becomes `source_file`
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        DocumentRef {
            id: id.into(),
            name: name.into(),
            modified: None,
        }
    }
}

impl SourceIdentity for DocumentRef {
    fn source_id(&self) -> &str {
        &self.name
    }
}

/// Fetched document, consumed once by the extractor
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub discovered_at: DateTime<Utc>,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceDocument {
            filename: filename.into(),
            bytes,
            discovered_at: Utc::now(),
        }
    }
}

impl SourceIdentity for SourceDocument {
    fn source_id(&self) -> &str {
        &self.filename
    }
}
