//! Collaborator seams of the workflows
//!
//! The runners only talk to these traits; `local` provides folder and CSV
//! backed implementations.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::ingest::types::DocumentRef;

/// Where workbooks are discovered and downloaded from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Documents currently available, newest first
    async fn list(&self) -> Result<Vec<DocumentRef>>;

    async fn fetch(&self, doc: &DocumentRef) -> Result<Vec<u8>>;
}

/// Outcome of `RecordSink::ensure_headers`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSetup {
    Created,
    Updated,
    Unchanged,
}

/// Tabular destination; the first row is the header
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Non-empty values of the named header column
    ///
    /// An absent sink or column yields an empty set.
    async fn existing_identifiers(&self, column: &str) -> Result<HashSet<String>>;

    /// Make the header row equal `headers`
    async fn ensure_headers(&self, headers: &[String]) -> Result<HeaderSetup>;

    /// Append rows as one batch, returns the number written
    async fn append(&self, rows: &[Vec<String>]) -> Result<usize>;
}

/// A listed mail attachment (or any named blob waiting to be staged)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Source-specific handle used by `download`
    pub id: String,
    pub name: String,
    /// Receipt time of the carrying message
    pub received: Option<DateTime<Local>>,
}

/// Attachments are listed without their content; bytes are only
/// downloaded for the ones that get staged
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    async fn attachments(&self) -> Result<Vec<Attachment>>;

    async fn download(&self, attachment: &Attachment) -> Result<Vec<u8>>;
}

/// Folder the staged attachments land in
#[async_trait]
pub trait StagingArea: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool>;

    async fn store(&self, name: &str, bytes: &[u8]) -> Result<()>;
}
