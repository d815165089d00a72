//! Idempotency gate keyed on `source_file`
//!
//! The snapshot of processed identifiers must be read from the sink before
//! `filter_new` runs. Two runs against the same sink that overlap between
//! snapshot and append can both pass the same document; callers have to
//! serialize runs (or the sink has to enforce uniqueness).

use std::collections::HashSet;

use super::types::SourceIdentity;

/// Identifiers already present in the sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSet {
    ids: HashSet<String>,
}

/// Result of running candidates through the gate
#[derive(Debug, Clone)]
pub struct DedupOutcome<T> {
    /// New documents, discovery order preserved
    pub candidates: Vec<T>,
    /// Documents dropped because their identifier was already recorded
    pub duplicates: Vec<T>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record an identifier after a successful append
    pub fn insert(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Split `discovered` into new and already-recorded documents
    ///
    /// A name repeated within the batch is kept once (first occurrence).
    pub fn filter_new<T: SourceIdentity>(&self, discovered: Vec<T>) -> DedupOutcome<T> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();
        let mut duplicates = Vec::new();

        for doc in discovered {
            let id = doc.source_id();
            if self.ids.contains(id) || !seen.insert(id.to_string()) {
                log::debug!("Skipping already processed document: {}", id);
                duplicates.push(doc);
            } else {
                candidates.push(doc);
            }
        }

        DedupOutcome {
            candidates,
            duplicates,
        }
    }
}

impl FromIterator<String> for ProcessedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ProcessedSet {
            ids: iter.into_iter().collect(),
        }
    }
}

impl From<HashSet<String>> for ProcessedSet {
    fn from(ids: HashSet<String>) -> Self {
        ProcessedSet { ids }
    }
}
