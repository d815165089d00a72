//! Logical field -> column index resolution
//!
//! Headers are resolved once per document; rows are then read by index.

use std::collections::HashMap;

use crate::ingest::types::{ColumnMapping, IngestConfig, Row, Table};

/// A logical field whose column could not be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub field: String,
    /// Configured header, `None` when the field has no mapping at all
    pub header: Option<String>,
}

impl std::fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.header {
            Some(header) => write!(f, "'{}'", header),
            None => write!(f, "<{} has no column mapping>", self.field),
        }
    }
}

/// Resolve one logical field against the parsed headers
pub fn resolve(table: &Table, mapping: &ColumnMapping, field: &str) -> Result<usize, MissingColumn> {
    let header = mapping.header(field).ok_or_else(|| MissingColumn {
        field: field.to_string(),
        header: None,
    })?;

    table.column_index(header).ok_or_else(|| MissingColumn {
        field: field.to_string(),
        header: Some(header.to_string()),
    })
}

/// Every missing required field, in configuration order
///
/// Required fields without a mapping are skipped here; `IngestConfig::validate`
/// rejects those up front.
pub fn check_required(table: &Table, config: &IngestConfig) -> Result<(), Vec<MissingColumn>> {
    let missing: Vec<MissingColumn> = config
        .required_fields
        .iter()
        .filter(|field| config.columns.contains(field))
        .filter_map(|field| resolve(table, &config.columns, field).err())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Column indices for every mapped field present in this document
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumns {
    indices: HashMap<String, usize>,
}

impl ResolvedColumns {
    pub fn resolve_all(table: &Table, mapping: &ColumnMapping) -> Self {
        let indices = mapping
            .iter()
            .filter_map(|(field, _)| {
                resolve(table, mapping, field)
                    .ok()
                    .map(|idx| (field.to_string(), idx))
            })
            .collect();
        ResolvedColumns { indices }
    }

    pub fn index(&self, field: &str) -> Option<usize> {
        self.indices.get(field).copied()
    }

    /// Raw cell for a logical field; `None` if unmapped or absent in this sheet
    pub fn value<'r>(&self, row: &'r Row, field: &str) -> Option<&'r str> {
        self.index(field).map(|idx| row.get(idx))
    }
}
