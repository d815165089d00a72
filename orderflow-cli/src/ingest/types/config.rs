//! Ingest configuration types
//!
//! An `IngestConfig` is built once per run (from a TOML file or a built-in
//! profile), validated, and then passed by reference into every stage of
//! the extraction pipeline. Nothing in the pipeline mutates it.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Logical field name -> physical spreadsheet header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        ColumnMapping(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, logical: impl Into<String>, header: impl Into<String>) -> Self {
        self.insert(logical, header);
        self
    }

    pub fn insert(&mut self, logical: impl Into<String>, header: impl Into<String>) {
        self.0.insert(logical.into(), header.into());
    }

    /// Physical header configured for a logical field
    pub fn header(&self, logical: &str) -> Option<&str> {
        self.0.get(logical).map(|h| h.as_str())
    }

    pub fn contains(&self, logical: &str) -> bool {
        self.0.contains_key(logical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How valid rows are grouped before totals are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// The whole document is one order
    #[default]
    Single,
    /// One total per distinct value of the group-key column
    Keyed,
}

impl AggregationMode {
    pub fn label(&self) -> &'static str {
        match self {
            AggregationMode::Single => "single",
            AggregationMode::Keyed => "keyed",
        }
    }
}

/// Where an output column takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Copied from the row via the column mapping
    #[default]
    Row,
    /// Document identifier (filename id, or the row's group key in keyed mode)
    Identifier,
    /// Document date
    Date,
    /// Number of valid rows in the row's group
    Count,
    /// Sum of the quantity column over the row's group
    SumQuantity,
    /// Sum of the amount column over the row's group
    SumAmount,
    /// Name of the originating file
    SourceFile,
}

/// One column of the output schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputField {
    /// Stable field name used in records
    pub name: String,
    /// Header written to the sink
    pub header: String,
    #[serde(default)]
    pub source: FieldSource,
    /// Logical field to copy for `Row` sources (defaults to `name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl OutputField {
    /// Row-sourced field whose logical name equals its output name
    pub fn row(name: impl Into<String>, header: impl Into<String>) -> Self {
        OutputField {
            name: name.into(),
            header: header.into(),
            source: FieldSource::Row,
            field: None,
        }
    }

    pub fn derived(name: impl Into<String>, header: impl Into<String>, source: FieldSource) -> Self {
        OutputField {
            name: name.into(),
            header: header.into(),
            source,
            field: None,
        }
    }

    /// Logical field this column copies from, for row-sourced columns
    pub fn logical_field(&self) -> Option<&str> {
        match self.source {
            FieldSource::Row => Some(self.field.as_deref().unwrap_or(&self.name)),
            _ => None,
        }
    }
}

/// Immutable per-run configuration for the extraction pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Human-readable name (shows up in logs and the workflow log)
    pub name: String,
    /// Logical fields whose headers must be present in every document
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Logical field that identifies a line item; rows without it are dropped
    pub primary_key_field: String,
    #[serde(default)]
    pub mode: AggregationMode,
    /// Logical field used to partition rows in keyed mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key_field: Option<String>,
    pub quantity_field: String,
    pub amount_field: String,
    /// Logical field -> physical header
    pub columns: ColumnMapping,
    /// Ordered output schema
    pub output: Vec<OutputField>,
}

impl IngestConfig {
    /// Check internal consistency. Run once, before any document is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.is_empty() {
            return Err(ConfigError::EmptyOutputSchema);
        }

        let mut seen = HashSet::new();
        for field in &self.output {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateOutputField(field.name.clone()));
            }
        }

        if !self.output.iter().any(|f| f.source == FieldSource::SourceFile) {
            return Err(ConfigError::MissingSourceFileField);
        }

        let mut unmapped: Vec<String> = self
            .required_fields
            .iter()
            .chain(std::iter::once(&self.primary_key_field))
            .filter(|f| !self.columns.contains(f))
            .cloned()
            .collect();
        if self.mode == AggregationMode::Keyed {
            match &self.group_key_field {
                None => return Err(ConfigError::MissingGroupKey),
                Some(key) if !self.columns.contains(key) => unmapped.push(key.clone()),
                Some(_) => {}
            }
        }
        let mut reported = HashSet::new();
        unmapped.retain(|f| reported.insert(f.clone()));
        if !unmapped.is_empty() {
            return Err(ConfigError::UnmappedFields(unmapped));
        }

        Ok(())
    }

    /// Header of the output column carrying `source_file`
    pub fn source_file_header(&self) -> Option<&str> {
        self.output
            .iter()
            .find(|f| f.source == FieldSource::SourceFile)
            .map(|f| f.header.as_str())
    }

    /// Display headers in schema order
    pub fn headers(&self) -> Vec<String> {
        self.output.iter().map(|f| f.header.clone()).collect()
    }

    /// Group key field, only when keyed mode is active
    pub fn active_group_key(&self) -> Option<&str> {
        match self.mode {
            AggregationMode::Keyed => self.group_key_field.as_deref(),
            AggregationMode::Single => None,
        }
    }
}

/// Invalid configuration detected by `IngestConfig::validate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyOutputSchema,
    DuplicateOutputField(String),
    MissingSourceFileField,
    MissingGroupKey,
    /// Fields referenced by the config that have no column mapping
    UnmappedFields(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyOutputSchema => write!(f, "output schema has no fields"),
            ConfigError::DuplicateOutputField(name) => {
                write!(f, "output field '{}' is declared more than once", name)
            }
            ConfigError::MissingSourceFileField => {
                write!(f, "output schema must contain a source_file field")
            }
            ConfigError::MissingGroupKey => {
                write!(f, "keyed aggregation requires group_key_field")
            }
            ConfigError::UnmappedFields(fields) => {
                write!(f, "fields without a column mapping: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
