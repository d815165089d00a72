//! Output records and per-document extraction results

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Flat record in output-schema order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputRecord {
    fields: Vec<(String, String)>,
}

impl OutputRecord {
    pub fn new() -> Self {
        OutputRecord { fields: Vec::new() }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Value of a field by output name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Values only, ready to append as a sheet row
    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Counters and diagnostics gathered while extracting one document
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExtractStats {
    /// Non-blank data rows in the sheet
    pub rows_read: usize,
    /// Rows that passed the primary-key check
    pub rows_valid: usize,
    /// Number of aggregate groups
    pub groups: usize,
    /// Non-blank quantity/amount cells that could not be parsed and counted as 0
    pub unparsable_numbers: usize,
    pub warnings: Vec<String>,
}

impl ExtractStats {
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Successful (possibly empty) result of extracting one document
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Extraction {
    pub source_file: String,
    pub records: Vec<OutputRecord>,
    pub stats: ExtractStats,
}

impl Extraction {
    /// True when no valid rows were found
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records as sheet rows
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(|r| r.values()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_field_order_in_json() {
        let mut record = OutputRecord::new();
        record.push("zeta", "1");
        record.push("alpha", "2");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);
        assert_eq!(record.get("alpha"), Some("2"));
        assert_eq!(record.values(), vec!["1", "2"]);
    }
}
