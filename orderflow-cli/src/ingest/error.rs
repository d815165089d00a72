//! Fatal-for-document errors

use super::transform::MissingColumn;

/// Error that aborts extraction of a single document
///
/// Soft conditions (no valid rows, unparsable numbers, filename misses) are
/// not errors; they are reported through `ExtractStats` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Bytes could not be decoded as a workbook
    Workbook { file: String, message: String },
    /// Required headers are absent from the sheet
    MissingColumns { file: String, missing: Vec<MissingColumn> },
}

impl ExtractError {
    pub fn file(&self) -> &str {
        match self {
            ExtractError::Workbook { file, .. } => file,
            ExtractError::MissingColumns { file, .. } => file,
        }
    }

    /// Physical headers that were missing, if that is the failure
    pub fn missing_headers(&self) -> Vec<&str> {
        match self {
            ExtractError::MissingColumns { missing, .. } => {
                missing.iter().filter_map(|m| m.header.as_deref()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Workbook { file, message } => {
                write!(f, "{}: unreadable workbook: {}", file, message)
            }
            ExtractError::MissingColumns { file, missing } => {
                let headers: Vec<String> = missing.iter().map(|m| m.to_string()).collect();
                write!(f, "{}: missing required columns: [{}]", file, headers.join(", "))
            }
        }
    }
}

impl std::error::Error for ExtractError {}
