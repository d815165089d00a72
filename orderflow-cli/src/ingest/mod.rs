//! Spreadsheet ingestion core
//!
//! Turns purchase-order and goods-receipt workbooks into flat records:
//! filename metadata, column mapping, row validation, aggregation and
//! record assembly, plus the `source_file` idempotency gate.

pub mod dedup;
pub mod error;
pub mod excel;
pub mod filename;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use dedup::{DedupOutcome, ProcessedSet};
pub use error::ExtractError;
pub use filename::{FilenameMeta, MetaSource, extract_filename_meta};
pub use transform::{extract_document, extract_source, extract_table};
pub use types::*;
