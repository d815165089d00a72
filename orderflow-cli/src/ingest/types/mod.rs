//! Core types for spreadsheet ingestion

mod config;
mod document;
mod record;
mod table;

pub use config::*;
pub use document::*;
pub use record::*;
pub use table::*;
