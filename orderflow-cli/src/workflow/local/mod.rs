//! Filesystem implementations of the collaborator traits

mod csv_sink;
mod folder;

pub use csv_sink::CsvSink;
pub use folder::{FolderSource, FolderStaging};
