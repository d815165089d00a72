//! Excel decoding for incoming documents and export of extracted records

mod reader;
mod writer;

pub use reader::{WorkbookError, cell_to_string, read_table};
pub use writer::write_records_excel;
