//! Row-level pipeline: column mapping, validation, aggregation, record assembly

mod aggregate;
mod build;
mod columns;
mod engine;
mod numeric;
mod validate;

pub use aggregate::{AggregateGroup, Aggregates, Grouping, aggregate};
pub use build::{DocumentMeta, build_records};
pub use columns::{MissingColumn, ResolvedColumns, check_required, resolve};
pub use engine::{extract_document, extract_source, extract_table};
pub use numeric::{NumericCell, format_decimal, parse_number};
pub use validate::{is_present, valid_rows};
