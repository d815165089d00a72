//! `orderflow extract`

mod handler;

pub use handler::handle_extract_command;

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Workbook to extract
    pub file: PathBuf,

    /// Use a built-in profile instead of the config file
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also write the records to this .xlsx file
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}
