//! `orderflow run`

mod handler;

pub use handler::handle_run_command;

use std::path::PathBuf;

use clap::Args;

use crate::config::Profile;

#[derive(Args, Debug)]
pub struct RunCommand {
    /// Use a built-in profile instead of the config file
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Directory to scan for workbooks
    #[arg(long, value_name = "DIR")]
    pub inbox: Option<PathBuf>,

    /// CSV ledger to append to
    #[arg(long, value_name = "FILE")]
    pub sink: Option<PathBuf>,

    /// CSV file receiving one row per run
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Reprocess documents already present in the ledger
    #[arg(long)]
    pub no_skip_existing: bool,

    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Only consider files modified within this many days
    #[arg(long, value_name = "DAYS")]
    pub days_back: Option<u32>,

    /// Print every document outcome
    #[arg(long)]
    pub details: bool,
}
