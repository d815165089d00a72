//! `orderflow stage`

mod handler;

pub use handler::handle_stage_command;

use std::path::PathBuf;

use clap::Args;

use crate::config::Profile;

#[derive(Args, Debug)]
pub struct StageCommand {
    /// Use a built-in profile instead of the config file
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Directory holding the raw attachments
    #[arg(long, value_name = "DIR")]
    pub from: Option<PathBuf>,

    /// Inbox directory to stage into
    #[arg(long, value_name = "DIR")]
    pub to: Option<PathBuf>,

    /// Case-insensitive substring an attachment name must contain
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Only consider attachments received within this many days
    #[arg(long, value_name = "DAYS")]
    pub days_back: Option<u32>,

    /// CSV file receiving one row per run
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
