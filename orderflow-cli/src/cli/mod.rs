//! Command line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::extract::ExtractCommand;
use commands::run::RunCommand;
use commands::stage::StageCommand;

#[derive(Parser, Debug)]
#[command(
    name = "orderflow",
    version,
    about = "Turn purchase-order and goods-receipt spreadsheets into ledger rows"
)]
pub struct Cli {
    /// Config file (defaults to <config dir>/orderflow/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process new workbooks from the inbox into the ledger
    Run(RunCommand),
    /// Copy matching mailbox attachments into the inbox
    Stage(StageCommand),
    /// Extract one workbook and print its records
    Extract(ExtractCommand),
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => commands::run::handle_run_command(args, config_path).await,
        Commands::Stage(args) => commands::stage::handle_stage_command(args, config_path).await,
        Commands::Extract(args) => commands::extract::handle_extract_command(args, config_path).await,
        Commands::Config { command } => commands::config::handle_config_command(command, config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "orderflow",
            "run",
            "--profile",
            "grn",
            "--inbox",
            "reports",
            "--no-skip-existing",
            "--max-files",
            "10",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.profile, Some(Profile::Grn));
        assert_eq!(args.inbox, Some(PathBuf::from("reports")));
        assert!(args.no_skip_existing);
        assert_eq!(args.max_files, Some(10));
    }

    #[test]
    fn test_parse_stage_profile() {
        let cli = Cli::try_parse_from(["orderflow", "stage", "--profile", "grn", "--to", "inbox"])
            .unwrap();

        let Commands::Stage(args) = cli.command else {
            panic!("expected stage command");
        };
        assert_eq!(args.profile, Some(Profile::Grn));
        assert_eq!(args.to, Some(PathBuf::from("inbox")));
        assert_eq!(args.filter, None);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["orderflow", "extract", "po.xlsx", "--format", "csv", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Extract(_)));
    }
}
