//! `orderflow config`

mod handler;

pub use handler::handle_config_command;

use clap::Subcommand;

use crate::config::Profile;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show {
        #[arg(long, value_enum)]
        profile: Option<Profile>,
    },
    /// Print the default config file location
    Path,
    /// Write a built-in profile to the config file
    Init {
        #[arg(long, value_enum, default_value_t = Profile::Po)]
        profile: Profile,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
