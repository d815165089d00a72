//! Config command handler

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;

use super::ConfigCommands;
use crate::config::{AppConfig, default_config_path};

pub fn handle_config_command(command: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Show { profile } => {
            let config = AppConfig::resolve(config_path, profile)?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Path => {
            let path = target_path(config_path)?;
            let state = if path.exists() {
                "exists".green()
            } else {
                "not created".yellow()
            };
            println!("{} ({})", path.display(), state);
        }
        ConfigCommands::Init { profile, force } => {
            let path = target_path(config_path)?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::for_profile(profile).save(&path)?;
            println!(
                "Wrote '{}' profile to {}",
                profile.label().bright_green().bold(),
                path.display().to_string().cyan()
            );
        }
    }
    Ok(())
}

fn target_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path().context("Could not determine the config directory"),
    }
}
