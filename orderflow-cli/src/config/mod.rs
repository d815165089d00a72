//! Application configuration
//!
//! Loaded once per command from `--config` or the platform config directory
//! and handed on as an immutable value. Without a config file the built-in
//! `po` profile is used.

mod profiles;

pub use profiles::Profile;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ingest::types::IngestConfig;

/// Settings for the inbox -> ledger workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Directory scanned for workbooks
    pub inbox: PathBuf,
    /// CSV ledger receiving records
    pub sink: PathBuf,
    /// Only consider files modified within this many days
    pub days_back: Option<u32>,
    pub max_files: Option<usize>,
    /// Only process files whose name contains this text
    pub name_filter: Option<String>,
    pub skip_existing: bool,
    /// Documents transformed in parallel
    pub concurrency: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            inbox: PathBuf::from("inbox"),
            sink: PathBuf::from("ledger.csv"),
            days_back: Some(7),
            max_files: Some(500),
            name_filter: None,
            skip_existing: true,
            concurrency: 4,
        }
    }
}

/// Settings for the mailbox -> inbox staging workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSettings {
    /// Directory holding raw attachments
    pub mailbox: PathBuf,
    /// Case-insensitive substring an attachment name must contain
    pub attachment_filter: String,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            mailbox: PathBuf::from("mailbox"),
            attachment_filter: ".xlsx".to_string(),
        }
    }
}

/// Where workflow run rows are appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowLogSettings {
    pub path: Option<PathBuf>,
}

impl Default for WorkflowLogSettings {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("workflow_log.csv")),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub stage: StageSettings,
    #[serde(default)]
    pub workflow_log: WorkflowLogSettings,
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Defaults for a built-in profile
    pub fn for_profile(profile: Profile) -> Self {
        let mut run = RunSettings::default();
        let mut stage = StageSettings::default();
        if let Some(filter) = profile.name_filter() {
            run.name_filter = Some(filter.to_string());
            stage.attachment_filter = filter.to_string();
        }
        if profile == Profile::Grn {
            run.days_back = Some(25);
        }

        AppConfig {
            run,
            stage,
            workflow_log: WorkflowLogSettings::default(),
            ingest: profile.ingest_config(),
        }
    }

    /// Parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.ingest
            .validate()
            .with_context(|| format!("Ingest config '{}' is invalid", self.ingest.name))?;
        if self.run.concurrency == 0 {
            anyhow::bail!("run.concurrency must be at least 1");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Pick the config for this invocation
    ///
    /// Priority: explicit profile, explicit path, default path, built-in `po`.
    pub fn resolve(path: Option<&Path>, profile: Option<Profile>) -> Result<Self> {
        if let Some(profile) = profile {
            log::debug!("Using built-in profile '{}'", profile.label());
            return Ok(Self::for_profile(profile));
        }

        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => {
                log::info!("No config file found, using built-in 'po' profile");
                Ok(Self::for_profile(Profile::Po))
            }
        }
    }
}

/// `<config dir>/orderflow/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("orderflow").join("config.toml"))
}
