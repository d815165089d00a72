//! Extract command handler

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;

use super::{ExtractCommand, OutputFormat};
use crate::config::AppConfig;
use crate::ingest::excel::write_records_excel;
use crate::ingest::types::{Extraction, IngestConfig};
use crate::ingest::extract_document;

pub async fn handle_extract_command(args: ExtractCommand, config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::resolve(config_path, args.profile)?;

    if !args.file.exists() {
        anyhow::bail!("File does not exist: {}", args.file.display());
    }
    let filename = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", args.file.display()))?
        .to_string();
    let bytes = fs::read(&args.file)
        .with_context(|| format!("Failed to read file: {}", args.file.display()))?;

    let extraction = extract_document(&bytes, &filename, &config.ingest, Local::now().date_naive())?;

    for warning in &extraction.stats.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&extraction)
                .context("Failed to serialize extraction")?;
            println!("{}", json);
        }
        OutputFormat::Csv => write_csv(&config.ingest, &extraction, io::stdout())?,
    }

    if let Some(out) = &args.out {
        let out_path = out.to_string_lossy();
        write_records_excel(&config.ingest, &extraction.records, &out_path)?;
        eprintln!(
            "Wrote {} records to {}",
            extraction.records.len(),
            out_path.cyan()
        );
    }

    Ok(())
}

fn write_csv<W: io::Write>(config: &IngestConfig, extraction: &Extraction, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(config.headers())?;
    for row in extraction.rows() {
        writer.write_record(&row)?;
    }
    writer.flush().context("Failed to write CSV output")?;
    Ok(())
}
