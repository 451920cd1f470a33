use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use sheetcal_core::pipeline;

use crate::render;

pub async fn run(config_path: &Path, url: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path, url, output)?;

    let report = pipeline::run(&config).await?;

    render::report(&report);

    if report.feeds.is_empty() && report.failed.is_empty() {
        println!("{}", "No events found in the sheet; nothing written.".yellow());
    }

    if !report.failed.is_empty() {
        anyhow::bail!("{} output file(s) could not be written", report.failed.len());
    }

    Ok(())
}
