use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use sheetcal_core::{fetch, pipeline};

use crate::render;

/// Dry run: fetch and map, print what a build would write, touch nothing.
pub async fn run(config_path: &Path, url: Option<String>) -> Result<()> {
    let config = super::load_config(config_path, url, None)?;

    let source_url = config.require_source_url()?;
    let csv_text = fetch::fetch_csv(source_url).await?;

    let (feeds, skipped) = pipeline::plan(&config, &csv_text)?;

    for feed in &feeds {
        println!(
            "📅 {} → calendars/{}.ics ({})",
            feed.name,
            feed.slug,
            render::pluralize("event", feed.events.len())
        );
    }

    render::skipped_rows(&skipped);

    if feeds.is_empty() {
        println!("{}", "No events found in the sheet.".yellow());
    }

    Ok(())
}
