//! The end-to-end build pipeline.
//!
//! parse → map → group → serialize → write, single pass. Fetch failures
//! abort the run; per-record problems and per-feed write failures are
//! collected into the [`BuildReport`] so the caller can surface them.

use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::error::SheetCalResult;
use crate::feed::{self, Feed};
use crate::fetch;
use crate::ics;
use crate::manifest;
use crate::mapper::Mapper;
use crate::record::{self, SkippedRow};
use crate::site;
use crate::write;

/// One feed that made it to disk.
#[derive(Debug, Clone)]
pub struct FeedOutput {
    pub name: String,
    pub slug: String,
    pub path: PathBuf,
    pub events: usize,
}

/// One output file that could not be written. The rest of the run continues.
#[derive(Debug, Clone)]
pub struct FailedWrite {
    pub name: String,
    pub error: String,
}

/// What a run did: feeds written, rows skipped, writes that failed.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub feeds: Vec<FeedOutput>,
    pub skipped: Vec<SkippedRow>,
    pub failed: Vec<FailedWrite>,
}

impl BuildReport {
    pub fn total_events(&self) -> usize {
        self.feeds.iter().map(|f| f.events).sum()
    }
}

/// Parse and map the CSV text without touching the filesystem.
pub fn plan(config: &BuildConfig, csv_text: &str) -> SheetCalResult<(Vec<Feed>, Vec<SkippedRow>)> {
    let parsed = record::parse_rows(csv_text, &config.columns)?;
    let mapper = Mapper::new(config)?;

    let mut skipped = parsed.skipped;
    let mut rows = Vec::new();

    for record in &parsed.records {
        match mapper.map(record) {
            Ok(row) => rows.push(row),
            Err(e) => skipped.push(SkippedRow {
                line: record.line(),
                reason: e.to_string(),
            }),
        }
    }

    // Malformed rows and unmappable rows arrive from different stages;
    // report them in sheet order.
    skipped.sort_by_key(|s| s.line);

    Ok((feed::group_feeds(rows), skipped))
}

/// Build everything under the configured output directory.
pub fn build(config: &BuildConfig, csv_text: &str) -> SheetCalResult<BuildReport> {
    let (feeds, skipped) = plan(config, csv_text)?;
    let out = config.output_path();

    let mut report = BuildReport {
        skipped,
        ..BuildReport::default()
    };

    for feed in &feeds {
        let path = out.join("calendars").join(format!("{}.ics", feed.slug));
        let contents = ics::feed_to_ics(feed);

        match write::write_atomic(&path, &contents) {
            Ok(()) => report.feeds.push(FeedOutput {
                name: feed.name.clone(),
                slug: feed.slug.clone(),
                path,
                events: feed.events.len(),
            }),
            Err(e) => report.failed.push(FailedWrite {
                name: feed.name.clone(),
                error: e.to_string(),
            }),
        }
    }

    // Manifest and subscribe page are best-effort in the same way: a failure
    // is reported, not fatal for feeds already on disk.
    let manifest_json = manifest::manifest_json(&feeds)?;
    if let Err(e) = write::write_atomic(&out.join("calendars.json"), &manifest_json) {
        report.failed.push(FailedWrite {
            name: "calendars.json".to_string(),
            error: e.to_string(),
        });
    }

    if let Err(e) = write::write_atomic(&out.join("index.html"), site::SUBSCRIBE_PAGE) {
        report.failed.push(FailedWrite {
            name: "index.html".to_string(),
            error: e.to_string(),
        });
    }

    Ok(report)
}

/// Fetch the source CSV and run a full build.
pub async fn run(config: &BuildConfig) -> SheetCalResult<BuildReport> {
    let url = config.require_source_url()?;
    let csv_text = fetch::fetch_csv(url).await?;
    build(config, &csv_text)
}
