//! The `calendars.json` manifest consumed by the subscribe page.

use serde::{Deserialize, Serialize};

use crate::error::SheetCalResult;
use crate::feed::Feed;

/// One subscribable feed as listed on the subscribe page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub slug: String,
    /// Site-relative path to the feed file.
    pub ics: String,
}

pub fn manifest_for(feeds: &[Feed]) -> Vec<ManifestEntry> {
    feeds
        .iter()
        .map(|feed| ManifestEntry {
            name: feed.name.clone(),
            slug: feed.slug.clone(),
            ics: format!("/calendars/{}.ics", feed.slug),
        })
        .collect()
}

pub fn manifest_json(feeds: &[Feed]) -> SheetCalResult<String> {
    let entries = manifest_for(feeds);
    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');
    Ok(json)
}
