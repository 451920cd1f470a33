//! Source CSV retrieval.

use std::time::Duration;

use url::Url;

use crate::error::{SheetCalError, SheetCalResult};

/// A stalled source must fail the run, not hang it.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch the published CSV export. One attempt, no retries: the run itself
/// is the retry unit.
pub async fn fetch_csv(source_url: &str) -> SheetCalResult<String> {
    fetch_csv_with_timeout(source_url, DEFAULT_TIMEOUT).await
}

pub async fn fetch_csv_with_timeout(
    source_url: &str,
    timeout: Duration,
) -> SheetCalResult<String> {
    let parsed = Url::parse(source_url).map_err(|e| fetch_error(source_url, &e))?;

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_error(source_url, &e))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| fetch_error(source_url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SheetCalError::Fetch {
            url: source_url.to_string(),
            reason: format!("HTTP {status}"),
        });
    }

    response
        .text()
        .await
        .map_err(|e| fetch_error(source_url, &e))
}

fn fetch_error(url: &str, reason: &dyn std::fmt::Display) -> SheetCalError {
    SheetCalError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
