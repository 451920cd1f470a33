//! Colored terminal reporting for build runs.

use owo_colors::OwoColorize;
use sheetcal_core::pipeline::BuildReport;
use sheetcal_core::record::SkippedRow;

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Print what a build run did.
pub fn report(report: &BuildReport) {
    for feed in &report.feeds {
        println!(
            "📅 {} → {} ({})",
            feed.name,
            feed.path.display(),
            pluralize("event", feed.events).green()
        );
    }

    skipped_rows(&report.skipped);

    for failed in &report.failed {
        println!(
            "   {} {}: {}",
            "✗".red(),
            failed.name.red(),
            failed.error.red()
        );
    }

    if !report.feeds.is_empty() {
        println!(
            "\nWrote {} with {} total",
            pluralize("feed", report.feeds.len()),
            pluralize("event", report.total_events())
        );
    }
}

/// Print skipped rows, one line each, plus a summary count.
pub fn skipped_rows(skipped: &[SkippedRow]) {
    if skipped.is_empty() {
        return;
    }

    for row in skipped {
        println!(
            "   {} line {}: {}",
            "~".yellow(),
            row.line,
            row.reason.yellow()
        );
    }

    println!("   {}", format!("skipped {}", pluralize("row", skipped.len())).yellow());
}
