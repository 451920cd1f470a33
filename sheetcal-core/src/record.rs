//! CSV decoding into ordered records.
//!
//! The first row is the header; every data row becomes a [`Record`] mapping
//! normalized column names to trimmed cell values. A row whose cell count
//! does not match the header is skipped, never fatal.

use std::collections::HashMap;

use crate::error::{SheetCalError, SheetCalResult};

pub const COL_CALENDAR: &str = "Calendar";
pub const COL_TITLE: &str = "Title";
pub const COL_START: &str = "Start";
pub const COL_END: &str = "End";
pub const COL_LOCATION: &str = "Location";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_URL: &str = "URL";
pub const COL_UID: &str = "UID";
pub const COL_RRULE: &str = "RRule";

/// Header spellings tolerated beyond case differences.
const HEADER_ALIASES: &[(&str, &str)] = &[("Start Date", COL_START), ("End Date", COL_END)];

/// One data row: normalized column name → trimmed cell value.
#[derive(Debug, Clone)]
pub struct Record {
    line: u64,
    values: HashMap<String, String>,
}

impl Record {
    /// 1-based line number this row came from in the CSV text.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Look up a cell by normalized column name. Blank cells read as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// A row that was dropped, with the reason it was dropped.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Output of the row parser: the surviving records plus everything skipped.
#[derive(Debug)]
pub struct ParsedRows {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRow>,
}

/// Decode CSV text into records.
///
/// `extra_aliases` maps additional header spellings to canonical names, on
/// top of the built-in ones. Fails only when the header itself is unusable
/// (missing `Title` or `Start`).
pub fn parse_rows(
    csv_text: &str,
    extra_aliases: &HashMap<String, String>,
) -> SheetCalResult<ParsedRows> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| normalize_header(h, extra_aliases))
        .collect();

    for required in [COL_TITLE, COL_START] {
        if !headers.iter().any(|h| h == required) {
            return Err(SheetCalError::MissingColumn(required.to_string()));
        }
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (index, row) in reader.records().enumerate() {
        // Fallback if the reader has no position: header is line 1.
        let fallback_line = index as u64 + 2;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map_or(fallback_line, csv::Position::line);
                skipped.push(SkippedRow {
                    line,
                    reason: format!("malformed row: {e}"),
                });
                continue;
            }
        };

        let line = row.position().map_or(fallback_line, csv::Position::line);

        if row.len() != headers.len() {
            skipped.push(SkippedRow {
                line,
                reason: format!(
                    "malformed row: {} cells, header has {}",
                    row.len(),
                    headers.len()
                ),
            });
            continue;
        }

        let values = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.clone(), cell.trim().to_string()))
            .collect();

        records.push(Record { line, values });
    }

    Ok(ParsedRows { records, skipped })
}

const CANONICAL_COLUMNS: &[&str] = &[
    COL_CALENDAR,
    COL_TITLE,
    COL_START,
    COL_END,
    COL_LOCATION,
    COL_DESCRIPTION,
    COL_URL,
    COL_UID,
    COL_RRULE,
];

/// The canonical spelling for `name`, if it is a known column.
fn canonical_column(name: &str) -> Option<&'static str> {
    CANONICAL_COLUMNS
        .iter()
        .copied()
        .find(|canonical| canonical.eq_ignore_ascii_case(name))
}

/// Header matching is case-insensitive: sheets are hand-edited, and the
/// config loader lowercases `[columns]` keys anyway. Alias targets are
/// canonicalized too, so `"Event" = "title"` still maps to `Title`.
fn normalize_header(raw: &str, extra_aliases: &HashMap<String, String>) -> String {
    let trimmed = raw.trim();

    if let Some((_, target)) = extra_aliases
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
    {
        return canonical_column(target)
            .map_or_else(|| target.clone(), str::to_string);
    }

    for (alias, canonical) in HEADER_ALIASES {
        if alias.eq_ignore_ascii_case(trimmed) {
            return (*canonical).to_string();
        }
    }

    canonical_column(trimmed).map_or_else(|| trimmed.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv_text: &str) -> ParsedRows {
        parse_rows(csv_text, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_basic_rows() {
        let parsed = parse(
            "Calendar,Title,Start\n\
             work,Team Sync,2025-03-10 09:00\n\
             home,Dentist,2025-03-11\n",
        );

        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.records[0].get(COL_TITLE), Some("Team Sync"));
        assert_eq!(parsed.records[0].get(COL_CALENDAR), Some("work"));
        assert_eq!(parsed.records[0].line(), 2);
        assert_eq!(parsed.records[1].line(), 3);
    }

    #[test]
    fn test_cells_are_trimmed_and_blank_reads_as_absent() {
        let parsed = parse("Title,Start,Location\n  Picnic  ,2025-06-01,   \n");

        let record = &parsed.records[0];
        assert_eq!(record.get(COL_TITLE), Some("Picnic"));
        assert_eq!(record.get(COL_LOCATION), None);
    }

    #[test]
    fn test_mismatched_row_is_skipped_not_fatal() {
        let parsed = parse(
            "Title,Start,End\n\
             Short row,2025-03-10\n\
             Fine,2025-03-11,2025-03-12\n",
        );

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, 2);
        assert!(parsed.skipped[0].reason.contains("malformed row"));
        assert_eq!(parsed.records[0].get(COL_TITLE), Some("Fine"));
    }

    #[test]
    fn test_header_aliases() {
        let parsed = parse("Title,Start Date,End Date\nTrip,2025-07-01,2025-07-03\n");

        let record = &parsed.records[0];
        assert_eq!(record.get(COL_START), Some("2025-07-01"));
        assert_eq!(record.get(COL_END), Some("2025-07-03"));
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let parsed = parse("title,START,end date\nFika,2025-02-01,2025-02-02\n");

        let record = &parsed.records[0];
        assert_eq!(record.get(COL_TITLE), Some("Fika"));
        assert_eq!(record.get(COL_START), Some("2025-02-01"));
        assert_eq!(record.get(COL_END), Some("2025-02-02"));
    }

    #[test]
    fn test_extra_aliases_from_config() {
        let mut aliases = HashMap::new();
        aliases.insert("Event".to_string(), COL_TITLE.to_string());

        let parsed = parse_rows("Event,Start\nFika,2025-02-01\n", &aliases).unwrap();
        assert_eq!(parsed.records[0].get(COL_TITLE), Some("Fika"));
    }

    #[test]
    fn test_alias_target_is_canonicalized() {
        // Config-file keys and values can arrive in any case.
        let mut aliases = HashMap::new();
        aliases.insert("event".to_string(), "title".to_string());

        let parsed = parse_rows("Event,Start\nFika,2025-02-01\n", &aliases).unwrap();
        assert_eq!(parsed.records[0].get(COL_TITLE), Some("Fika"));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let result = parse_rows("Calendar,Title\nwork,No dates here\n", &HashMap::new());
        assert!(matches!(result, Err(SheetCalError::MissingColumn(c)) if c == COL_START));
    }
}
