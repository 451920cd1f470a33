//! Row-to-event mapping.
//!
//! Each record becomes at most one event. Rows that cannot be mapped fail
//! individually with a [`MapError`]; the pipeline records them and moves on.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::BuildConfig;
use crate::error::{SheetCalError, SheetCalResult};
use crate::event::{Event, EventTime};
use crate::record::{
    COL_CALENDAR, COL_DESCRIPTION, COL_END, COL_LOCATION, COL_RRULE, COL_START, COL_TITLE,
    COL_UID, COL_URL, Record,
};

/// Why a single record was dropped.
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("missing title")]
    MissingTitle,
    #[error("missing start date")]
    MissingStart,
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("end is before start")]
    EndBeforeStart,
}

/// An event routed to a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub calendar: String,
    pub event: Event,
}

/// Accepted timed-value formats. Date-only values make all-day events.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A parsed cell value before timezone resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SheetTime {
    Date(NaiveDate),
    Naive(NaiveDateTime),
}

pub struct Mapper {
    tz: Tz,
    default_duration: Duration,
    default_calendar: String,
}

impl Mapper {
    pub fn new(config: &BuildConfig) -> SheetCalResult<Self> {
        if config.default_duration_minutes <= 0 {
            return Err(SheetCalError::Config(
                "default_duration_minutes must be positive".to_string(),
            ));
        }

        Ok(Mapper {
            tz: config.timezone()?,
            default_duration: Duration::minutes(config.default_duration_minutes),
            default_calendar: config.default_calendar.clone(),
        })
    }

    /// Map one record to an event, or say why it can't be.
    pub fn map(&self, record: &Record) -> Result<MappedRow, MapError> {
        let title = record.get(COL_TITLE).ok_or(MapError::MissingTitle)?;
        let start_raw = record.get(COL_START).ok_or(MapError::MissingStart)?;

        let start = parse_sheet_time(start_raw)?;
        let end = record.get(COL_END).map(parse_sheet_time).transpose()?;

        let (start, end) = self.resolve_times(start, end)?;

        let location = record.get(COL_LOCATION).map(str::to_string);
        let description = record.get(COL_DESCRIPTION).map(str::to_string);
        let url = record.get(COL_URL).map(str::to_string);
        let rrule = record.get(COL_RRULE).map(str::to_string);

        // An explicit UID cell wins over derivation.
        let uid = match record.get(COL_UID) {
            Some(uid) => uid.to_string(),
            None => derive_uid(title, &start, &end, location.as_deref()),
        };

        let calendar = record
            .get(COL_CALENDAR)
            .unwrap_or(&self.default_calendar)
            .to_string();

        Ok(MappedRow {
            calendar,
            event: Event {
                uid,
                summary: title.to_string(),
                start,
                end,
                location,
                description,
                url,
                rrule,
            },
        })
    }

    /// Materialize start and end, applying the documented defaults:
    /// date-only start with no end is a single all-day day; a timed start
    /// with no end gets the default duration. All-day DTEND is exclusive,
    /// so explicit date ends gain one day.
    fn resolve_times(
        &self,
        start: SheetTime,
        end: Option<SheetTime>,
    ) -> Result<(EventTime, EventTime), MapError> {
        match (start, end) {
            (SheetTime::Date(s), None) => Ok((
                EventTime::Date(s),
                EventTime::Date(s + Duration::days(1)),
            )),
            (SheetTime::Date(s), Some(SheetTime::Date(e))) => {
                if e < s {
                    return Err(MapError::EndBeforeStart);
                }
                Ok((EventTime::Date(s), EventTime::Date(e + Duration::days(1))))
            }
            (SheetTime::Naive(s), None) => {
                let start = self.to_utc(s)?;
                Ok((
                    EventTime::DateTime(start),
                    EventTime::DateTime(start + self.default_duration),
                ))
            }
            (SheetTime::Naive(s), Some(SheetTime::Naive(e))) => {
                if e < s {
                    return Err(MapError::EndBeforeStart);
                }
                Ok((
                    EventTime::DateTime(self.to_utc(s)?),
                    EventTime::DateTime(self.to_utc(e)?),
                ))
            }
            // Mixed forms: treat the date-only side as midnight.
            (SheetTime::Date(s), Some(SheetTime::Naive(e))) => {
                self.resolve_times(SheetTime::Naive(midnight(s)), Some(SheetTime::Naive(e)))
            }
            (SheetTime::Naive(s), Some(SheetTime::Date(e))) => {
                self.resolve_times(SheetTime::Naive(s), Some(SheetTime::Naive(midnight(e))))
            }
        }
    }

    /// Interpret a naive local value in the configured timezone.
    fn to_utc(&self, naive: NaiveDateTime) -> Result<chrono::DateTime<Utc>, MapError> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            // DST fold: take the earlier instant.
            LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
            // DST gap: the wall-clock time never existed.
            LocalResult::None => Err(MapError::InvalidDate(naive.to_string())),
        }
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn parse_sheet_time(raw: &str) -> Result<SheetTime, MapError> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(SheetTime::Naive(dt));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(SheetTime::Date(date));
    }

    Err(MapError::InvalidDate(raw.to_string()))
}

/// Derive a UID that is stable across runs for the same logical event.
///
/// Hash of title, start, end, and location; changing any of them changes the
/// UID, so subscribers see an update as replace-not-duplicate only when the
/// identity fields are untouched.
pub fn derive_uid(
    title: &str,
    start: &EventTime,
    end: &EventTime,
    location: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(start.canonical().as_bytes());
    hasher.update(b"|");
    hasher.update(end.canonical().as_bytes());
    hasher.update(b"|");
    hasher.update(location.unwrap_or("").as_bytes());

    // 128 bits of the digest keeps the UID line under the 75-octet fold limit.
    let digest = hex::encode(&hasher.finalize()[..16]);
    format!("{digest}@sheetcal")
}
